//! Per-family structural rules and the user-name → compiler-id translation.
//!
//! The table is plain `static` data; lookups go through a lazily built index.

use crate::descriptor::DataType;
use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    Variadic,
}

impl Arity {
    pub fn allows(self, count: usize) -> bool {
        match self {
            Arity::Fixed(expected) => count == expected,
            Arity::Variadic => true,
        }
    }

    pub fn fixed(self) -> Option<usize> {
        match self {
            Arity::Fixed(count) => Some(count),
            Arity::Variadic => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorRule {
    pub input_arity: Arity,
    pub output_arity: Arity,
    pub min_rank: usize,
    /// `None` leaves the rank unbounded above.
    pub max_rank: Option<usize>,
    pub integer_only: bool,
    pub shapes_must_match: bool,
}

impl OperatorRule {
    const fn elementwise(inputs: usize, integer_only: bool) -> Self {
        Self {
            input_arity: Arity::Fixed(inputs),
            output_arity: Arity::Fixed(1),
            min_rank: 1,
            max_rank: Some(4),
            integer_only,
            shapes_must_match: true,
        }
    }

    const fn single(min_rank: usize, max_rank: usize, shapes_must_match: bool) -> Self {
        Self {
            input_arity: Arity::Fixed(1),
            output_arity: Arity::Fixed(1),
            min_rank,
            max_rank: Some(max_rank),
            integer_only: false,
            shapes_must_match,
        }
    }
}

/// Which override set a family uses on top of the generic rule checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Specialization {
    Binary,
    Unary,
    Clip,
    Threshold,
    Convert,
    Split,
    Merge,
    Tile,
    Rotate,
    Transpose,
    Sort,
    SortIdx,
    Reduce,
}

#[derive(Debug, Clone, Copy)]
pub struct FamilyDef {
    /// Name used under `"name"` in the config.
    pub name: &'static str,
    /// Identifier the compiler knows the kernel by.
    pub canonical: &'static str,
    pub kind: Specialization,
    pub rule: OperatorRule,
    pub input_types: &'static [DataType],
    pub output_types: &'static [DataType],
    pub dynamic_shape: bool,
}

const ARITH: &[DataType] = &[DataType::UInt8, DataType::Float16, DataType::Float32];
const FLOATS: &[DataType] = &[DataType::Float16, DataType::Float32];
const BYTES: &[DataType] = &[DataType::UInt8];
const INDICES: &[DataType] = &[DataType::Int32];
const ANY: &[DataType] = &DataType::ALL;

const fn binary(name: &'static str, canonical: &'static str, dynamic_shape: bool) -> FamilyDef {
    FamilyDef {
        name,
        canonical,
        kind: Specialization::Binary,
        rule: OperatorRule::elementwise(2, false),
        input_types: ARITH,
        output_types: ARITH,
        dynamic_shape,
    }
}

const fn bitwise(name: &'static str, canonical: &'static str, inputs: usize) -> FamilyDef {
    FamilyDef {
        name,
        canonical,
        kind: if inputs == 1 {
            Specialization::Unary
        } else {
            Specialization::Binary
        },
        rule: OperatorRule::elementwise(inputs, true),
        input_types: BYTES,
        output_types: BYTES,
        dynamic_shape: false,
    }
}

const fn unary(
    name: &'static str,
    canonical: &'static str,
    types: &'static [DataType],
    dynamic_shape: bool,
) -> FamilyDef {
    FamilyDef {
        name,
        canonical,
        kind: Specialization::Unary,
        rule: OperatorRule::elementwise(1, false),
        input_types: types,
        output_types: types,
        dynamic_shape,
    }
}

pub static FAMILIES: &[FamilyDef] = &[
    binary("Add", "Add", true),
    binary("Subtract", "Sub", true),
    binary("Multiply", "Mul", true),
    binary("Divide", "Div", true),
    binary("Min", "Minimum", true),
    binary("Max", "Maximum", true),
    binary("Pow", "Pow", false),
    bitwise("BitwiseAnd", "BitwiseAnd", 2),
    bitwise("BitwiseOr", "BitwiseOr", 2),
    bitwise("BitwiseXor", "BitwiseXor", 2),
    bitwise("BitwiseNot", "Invert", 1),
    unary("Abs", "Abs", ARITH, true),
    unary("Sqr", "Square", ARITH, true),
    unary("Sqrt", "Sqrt", FLOATS, true),
    unary("Exp", "Exp", FLOATS, true),
    unary("Log", "Log", FLOATS, true),
    FamilyDef {
        name: "Clip",
        canonical: "ClipByValue",
        kind: Specialization::Clip,
        rule: OperatorRule::elementwise(1, false),
        input_types: ARITH,
        output_types: ARITH,
        dynamic_shape: false,
    },
    FamilyDef {
        name: "ThresholdBinary",
        canonical: "Threshold",
        kind: Specialization::Threshold,
        rule: OperatorRule::elementwise(1, false),
        input_types: ARITH,
        output_types: ARITH,
        dynamic_shape: false,
    },
    FamilyDef {
        name: "ConvertTo",
        canonical: "Cast",
        kind: Specialization::Convert,
        rule: OperatorRule::elementwise(1, false),
        input_types: ANY,
        output_types: ANY,
        dynamic_shape: true,
    },
    FamilyDef {
        name: "Split",
        canonical: "Split",
        kind: Specialization::Split,
        rule: OperatorRule {
            input_arity: Arity::Fixed(1),
            output_arity: Arity::Variadic,
            min_rank: 3,
            max_rank: Some(3),
            integer_only: false,
            shapes_must_match: false,
        },
        input_types: ARITH,
        output_types: ARITH,
        dynamic_shape: false,
    },
    FamilyDef {
        name: "Merge",
        canonical: "ConcatD",
        kind: Specialization::Merge,
        rule: OperatorRule {
            input_arity: Arity::Variadic,
            output_arity: Arity::Fixed(1),
            min_rank: 3,
            max_rank: Some(3),
            integer_only: false,
            shapes_must_match: false,
        },
        input_types: ARITH,
        output_types: ARITH,
        dynamic_shape: false,
    },
    FamilyDef {
        name: "Tile",
        canonical: "Tile",
        kind: Specialization::Tile,
        rule: OperatorRule::single(1, 4, false),
        input_types: ARITH,
        output_types: ARITH,
        dynamic_shape: false,
    },
    FamilyDef {
        name: "Rotate",
        canonical: "Rotate",
        kind: Specialization::Rotate,
        rule: OperatorRule::single(2, 3, false),
        input_types: ARITH,
        output_types: ARITH,
        dynamic_shape: false,
    },
    FamilyDef {
        name: "Transpose",
        canonical: "Transpose",
        kind: Specialization::Transpose,
        rule: OperatorRule::single(2, 4, false),
        input_types: ARITH,
        output_types: ARITH,
        dynamic_shape: false,
    },
    FamilyDef {
        name: "Sort",
        canonical: "Sort",
        kind: Specialization::Sort,
        rule: OperatorRule::single(2, 2, true),
        input_types: FLOATS,
        output_types: FLOATS,
        dynamic_shape: false,
    },
    FamilyDef {
        name: "SortIdx",
        canonical: "Sort",
        kind: Specialization::SortIdx,
        rule: OperatorRule::single(2, 2, true),
        input_types: FLOATS,
        output_types: INDICES,
        dynamic_shape: false,
    },
    FamilyDef {
        name: "Reduce",
        canonical: "Reduce",
        kind: Specialization::Reduce,
        rule: OperatorRule::single(2, 3, false),
        input_types: ARITH,
        output_types: ARITH,
        dynamic_shape: false,
    },
];

static BY_NAME: Lazy<HashMap<&'static str, &'static FamilyDef>> =
    Lazy::new(|| FAMILIES.iter().map(|def| (def.name, def)).collect());

/// Look a family up by its user-facing name.
pub fn family(name: &str) -> Option<&'static FamilyDef> {
    BY_NAME.get(name).copied()
}

/// Translate a user-facing name to the compiler identifier.
pub fn canonical_name(name: &str) -> Option<&'static str> {
    family(name).map(|def| def.canonical)
}

/// Whether kernels for this compiler identifier serve any shape.
pub fn supports_dynamic_shape(canonical: &str) -> bool {
    FAMILIES
        .iter()
        .any(|def| def.canonical == canonical && def.dynamic_shape)
}
