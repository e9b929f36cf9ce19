//! Attribute schemas: the ordered `(name, type)` list a family accepts.
//! Families without an entry take no attributes at all.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrType {
    Float,
    Int,
    Bool,
    Str,
}

impl AttrType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "float" => Some(AttrType::Float),
            "int" => Some(AttrType::Int),
            "bool" => Some(AttrType::Bool),
            "string" => Some(AttrType::Str),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AttrType::Float => "float",
            AttrType::Int => "int",
            AttrType::Bool => "bool",
            AttrType::Str => "string",
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrSpec {
    pub name: &'static str,
    pub ty: AttrType,
}

impl AttrSpec {
    pub const fn new(name: &'static str, ty: AttrType) -> Self {
        Self { name, ty }
    }

    /// `name:type`, the form used in mismatch messages.
    pub fn label(&self) -> String {
        format!("{}:{}", self.name, self.ty)
    }
}

const SORT_ATTRS: &[AttrSpec] = &[
    AttrSpec::new("axis", AttrType::Int),
    AttrSpec::new("descending", AttrType::Bool),
];

const SORT_IDX_ATTRS: &[AttrSpec] = &[AttrSpec::new("axis", AttrType::Int)];

const THRESHOLD_ATTRS: &[AttrSpec] = &[
    AttrSpec::new("thresh", AttrType::Float),
    AttrSpec::new("maxVal", AttrType::Float),
];

static SCHEMAS: Lazy<HashMap<&'static str, &'static [AttrSpec]>> = Lazy::new(|| {
    HashMap::from([
        ("Sort", SORT_ATTRS),
        ("SortIdx", SORT_IDX_ATTRS),
        ("ThresholdBinary", THRESHOLD_ATTRS),
    ])
});

/// Schema for a user-facing family name.
pub fn attr_schema(family: &str) -> Option<&'static [AttrSpec]> {
    SCHEMAS.get(family).copied()
}
