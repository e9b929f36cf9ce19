//! The five-stage validate-then-build pipeline.
//!
//! An `OpLoader` binds one family's rule and schema. Every stage runs the
//! generic checks first and then dispatches on the family's
//! `Specialization`, so each family only carries the overrides it needs.
//!
//! Stages, always in this order:
//! 1) validate_shape
//! 2) validate_type
//! 3) validate_attrs
//! 4) build_descriptor
//! 5) build_attributes
//!
//! `build_calls` runs 4) and 5) and expands compound families (Reduce,
//! Rotate) into several compiler calls.

pub mod build;
pub mod checks;
pub mod family;

use crate::descriptor::{AttributeSet, CompileCall, OperatorDescriptor, Shape, TensorDesc};
use crate::error::{BuildError, EntryError, Stage, ValidationError};
use crate::parse::{AttrLists, ParsedEntry};
use crate::rules::{self, AttrSpec, FamilyDef, Specialization};

use build::TensorIo;
use family::{convert, elementwise, merge, reduce, rotate, sort, split, tile, transpose};

#[derive(Debug, Clone, Copy)]
pub struct OpLoader {
    def: &'static FamilyDef,
    schema: Option<&'static [AttrSpec]>,
}

impl OpLoader {
    pub fn new(def: &'static FamilyDef) -> Self {
        Self {
            def,
            schema: rules::attr_schema(def.name),
        }
    }

    /// Loader for a user-facing family name.
    pub fn for_family(name: &str) -> Option<Self> {
        rules::family(name).map(Self::new)
    }

    pub fn family(&self) -> &'static FamilyDef {
        self.def
    }

    pub fn canonical(&self) -> &'static str {
        self.def.canonical
    }

    pub fn validate_shape(&self, inputs: &[Shape], outputs: &[Shape]) -> Result<(), ValidationError> {
        checks::check_shape_rule(self.def, inputs, outputs)?;
        match self.def.kind {
            Specialization::Split => split::validate_shape(self.def, inputs, outputs),
            Specialization::Merge => merge::validate_shape(self.def, inputs, outputs),
            Specialization::Tile => tile::validate_shape(self.def, inputs, outputs),
            Specialization::Rotate => rotate::validate_shape(self.def, inputs, outputs),
            Specialization::Transpose => transpose::validate_shape(self.def, inputs, outputs),
            Specialization::Reduce => reduce::validate_shape(self.def, inputs, outputs),
            Specialization::Binary
            | Specialization::Unary
            | Specialization::Clip
            | Specialization::Threshold
            | Specialization::Convert
            | Specialization::Sort
            | Specialization::SortIdx => Ok(()),
        }
    }

    pub fn validate_type(&self, inputs: &[String], outputs: &[String]) -> Result<(), ValidationError> {
        let types = checks::resolve_types(self.def, inputs, outputs)?;
        match self.def.kind {
            Specialization::Binary => elementwise::validate_binary_types(self.def, &types),
            Specialization::Convert => convert::validate_types(&types),
            Specialization::SortIdx => sort::validate_index_types(self.def, &types),
            Specialization::Unary
            | Specialization::Clip
            | Specialization::Threshold
            | Specialization::Split
            | Specialization::Merge
            | Specialization::Tile
            | Specialization::Rotate
            | Specialization::Transpose
            | Specialization::Sort
            | Specialization::Reduce => checks::check_same_as_input(self.def, &types),
        }
    }

    pub fn validate_attrs(&self, attrs: &AttrLists, op_name: &str) -> Result<(), ValidationError> {
        checks::check_attr_schema(self.schema, attrs, op_name)?;
        match self.def.kind {
            Specialization::Sort | Specialization::SortIdx => sort::validate_attrs(attrs, op_name),
            _ => Ok(()),
        }
    }

    /// Validation stages 1-3 against one parsed entry.
    pub fn validate(&self, entry: &ParsedEntry, op_name: &str) -> Result<(), EntryError> {
        self.validate_shape(&entry.inputs, &entry.outputs)
            .map_err(|err| EntryError::validation(Stage::Shape, err))?;
        self.validate_type(&entry.input_types, &entry.output_types)
            .map_err(|err| EntryError::validation(Stage::Type, err))?;
        self.validate_attrs(&entry.attrs, op_name)
            .map_err(|err| EntryError::validation(Stage::Attrs, err))?;
        Ok(())
    }

    pub fn build_descriptor(&self, entry: &ParsedEntry) -> Result<TensorIo, BuildError> {
        let mut io = TensorIo {
            inputs: build::tensor_descs(&entry.inputs, &entry.input_types)?,
            outputs: build::tensor_descs(&entry.outputs, &entry.output_types)?,
        };
        match self.def.kind {
            Specialization::Clip => elementwise::inject_clip_bounds(&mut io),
            Specialization::Split
            | Specialization::Tile
            | Specialization::Transpose
            | Specialization::SortIdx => {
                let rank = io
                    .inputs
                    .first()
                    .map(|input| input.rank())
                    .ok_or(BuildError::Missing("input tensor"))?;
                io.inputs.push(TensorDesc::index(rank));
            }
            _ => {}
        }
        Ok(io)
    }

    /// Realize declared attributes, then add the ones the compiler needs that
    /// the config never spells out.
    pub fn build_attributes(&self, attrs: &AttrLists, io: &TensorIo) -> Result<AttributeSet, BuildError> {
        let mut out = build::typed_attributes(attrs)?;
        match self.def.kind {
            Specialization::Convert => convert::inject_attributes(io, &mut out),
            Specialization::Merge => merge::inject_attributes(io, &mut out),
            Specialization::Split => split::inject_attributes(io, &mut out),
            _ => {}
        }
        Ok(out)
    }

    /// Stages 4-5 plus expansion into compiler calls. Assumes `validate`
    /// passed for this entry.
    pub fn build_calls(&self, entry: &ParsedEntry) -> Result<Vec<CompileCall>, EntryError> {
        let entry = match self.def.kind {
            Specialization::SortIdx => sort::normalize_axis(entry),
            _ => std::borrow::Cow::Borrowed(entry),
        };
        let io = self.build_descriptor(&entry)?;
        let attrs = self.build_attributes(&entry.attrs, &io)?;

        let calls = match self.def.kind {
            Specialization::Reduce => reduce::calls(&io, &attrs),
            Specialization::Rotate => rotate::calls(&io),
            _ => vec![CompileCall {
                family_id: self.def.canonical,
                descriptor: OperatorDescriptor {
                    inputs: io.inputs,
                    outputs: io.outputs,
                    attrs,
                },
                dynamic_shape: rules::supports_dynamic_shape(self.def.canonical),
            }],
        };
        if calls.is_empty() {
            return Err(BuildError::Missing("compiler call").into());
        }
        Ok(calls)
    }
}
