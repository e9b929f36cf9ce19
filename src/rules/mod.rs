//! Immutable per-family tables: structural rules, accepted types, attribute
//! schemas and the compiler identifiers.

pub mod attrs;
pub mod table;

pub use attrs::{AttrSpec, AttrType, attr_schema};
pub use table::{
    Arity, FAMILIES, FamilyDef, OperatorRule, Specialization, canonical_name, family,
    supports_dynamic_shape,
};
