//! Per-family overrides. Each module holds only the stages its family changes;
//! everything else falls through to the generic checks.

pub mod convert;
pub mod elementwise;
pub mod merge;
pub mod reduce;
pub mod rotate;
pub mod sort;
pub mod split;
pub mod tile;
pub mod transpose;

use crate::error::ValidationError;
use crate::rules::FamilyDef;

pub(crate) fn relation(def: &FamilyDef, detail: impl Into<String>) -> ValidationError {
    ValidationError::ShapeRelation {
        family: def.name,
        detail: detail.into(),
    }
}
