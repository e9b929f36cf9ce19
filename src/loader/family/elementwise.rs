//! Binary arithmetic promotion and the clip bound tensors.

use crate::error::{Side, ValidationError};
use crate::loader::build::TensorIo;
use crate::loader::checks::ResolvedTypes;
use crate::rules::FamilyDef;

/// The output takes the higher-precision input type under
/// `uint8 < float16 < float`.
pub fn validate_binary_types(def: &FamilyDef, types: &ResolvedTypes) -> Result<(), ValidationError> {
    let expected = types
        .inputs
        .iter()
        .copied()
        .max_by_key(|t| t.precision())
        .ok_or(ValidationError::EmptyShapes(Side::Input))?;
    let actual = types.outputs[0];
    if actual != expected {
        return Err(ValidationError::OutputType {
            family: def.name,
            expected: expected.name().to_string(),
            actual: actual.name().to_string(),
        });
    }
    Ok(())
}

/// Clip takes the data tensor plus lower and upper bound tensors of the same
/// shape and type; only the first is declared in the config.
pub fn inject_clip_bounds(io: &mut TensorIo) {
    if let Some(data) = io.inputs.first().cloned() {
        io.inputs.push(data.clone());
        io.inputs.push(data);
    }
}
