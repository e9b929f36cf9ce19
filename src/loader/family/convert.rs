use crate::descriptor::{AttrValue, AttributeSet};
use crate::error::ValidationError;
use crate::loader::build::TensorIo;
use crate::loader::checks::ResolvedTypes;

/// A conversion must change the type.
pub fn validate_types(types: &ResolvedTypes) -> Result<(), ValidationError> {
    let (from, to) = (types.inputs[0], types.outputs[0]);
    if from == to {
        return Err(ValidationError::NoOpConversion(from.name().to_string()));
    }
    Ok(())
}

/// The compiler reads the target type from `dst_type`.
pub fn inject_attributes(io: &TensorIo, attrs: &mut AttributeSet) {
    if let Some(out) = io.outputs.first() {
        attrs.set("dst_type", AttrValue::Int(out.dtype.compiler_code()));
    }
}
