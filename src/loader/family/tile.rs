use crate::descriptor::Shape;
use crate::error::ValidationError;
use crate::loader::family::relation;
use crate::rules::FamilyDef;

/// Every output dimension is a whole multiple of the input dimension.
pub fn validate_shape(def: &FamilyDef, inputs: &[Shape], outputs: &[Shape]) -> Result<(), ValidationError> {
    let (input, output) = (&inputs[0], &outputs[0]);
    if input.len() != output.len() {
        return Err(relation(
            def,
            format!("output rank {} differs from input rank {}", output.len(), input.len()),
        ));
    }
    if let Some(axis) = (0..input.len()).find(|&i| output[i] % input[i] != 0) {
        return Err(relation(
            def,
            format!(
                "output dim {} on axis {axis} is not a multiple of input dim {}",
                output[axis], input[axis]
            ),
        ));
    }
    Ok(())
}
