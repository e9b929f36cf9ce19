use crate::descriptor::Shape;
use crate::error::ValidationError;
use crate::loader::family::relation;
use crate::rules::FamilyDef;

/// The output dims are a permutation of the input dims.
pub fn validate_shape(def: &FamilyDef, inputs: &[Shape], outputs: &[Shape]) -> Result<(), ValidationError> {
    let (input, output) = (&inputs[0], &outputs[0]);
    let mut lhs = input.clone();
    let mut rhs = output.clone();
    lhs.sort_unstable();
    rhs.sort_unstable();
    if lhs != rhs {
        return Err(relation(
            def,
            format!("output {output:?} is not a permutation of input {input:?}"),
        ));
    }
    Ok(())
}
