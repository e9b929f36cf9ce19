//! Rotate by a multiple of 90 degrees, compiled as a transpose plus a reverse
//! on each side of it.

use crate::descriptor::{AttributeSet, CompileCall, OperatorDescriptor, Shape, TensorDesc};
use crate::error::ValidationError;
use crate::loader::build::TensorIo;
use crate::loader::family::relation;
use crate::rules::{FamilyDef, supports_dynamic_shape};

const TRANSPOSE: &str = "Transpose";
const REVERSE: &str = "ReverseV2";

/// Shape with the first two axes swapped.
pub fn swap_leading(shape: &[i64]) -> Shape {
    let mut swapped = shape.to_vec();
    if swapped.len() >= 2 {
        swapped.swap(0, 1);
    }
    swapped
}

/// Output is the input unchanged or with the first two axes swapped; a
/// trailing channel axis stays where it is.
pub fn validate_shape(def: &FamilyDef, inputs: &[Shape], outputs: &[Shape]) -> Result<(), ValidationError> {
    let (input, output) = (&inputs[0], &outputs[0]);
    if output == input || *output == swap_leading(input) {
        return Ok(());
    }
    Err(relation(
        def,
        format!("output {output:?} must equal input {input:?} or swap its first two axes"),
    ))
}

/// Transpose, then reverse on the pre- and post-transpose shapes.
pub fn calls(io: &TensorIo) -> Vec<CompileCall> {
    let Some(data) = io.inputs.first() else {
        return Vec::new();
    };
    let before = data.clone();
    let after = TensorDesc::new(swap_leading(&data.shape), data.dtype);

    let call = |family_id: &'static str, input: &TensorDesc, index: usize, output: &TensorDesc| {
        CompileCall {
            family_id,
            descriptor: OperatorDescriptor {
                inputs: vec![input.clone(), TensorDesc::index(index)],
                outputs: vec![output.clone()],
                attrs: AttributeSet::none(),
            },
            dynamic_shape: supports_dynamic_shape(family_id),
        }
    };

    vec![
        call(TRANSPOSE, &before, before.rank(), &after),
        call(REVERSE, &before, 1, &before),
        call(REVERSE, &after, 1, &after),
    ]
}
