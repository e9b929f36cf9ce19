//! Reduce over one spatial axis; each entry warms up sum, mean, max and min.

use crate::descriptor::{AttrValue, AttributeSet, CompileCall, OperatorDescriptor, Shape};
use crate::error::ValidationError;
use crate::loader::build::TensorIo;
use crate::loader::family::relation;
use crate::rules::{FamilyDef, supports_dynamic_shape};

pub const VARIANTS: [&str; 4] = ["ReduceSumD", "ReduceMeanD", "ReduceMaxD", "ReduceMinD"];

/// Which of the two leading axes the output drops, axis 0 first.
pub fn removed_axis(input: &[i64], output: &[i64]) -> Option<usize> {
    if output.len() + 1 != input.len() {
        return None;
    }
    (0..2).find(|&axis| {
        input
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != axis)
            .map(|(_, d)| d)
            .eq(output.iter())
    })
}

pub fn validate_shape(def: &FamilyDef, inputs: &[Shape], outputs: &[Shape]) -> Result<(), ValidationError> {
    let (input, output) = (&inputs[0], &outputs[0]);
    match removed_axis(input, output) {
        Some(_) => Ok(()),
        None => Err(relation(
            def,
            format!("output {output:?} must be input {input:?} with axis 0 or 1 removed"),
        )),
    }
}

/// One call per reduction variant, all on the same descriptor.
pub fn calls(io: &TensorIo, attrs: &AttributeSet) -> Vec<CompileCall> {
    let (Some(input), Some(output)) = (io.inputs.first(), io.outputs.first()) else {
        return Vec::new();
    };
    let axis = removed_axis(&input.shape, &output.shape).unwrap_or(0);

    let mut attrs = attrs.clone();
    attrs.set("axes", AttrValue::IntList(vec![axis as i64]));
    attrs.set("keep_dims", AttrValue::Bool(false));
    let descriptor = OperatorDescriptor {
        inputs: io.inputs.clone(),
        outputs: io.outputs.clone(),
        attrs,
    };

    VARIANTS
        .iter()
        .map(|&family_id| CompileCall {
            family_id,
            descriptor: descriptor.clone(),
            dynamic_shape: supports_dynamic_shape(family_id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DataType, TensorDesc};
    use crate::rules::family;
    use pretty_assertions::assert_eq;

    #[test]
    fn exactly_one_spatial_axis_removed() {
        let reduce = family("Reduce").expect("Reduce");
        assert!(validate_shape(reduce, &[vec![4, 6, 3]], &[vec![6, 3]]).is_ok());
        assert!(validate_shape(reduce, &[vec![4, 6, 3]], &[vec![4, 3]]).is_ok());
        assert!(validate_shape(reduce, &[vec![4, 6]], &[vec![4]]).is_ok());
        assert!(validate_shape(reduce, &[vec![4, 6, 3]], &[vec![4, 6]]).is_err());
        assert!(validate_shape(reduce, &[vec![4, 6, 3]], &[vec![4, 6, 3]]).is_err());
        assert!(validate_shape(reduce, &[vec![4, 6, 3]], &[vec![3]]).is_err());
    }

    #[test]
    fn four_variants_share_one_descriptor() {
        let io = TensorIo {
            inputs: vec![TensorDesc::new(vec![4, 6, 3], DataType::Float32)],
            outputs: vec![TensorDesc::new(vec![4, 3], DataType::Float32)],
        };
        let calls = calls(&io, &AttributeSet::none());
        assert_eq!(
            calls.iter().map(|c| c.family_id).collect::<Vec<_>>(),
            VARIANTS.to_vec()
        );
        for call in &calls {
            assert_eq!(call.descriptor, calls[0].descriptor);
        }
        assert_eq!(calls[0].descriptor.attrs.get("axes"), Some(&AttrValue::IntList(vec![1])));
        assert_eq!(calls[0].descriptor.attrs.get("keep_dims"), Some(&AttrValue::Bool(false)));
    }
}
