//! Merge: concatenate `W,H,cᵢ` images along the channel axis.

use crate::descriptor::{AttrValue, AttributeSet, Shape};
use crate::error::ValidationError;
use crate::loader::build::TensorIo;
use crate::loader::family::relation;
use crate::rules::FamilyDef;

pub fn validate_shape(def: &FamilyDef, inputs: &[Shape], outputs: &[Shape]) -> Result<(), ValidationError> {
    let output = &outputs[0];
    let Some((&out_channels, out_plane)) = output.split_last() else {
        return Err(relation(def, "output has no dimensions"));
    };
    if output.len() != inputs[0].len() {
        return Err(relation(
            def,
            format!("output rank {} differs from input rank {}", output.len(), inputs[0].len()),
        ));
    }

    let mut channels = 0i64;
    for input in inputs {
        let (&c, plane) = input
            .split_last()
            .ok_or_else(|| relation(def, "input has no dimensions"))?;
        if plane != out_plane {
            return Err(relation(
                def,
                format!("input {input:?} does not match output {output:?} outside the channel axis"),
            ));
        }
        channels = channels
            .checked_add(c)
            .ok_or_else(|| relation(def, "input channel sum overflows"))?;
    }
    if channels != out_channels {
        return Err(relation(
            def,
            format!("input channels sum to {channels}, output has {out_channels}"),
        ));
    }
    Ok(())
}

pub fn inject_attributes(io: &TensorIo, attrs: &mut AttributeSet) {
    let rank = io.outputs.first().map(|out| out.rank()).unwrap_or(0);
    attrs.set("concat_dim", AttrValue::Int(rank as i64 - 1));
    attrs.set("N", AttrValue::Int(io.inputs.len() as i64));
}
