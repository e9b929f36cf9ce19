//! Split: one `W,H,C` image into `C` single-channel planes.

use crate::descriptor::{AttrValue, AttributeSet, Shape, TensorDesc};
use crate::error::ValidationError;
use crate::loader::build::TensorIo;
use crate::loader::family::relation;
use crate::rules::FamilyDef;

const CHANNELS: std::ops::RangeInclusive<i64> = 3..=4;

pub fn validate_shape(def: &FamilyDef, inputs: &[Shape], outputs: &[Shape]) -> Result<(), ValidationError> {
    let input = &inputs[0];
    let Some((&channels, plane)) = input.split_last() else {
        return Err(relation(def, "input has no dimensions"));
    };
    if !CHANNELS.contains(&channels) {
        return Err(relation(
            def,
            format!("input channel count {channels} must be 3 or 4"),
        ));
    }
    if outputs.len() as i64 != channels {
        return Err(relation(
            def,
            format!("{channels} channels need {channels} outputs, got {}", outputs.len()),
        ));
    }
    let expected: Shape = plane.iter().copied().chain([1]).collect();
    if let Some(bad) = outputs.iter().find(|out| **out != expected) {
        return Err(relation(
            def,
            format!("every output must be {expected:?}, got {bad:?}"),
        ));
    }
    Ok(())
}

/// `split_dim` is the channel axis, `num_split` the declared output count.
pub fn inject_attributes(io: &TensorIo, attrs: &mut AttributeSet) {
    let rank = io.inputs.first().map(TensorDesc::rank).unwrap_or(0);
    attrs.set("split_dim", AttrValue::Int(rank as i64 - 1));
    attrs.set("num_split", AttrValue::Int(io.outputs.len() as i64));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::family;

    fn split() -> &'static FamilyDef {
        family("Split").expect("Split")
    }

    #[test]
    fn four_channels_need_four_planes() {
        let input = vec![vec![640, 480, 4]];
        let planes = vec![vec![640, 480, 1]; 4];
        assert!(validate_shape(split(), &input, &planes).is_ok());
        assert!(validate_shape(split(), &input, &planes[..3]).is_err());
        assert!(validate_shape(split(), &input, &vec![vec![640, 480, 1]; 5]).is_err());
    }

    #[test]
    fn planes_must_keep_spatial_dims_and_one_channel() {
        let input = vec![vec![640, 480, 3]];
        let mut planes = vec![vec![640, 480, 1]; 3];
        planes[1] = vec![640, 480, 2];
        assert!(validate_shape(split(), &input, &planes).is_err());
        planes[1] = vec![480, 640, 1];
        assert!(validate_shape(split(), &input, &planes).is_err());
    }

    #[test]
    fn channel_count_outside_three_or_four() {
        for c in [1, 2, 5] {
            let input = vec![vec![8, 8, c]];
            let planes = vec![vec![8, 8, 1]; c as usize];
            assert!(validate_shape(split(), &input, &planes).is_err(), "{c}");
        }
    }
}
