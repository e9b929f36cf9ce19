//! Sort and SortIdx along one axis of a 2-D tensor.

use crate::descriptor::DataType;
use crate::error::ValidationError;
use crate::loader::checks::{ResolvedTypes, attr_value};
use crate::parse::{AttrLists, ParsedEntry};
use crate::rules::FamilyDef;
use std::borrow::Cow;

const AXIS: &str = "axis";

/// `axis` must be 0 or 1.
pub fn validate_attrs(attrs: &AttrLists, op_name: &str) -> Result<(), ValidationError> {
    let Some(value) = attr_value(attrs, AXIS) else {
        return Ok(());
    };
    match value.parse::<i64>() {
        Ok(0 | 1) => Ok(()),
        _ => Err(ValidationError::AttributeValue {
            op_name: op_name.to_string(),
            name: AXIS.to_string(),
            value: value.to_string(),
            reason: "must be 0 or 1",
        }),
    }
}

/// Indices come back as int32, whatever the input type.
pub fn validate_index_types(def: &FamilyDef, types: &ResolvedTypes) -> Result<(), ValidationError> {
    let actual = types.outputs[0];
    if actual != DataType::Int32 {
        return Err(ValidationError::OutputType {
            family: def.name,
            expected: DataType::Int32.name().to_string(),
            actual: actual.name().to_string(),
        });
    }
    Ok(())
}

/// Only the last-axis form is compiled. An `axis=0` entry has every declared
/// shape reversed and its axis rewritten to 1.
pub fn normalize_axis(entry: &ParsedEntry) -> Cow<'_, ParsedEntry> {
    if attr_value(&entry.attrs, AXIS).and_then(|v| v.parse::<i64>().ok()) != Some(0) {
        return Cow::Borrowed(entry);
    }
    let mut entry = entry.clone();
    for shape in entry.inputs.iter_mut().chain(entry.outputs.iter_mut()) {
        shape.reverse();
    }
    if let Some(i) = entry.attrs.names.iter().position(|n| n == AXIS) {
        entry.attrs.vals[i] = "1".to_string();
    }
    Cow::Owned(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn axis(val: &str) -> AttrLists {
        AttrLists {
            names: vec!["axis".to_string()],
            types: vec!["int".to_string()],
            vals: vec![val.to_string()],
        }
    }

    #[test]
    fn axis_range() {
        assert!(validate_attrs(&axis("0"), "Sort").is_ok());
        assert!(validate_attrs(&axis("1"), "Sort").is_ok());
        for bad in ["2", "-1", "x", ""] {
            assert!(validate_attrs(&axis(bad), "Sort").is_err(), "{bad:?}");
        }
    }

    #[test]
    fn axis_zero_reverses_shapes() {
        let entry = ParsedEntry {
            inputs: vec![vec![8, 128]],
            input_types: vec!["float".to_string()],
            outputs: vec![vec![8, 128]],
            output_types: vec!["int32".to_string()],
            attrs: axis("0"),
        };
        let normalized = normalize_axis(&entry);
        assert_eq!(normalized.inputs, vec![vec![128, 8]]);
        assert_eq!(normalized.outputs, vec![vec![128, 8]]);
        assert_eq!(normalized.attrs.vals, vec!["1"]);
    }

    #[test]
    fn axis_one_is_untouched() {
        let entry = ParsedEntry {
            inputs: vec![vec![8, 128]],
            input_types: vec!["float".to_string()],
            outputs: vec![vec![8, 128]],
            output_types: vec!["int32".to_string()],
            attrs: axis("1"),
        };
        assert!(matches!(normalize_axis(&entry), Cow::Borrowed(_)));
    }
}
