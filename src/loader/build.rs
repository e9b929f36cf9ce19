//! Generic realization of validated entries into descriptors.

use crate::descriptor::{AttrValue, AttributeSet, DataType, Shape, TensorDesc};
use crate::error::BuildError;
use crate::parse::AttrLists;
use crate::rules::AttrType;

/// Ordered input and output tensor descriptors of one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorIo {
    pub inputs: Vec<TensorDesc>,
    pub outputs: Vec<TensorDesc>,
}

pub fn tensor_descs(shapes: &[Shape], types: &[String]) -> Result<Vec<TensorDesc>, BuildError> {
    if shapes.len() != types.len() {
        return Err(BuildError::Missing("one data type per shape"));
    }
    shapes
        .iter()
        .zip(types)
        .map(|(shape, ty)| {
            let dtype =
                DataType::from_name(ty).ok_or_else(|| BuildError::UnknownType(ty.clone()))?;
            Ok(TensorDesc::new(shape.clone(), dtype))
        })
        .collect()
}

/// Turn string triples into typed values. Nothing is coerced: a value that
/// does not parse as its declared type is an error.
pub fn typed_attributes(attrs: &AttrLists) -> Result<AttributeSet, BuildError> {
    let mut out = AttributeSet::none();
    for ((name, ty), val) in attrs.names.iter().zip(&attrs.types).zip(&attrs.vals) {
        let kind = AttrType::from_name(ty).ok_or_else(|| BuildError::UnknownAttrType(ty.clone()))?;
        out.push(name.clone(), parse_value(name, kind, val)?);
    }
    Ok(out)
}

fn parse_value(name: &str, kind: AttrType, val: &str) -> Result<AttrValue, BuildError> {
    let bad = || BuildError::AttributeValue {
        name: name.to_string(),
        ty: kind.name().to_string(),
        value: val.to_string(),
    };
    let value = match kind {
        AttrType::Float => {
            let v: f32 = val.parse().map_err(|_| bad())?;
            if !v.is_finite() {
                return Err(bad());
            }
            AttrValue::Float(v)
        }
        AttrType::Int => AttrValue::Int(val.parse().map_err(|_| bad())?),
        AttrType::Bool => AttrValue::Bool(parse_bool(val).ok_or_else(bad)?),
        AttrType::Str => AttrValue::Str(val.to_string()),
    };
    Ok(value)
}

pub fn parse_bool(val: &str) -> Option<bool> {
    match val {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
