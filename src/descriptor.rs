//! Hardware-agnostic operator descriptors handed to the AOT compiler.

use serde::Serialize;
use std::fmt;

/// One tensor's dimensions, every element positive.
pub type Shape = Vec<i64>;

/// Element types a preload entry may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    UInt8,
    Float16,
    Float32,
    Int32,
}

impl DataType {
    pub const ALL: [DataType; 4] = [
        DataType::UInt8,
        DataType::Float16,
        DataType::Float32,
        DataType::Int32,
    ];

    /// Parse the config spelling (`uint8`, `float16`, `float`, `int32`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "uint8" => Some(DataType::UInt8),
            "float16" => Some(DataType::Float16),
            "float" => Some(DataType::Float32),
            "int32" => Some(DataType::Int32),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DataType::UInt8 => "uint8",
            DataType::Float16 => "float16",
            DataType::Float32 => "float",
            DataType::Int32 => "int32",
        }
    }

    /// Position in the arithmetic promotion order `uint8 < float16 < float`.
    pub fn precision(self) -> Option<u8> {
        match self {
            DataType::UInt8 => Some(0),
            DataType::Float16 => Some(1),
            DataType::Float32 => Some(2),
            DataType::Int32 => None,
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(self, DataType::UInt8 | DataType::Int32)
    }

    /// Numeric code the compiler expects in a `dst_type` attribute.
    pub fn compiler_code(self) -> i64 {
        match self {
            DataType::Float32 => 0,
            DataType::Float16 => 1,
            DataType::Int32 => 3,
            DataType::UInt8 => 4,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TensorDesc {
    pub shape: Shape,
    pub dtype: DataType,
}

impl TensorDesc {
    pub fn new(shape: Shape, dtype: DataType) -> Self {
        Self { shape, dtype }
    }

    /// 1-D int32 tensor of `len` elements (permutations, multiples, axes).
    pub fn index(len: usize) -> Self {
        Self::new(vec![len as i64], DataType::Int32)
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }
}

/// Typed attribute value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AttrValue {
    Float(f32),
    Int(i64),
    Bool(bool),
    Str(String),
    IntList(Vec<i64>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
}

/// Ordered attribute set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttributeSet {
    pub items: Vec<Attribute>,
}

impl AttributeSet {
    pub fn none() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, name: impl Into<String>, value: AttrValue) {
        self.items.push(Attribute {
            name: name.into(),
            value,
        });
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.items
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| &attr.value)
    }

    /// Replace an existing value in place, or append.
    pub fn set(&mut self, name: &str, value: AttrValue) {
        match self.items.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = value,
            None => self.push(name, value),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorDescriptor {
    pub inputs: Vec<TensorDesc>,
    pub outputs: Vec<TensorDesc>,
    pub attrs: AttributeSet,
}

/// One request to the compiler. A preload entry expands to one or more.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompileCall {
    pub family_id: &'static str,
    pub descriptor: OperatorDescriptor,
    pub dynamic_shape: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_round_trip() {
        for dtype in DataType::ALL {
            assert_eq!(DataType::from_name(dtype.name()), Some(dtype));
        }
        assert_eq!(DataType::from_name("float32"), None);
        assert_eq!(DataType::from_name(" float"), None);
    }

    #[test]
    fn promotion_order() {
        let rank = |d: DataType| d.precision().expect("arithmetic type");
        assert!(rank(DataType::UInt8) < rank(DataType::Float16));
        assert!(rank(DataType::Float16) < rank(DataType::Float32));
        assert_eq!(DataType::Int32.precision(), None);
    }

    #[test]
    fn attribute_set_overwrites_in_place() {
        let mut attrs = AttributeSet::none();
        attrs.push("axis", AttrValue::Int(0));
        attrs.push("descending", AttrValue::Bool(true));
        attrs.set("axis", AttrValue::Int(1));
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.items[0].name, "axis");
        assert_eq!(attrs.get("axis"), Some(&AttrValue::Int(1)));
    }
}
