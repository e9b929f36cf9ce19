//! Error taxonomy for the preload pipeline.
//!
//! `SchemaError` and `PreloadError` are fatal and stop the registry from being
//! built. Everything else is scoped to a single preload entry: the entry is
//! skipped and the batch keeps going.

use serde::Serialize;
use std::fmt;

/// Fatal problems with the config document itself.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config path {0} is not a regular file")]
    NotAFile(String),

    #[error("config file {path} is {size} bytes, limit is {limit}")]
    FileTooLarge { path: String, size: u64, limit: u64 },

    #[error("config is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("top level of config must be a JSON object")]
    TopLevelNotObject,

    #[error("unsupported top-level key {0:?}")]
    UnsupportedTopLevelKey(String),

    #[error("duplicate key {key:?} in {scope}")]
    DuplicateKey { scope: String, key: String },

    #[error("config has no \"Operations\" key")]
    MissingOperations,

    #[error("\"Operations\" must be an array")]
    OperationsNotArray,

    #[error("operation #{0} is not a JSON object")]
    OperationNotObject(usize),

    #[error("unsupported key {key:?} in operation #{index}")]
    UnsupportedOperationKey { index: usize, key: String },

    #[error("operation #{0} has no \"name\"")]
    MissingName(usize),

    #[error("\"name\" of operation #{0} is not a string")]
    NameNotString(usize),

    #[error("name of operation #{index} has length {len}, expected 1..={max}")]
    NameLength { index: usize, len: usize, max: usize },

    #[error("name {0:?} contains unsupported characters")]
    NameCharset(String),

    #[error("duplicate operation name {0:?}")]
    DuplicateName(String),

    #[error("\"type\" of operation {0:?} is not a string")]
    TypeNotString(String),

    #[error("\"preload_list\" of operation {0:?} is not an array")]
    PreloadListNotArray(String),

    #[error("preload entry #{index} of operation {name:?} is not a JSON object")]
    EntryNotObject { name: String, index: usize },

    #[error("unsupported key {key:?} in preload entry #{index} of operation {name:?}")]
    UnsupportedEntryKey {
        name: String,
        index: usize,
        key: String,
    },

    #[error("field {key:?} in preload entry #{index} of operation {name:?} is not a string")]
    EntryFieldNotString {
        name: String,
        index: usize,
        key: String,
    },
}

/// Failures while splitting the delimiter-joined entry fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("shape element {0:?} is a float, shapes take integers only")]
    FloatDimension(String),

    #[error("shape element {0:?} is not an integer")]
    InvalidDimension(String),

    #[error("shape element {0} must be positive")]
    NonPositiveDimension(i64),

    #[error("{side} declares {shapes} shapes but {types} types")]
    TypeCountMismatch {
        side: Side,
        shapes: usize,
        types: usize,
    },

    #[error("attr_name, attr_type and attr_val must be all set or all empty")]
    PartialAttrDeclaration,

    #[error("attribute lists differ in length: {names} names, {types} types, {vals} values")]
    AttrLengthMismatch {
        names: usize,
        types: usize,
        vals: usize,
    },
}

/// Which half of an operator signature a message refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Input,
    Output,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Input => f.write_str("input"),
            Side::Output => f.write_str("output"),
        }
    }
}

/// A preload entry breaks one of its family's rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} shape list is empty")]
    EmptyShapes(Side),

    #[error("{family} expects {expected} {side} tensors, got {actual}")]
    Arity {
        family: &'static str,
        side: Side,
        expected: usize,
        actual: usize,
    },

    #[error("all input tensors must share one rank, got {0:?}")]
    RankMismatch(Vec<usize>),

    #[error("{family} supports rank {min}..={max}, got {rank}")]
    RankOutOfRange {
        family: &'static str,
        rank: usize,
        min: usize,
        max: usize,
    },

    #[error("{family} requires identical shapes, {expected:?} vs {actual:?}")]
    ShapeMismatch {
        family: &'static str,
        expected: Vec<i64>,
        actual: Vec<i64>,
    },

    #[error("{family}: {detail}")]
    ShapeRelation { family: &'static str, detail: String },

    #[error("{0} type list is empty")]
    MissingTypes(Side),

    #[error("unknown data type {0:?}")]
    UnknownType(String),

    #[error("{family} does not accept {side} type {ty}")]
    UnsupportedType {
        family: &'static str,
        side: Side,
        ty: String,
    },

    #[error("{family} output type must be {expected}, got {actual}")]
    OutputType {
        family: &'static str,
        expected: String,
        actual: String,
    },

    #[error("{family} inputs must share one type, got {types:?}")]
    InputTypeMismatch {
        family: &'static str,
        types: Vec<String>,
    },

    #[error("conversion from {0} to itself is a no-op")]
    NoOpConversion(String),

    #[error("attribute lists differ in length: {names} names, {types} types, {vals} values")]
    AttrLengthMismatch {
        names: usize,
        types: usize,
        vals: usize,
    },

    #[error("{op_name} takes no attributes, got {got:?}")]
    UnexpectedAttributes { op_name: String, got: Vec<String> },

    #[error("{op_name} expects attributes {expected:?}, got {actual:?}")]
    AttributeSchema {
        op_name: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("{op_name}: attribute {name} = {value:?} {reason}")]
    AttributeValue {
        op_name: String,
        name: String,
        value: String,
        reason: &'static str,
    },
}

/// Realizing a validated entry into typed descriptors failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("attribute {name} = {value:?} is not a valid {ty}")]
    AttributeValue {
        name: String,
        ty: String,
        value: String,
    },

    #[error("unknown attribute type {0:?}")]
    UnknownAttrType(String),

    #[error("unknown data type {0:?}")]
    UnknownType(String),

    #[error("missing {0} while building descriptor")]
    Missing(&'static str),
}

/// The AOT compiler refused a call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("compiler rejected {family_id}: {reason}")]
    Rejected { family_id: String, reason: String },
}

/// Pipeline stage in which an entry failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Parse,
    Shape,
    Type,
    Attrs,
    Build,
    Compile,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Parse => "parse",
            Stage::Shape => "shape",
            Stage::Type => "type",
            Stage::Attrs => "attrs",
            Stage::Build => "build",
            Stage::Compile => "compile",
        };
        f.write_str(s)
    }
}

/// Any recoverable, per-entry failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{stage} check failed: {source}")]
    Validation {
        stage: Stage,
        #[source]
        source: ValidationError,
    },

    #[error(transparent)]
    Build(#[from] BuildError),

    /// `issued` counts the calls of the entry that compiled before this one
    /// failed.
    #[error("{source}")]
    Compile {
        issued: usize,
        #[source]
        source: CompileError,
    },
}

impl EntryError {
    pub fn validation(stage: Stage, source: ValidationError) -> Self {
        EntryError::Validation { stage, source }
    }

    pub fn stage(&self) -> Stage {
        match self {
            EntryError::Parse(_) => Stage::Parse,
            EntryError::Validation { stage, .. } => *stage,
            EntryError::Build(_) => Stage::Build,
            EntryError::Compile { .. } => Stage::Compile,
        }
    }

    /// Compiler calls that went through before the failure.
    pub fn issued_calls(&self) -> usize {
        match self {
            EntryError::Compile { issued, .. } => *issued,
            _ => 0,
        }
    }
}

/// Fatal failure of the subsystem as a whole.
#[derive(Debug, thiserror::Error)]
pub enum PreloadError {
    #[error("preload config rejected: {0}")]
    Schema(#[from] SchemaError),
}
