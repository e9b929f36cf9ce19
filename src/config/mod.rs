//! Config layer: JSON parsing, schema checks and the validated document.
//!
//! Nothing in here knows about operator families; it only guarantees that the
//! document is well formed and that operation names are usable as keys.

pub mod document;
pub mod json;
pub mod name;

pub use document::{ConfigDocument, ConfigSource, MAX_CONFIG_BYTES, OperationEntry, PreloadEntry};
pub use name::{MAX_NAME_LEN, OpName};
