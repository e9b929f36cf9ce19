//! Field parsing for preload entries.

pub mod entry;
pub mod fields;

pub use entry::{ParsedEntry, parse_entry};
pub use fields::{AttrLists, parse_attr_lists, parse_shapes, parse_types};
