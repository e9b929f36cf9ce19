use crate::config::PreloadEntry;
use crate::descriptor::Shape;
use crate::error::{ParseError, Side};
use crate::parse::fields::{AttrLists, parse_attr_lists, parse_shapes, parse_types};

/// A preload entry with every field split once, up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    pub inputs: Vec<Shape>,
    pub input_types: Vec<String>,
    pub outputs: Vec<Shape>,
    pub output_types: Vec<String>,
    pub attrs: AttrLists,
}

/// Parse all fields and require one type per declared shape on each side.
pub fn parse_entry(entry: &PreloadEntry) -> Result<ParsedEntry, ParseError> {
    let inputs = parse_shapes(&entry.input_shape)?;
    let outputs = parse_shapes(&entry.output_shape)?;
    let input_types = parse_types(&entry.input_type);
    let output_types = parse_types(&entry.output_type);
    let attrs = parse_attr_lists(&entry.attr_name, &entry.attr_type, &entry.attr_val)?;

    check_side(Side::Input, &inputs, &input_types)?;
    check_side(Side::Output, &outputs, &output_types)?;

    Ok(ParsedEntry {
        inputs,
        input_types,
        outputs,
        output_types,
        attrs,
    })
}

fn check_side(side: Side, shapes: &[Shape], types: &[String]) -> Result<(), ParseError> {
    if shapes.len() != types.len() {
        return Err(ParseError::TypeCountMismatch {
            side,
            shapes: shapes.len(),
            types: types.len(),
        });
    }
    Ok(())
}
