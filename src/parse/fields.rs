//! Splitting of the delimiter-joined entry fields.
//!
//! Groups are separated by `;`, shape dimensions by `,`:
//! "224,224,3;224,224,3" => [[224, 224, 3], [224, 224, 3]]
//! "uint8;float"          => ["uint8", "float"]

use crate::descriptor::Shape;
use crate::error::ParseError;

const GROUP_SEP: char = ';';
const DIM_SEP: char = ',';

/// Parse a shape list. Blank input yields zero groups, which shape-bearing
/// callers must reject themselves.
pub fn parse_shapes(s: &str) -> Result<Vec<Shape>, ParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(Vec::new());
    }
    s.split(GROUP_SEP).map(parse_shape).collect()
}

fn parse_shape(group: &str) -> Result<Shape, ParseError> {
    group.split(DIM_SEP).map(parse_dim).collect()
}

fn parse_dim(token: &str) -> Result<i64, ParseError> {
    let token = token.trim();
    if token.contains('.') {
        return Err(ParseError::FloatDimension(token.to_string()));
    }
    let value: i64 = token
        .parse()
        .map_err(|_| ParseError::InvalidDimension(token.to_string()))?;
    if value <= 0 {
        return Err(ParseError::NonPositiveDimension(value));
    }
    Ok(value)
}

/// Parse a type list. Names are not checked here; each family accepts a
/// different set.
pub fn parse_types(s: &str) -> Vec<String> {
    split_list(s)
}

/// Parsed `(attr_name, attr_type, attr_val)` columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrLists {
    pub names: Vec<String>,
    pub types: Vec<String>,
    pub vals: Vec<String>,
}

impl AttrLists {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

/// Parse the three attribute columns. A declaration is all-or-nothing and
/// the columns must line up.
pub fn parse_attr_lists(names: &str, types: &str, vals: &str) -> Result<AttrLists, ParseError> {
    let lists = AttrLists {
        names: split_list(names),
        types: split_list(types),
        vals: split_list(vals),
    };
    let empty = [&lists.names, &lists.types, &lists.vals]
        .iter()
        .filter(|list| list.is_empty())
        .count();
    if empty == 3 {
        return Ok(lists);
    }
    if empty > 0 {
        return Err(ParseError::PartialAttrDeclaration);
    }
    if lists.names.len() != lists.types.len() || lists.names.len() != lists.vals.len() {
        return Err(ParseError::AttrLengthMismatch {
            names: lists.names.len(),
            types: lists.types.len(),
            vals: lists.vals.len(),
        });
    }
    Ok(lists)
}

fn split_list(s: &str) -> Vec<String> {
    let s = s.trim();
    if s.is_empty() {
        return Vec::new();
    }
    s.split(GROUP_SEP).map(|part| part.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_groups_and_dims() {
        assert_eq!(
            parse_shapes("224,224,3; 1, 2 ,3").expect("valid"),
            vec![vec![224, 224, 3], vec![1, 2, 3]]
        );
        assert_eq!(parse_shapes("7").expect("valid"), vec![vec![7]]);
    }

    #[test]
    fn blank_shape_field_is_zero_groups() {
        assert_eq!(parse_shapes("").expect("valid"), Vec::<Shape>::new());
        assert_eq!(parse_shapes("   ").expect("valid"), Vec::<Shape>::new());
    }

    #[test]
    fn rejects_float_and_non_positive_dims() {
        assert_eq!(
            parse_shapes("1,2.0,3"),
            Err(ParseError::FloatDimension("2.0".to_string()))
        );
        assert_eq!(parse_shapes("1,.5"), Err(ParseError::FloatDimension(".5".to_string())));
        assert_eq!(parse_shapes("1,0,3"), Err(ParseError::NonPositiveDimension(0)));
        assert_eq!(parse_shapes("4;-2"), Err(ParseError::NonPositiveDimension(-2)));
    }

    #[test]
    fn rejects_garbage_and_empty_tokens() {
        assert_eq!(parse_shapes("1,x"), Err(ParseError::InvalidDimension("x".to_string())));
        assert_eq!(parse_shapes("1,,2"), Err(ParseError::InvalidDimension(String::new())));
        assert_eq!(parse_shapes("1,2;"), Err(ParseError::InvalidDimension(String::new())));
        assert!(parse_shapes("99999999999999999999").is_err());
    }

    #[test]
    fn every_parsed_dim_is_positive() {
        for s in ["1", "3,4", "1,1,1;2,2,2", "640, 480 ,3", "8;8;8;8"] {
            let shapes = parse_shapes(s).expect(s);
            assert!(shapes.iter().flatten().all(|&d| d > 0), "{s}");
        }
    }

    #[test]
    fn types_are_trimmed_not_checked() {
        assert_eq!(parse_types(" uint8 ; float16;bogus"), vec!["uint8", "float16", "bogus"]);
        assert!(parse_types("").is_empty());
    }

    #[test]
    fn attr_lists_line_up() {
        let lists = parse_attr_lists("axis;descending", "int;bool", "1;true").expect("valid");
        assert_eq!(lists.names, vec!["axis", "descending"]);
        assert_eq!(lists.types, vec!["int", "bool"]);
        assert_eq!(lists.vals, vec!["1", "true"]);
        assert!(parse_attr_lists("", "", "").expect("valid").is_empty());
    }

    #[test]
    fn attr_lists_all_or_nothing() {
        assert_eq!(
            parse_attr_lists("axis", "", ""),
            Err(ParseError::PartialAttrDeclaration)
        );
        assert_eq!(
            parse_attr_lists("axis", "int", ""),
            Err(ParseError::PartialAttrDeclaration)
        );
        assert_eq!(
            parse_attr_lists("axis;descending", "int", "1"),
            Err(ParseError::AttrLengthMismatch {
                names: 2,
                types: 1,
                vals: 1
            })
        );
    }
}
