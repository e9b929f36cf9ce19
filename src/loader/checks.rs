//! Generic rule checks shared by every family.

use crate::descriptor::{DataType, Shape};
use crate::error::{Side, ValidationError};
use crate::parse::AttrLists;
use crate::rules::{AttrSpec, AttrType, FamilyDef};

/// Arity, rank and shape-equality checks driven by the family's rule.
pub fn check_shape_rule(
    def: &FamilyDef,
    inputs: &[Shape],
    outputs: &[Shape],
) -> Result<(), ValidationError> {
    if inputs.is_empty() {
        return Err(ValidationError::EmptyShapes(Side::Input));
    }
    if outputs.is_empty() {
        return Err(ValidationError::EmptyShapes(Side::Output));
    }

    let rule = &def.rule;
    if let Some(expected) = rule.input_arity.fixed() {
        if inputs.len() != expected {
            return Err(ValidationError::Arity {
                family: def.name,
                side: Side::Input,
                expected,
                actual: inputs.len(),
            });
        }
    }
    if let Some(expected) = rule.output_arity.fixed() {
        if outputs.len() != expected {
            return Err(ValidationError::Arity {
                family: def.name,
                side: Side::Output,
                expected,
                actual: outputs.len(),
            });
        }
    }

    let rank = inputs[0].len();
    if inputs.iter().any(|shape| shape.len() != rank) {
        return Err(ValidationError::RankMismatch(
            inputs.iter().map(Vec::len).collect(),
        ));
    }
    let max = rule.max_rank.unwrap_or(usize::MAX);
    if rank < rule.min_rank || rank > max {
        return Err(ValidationError::RankOutOfRange {
            family: def.name,
            rank,
            min: rule.min_rank,
            max,
        });
    }

    if rule.shapes_must_match {
        let expected = &inputs[0];
        if let Some(other) = inputs.iter().chain(outputs).find(|shape| *shape != expected) {
            return Err(ValidationError::ShapeMismatch {
                family: def.name,
                expected: expected.clone(),
                actual: other.clone(),
            });
        }
    }
    Ok(())
}

/// Resolved data types of one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTypes {
    pub inputs: Vec<DataType>,
    pub outputs: Vec<DataType>,
}

/// Map type names onto the family's accepted sets.
pub fn resolve_types(
    def: &FamilyDef,
    inputs: &[String],
    outputs: &[String],
) -> Result<ResolvedTypes, ValidationError> {
    if inputs.is_empty() {
        return Err(ValidationError::MissingTypes(Side::Input));
    }
    if outputs.is_empty() {
        return Err(ValidationError::MissingTypes(Side::Output));
    }
    Ok(ResolvedTypes {
        inputs: resolve_side(def, Side::Input, inputs, def.input_types)?,
        outputs: resolve_side(def, Side::Output, outputs, def.output_types)?,
    })
}

fn resolve_side(
    def: &FamilyDef,
    side: Side,
    names: &[String],
    accepted: &[DataType],
) -> Result<Vec<DataType>, ValidationError> {
    names
        .iter()
        .map(|name| {
            let dtype = DataType::from_name(name)
                .ok_or_else(|| ValidationError::UnknownType(name.clone()))?;
            if !accepted.contains(&dtype) || (def.rule.integer_only && !dtype.is_integer()) {
                return Err(ValidationError::UnsupportedType {
                    family: def.name,
                    side,
                    ty: name.clone(),
                });
            }
            Ok(dtype)
        })
        .collect()
}

/// Inputs agree on one type and every output carries it too.
pub fn check_same_as_input(def: &FamilyDef, types: &ResolvedTypes) -> Result<(), ValidationError> {
    let first = types.inputs[0];
    if types.inputs.iter().any(|&t| t != first) {
        return Err(ValidationError::InputTypeMismatch {
            family: def.name,
            types: types.inputs.iter().map(|t| t.name().to_string()).collect(),
        });
    }
    if let Some(&other) = types.outputs.iter().find(|&&t| t != first) {
        return Err(ValidationError::OutputType {
            family: def.name,
            expected: first.name().to_string(),
            actual: other.name().to_string(),
        });
    }
    Ok(())
}

/// Column lengths agree and the declaration matches the schema exactly.
pub fn check_attr_schema(
    schema: Option<&[AttrSpec]>,
    attrs: &AttrLists,
    op_name: &str,
) -> Result<(), ValidationError> {
    if attrs.names.len() != attrs.types.len() || attrs.names.len() != attrs.vals.len() {
        return Err(ValidationError::AttrLengthMismatch {
            names: attrs.names.len(),
            types: attrs.types.len(),
            vals: attrs.vals.len(),
        });
    }

    let Some(schema) = schema else {
        if attrs.is_empty() {
            return Ok(());
        }
        return Err(ValidationError::UnexpectedAttributes {
            op_name: op_name.to_string(),
            got: attrs.names.clone(),
        });
    };

    let matches = schema.len() == attrs.len()
        && schema
            .iter()
            .zip(attrs.names.iter().zip(&attrs.types))
            .all(|(spec, (name, ty))| {
                spec.name == name && AttrType::from_name(ty) == Some(spec.ty)
            });
    if !matches {
        return Err(ValidationError::AttributeSchema {
            op_name: op_name.to_string(),
            expected: schema.iter().map(AttrSpec::label).collect(),
            actual: attrs
                .names
                .iter()
                .zip(&attrs.types)
                .map(|(name, ty)| format!("{name}:{ty}"))
                .collect(),
        });
    }
    Ok(())
}

/// Value of a declared attribute, if present.
pub fn attr_value<'a>(attrs: &'a AttrLists, name: &str) -> Option<&'a str> {
    attrs
        .names
        .iter()
        .position(|n| n == name)
        .map(|i| attrs.vals[i].as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{attr_schema, family};
    use pretty_assertions::assert_eq;

    fn def(name: &str) -> &'static FamilyDef {
        family(name).expect("known family")
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn arity_is_checked_per_side() {
        let err = check_shape_rule(def("Divide"), &[vec![1, 1, 1]], &[vec![1, 1, 1]]);
        assert_eq!(
            err,
            Err(ValidationError::Arity {
                family: "Divide",
                side: Side::Input,
                expected: 2,
                actual: 1
            })
        );
        let err = check_shape_rule(
            def("Add"),
            &[vec![2, 2], vec![2, 2]],
            &[vec![2, 2], vec![2, 2]],
        );
        assert!(matches!(err, Err(ValidationError::Arity { side: Side::Output, .. })));
    }

    #[test]
    fn empty_sides_are_rejected() {
        assert_eq!(
            check_shape_rule(def("Abs"), &[], &[vec![1]]),
            Err(ValidationError::EmptyShapes(Side::Input))
        );
        assert_eq!(
            check_shape_rule(def("Abs"), &[vec![1]], &[]),
            Err(ValidationError::EmptyShapes(Side::Output))
        );
    }

    #[test]
    fn rank_rules() {
        assert!(matches!(
            check_shape_rule(def("Add"), &[vec![2, 2], vec![2, 2, 1]], &[vec![2, 2]]),
            Err(ValidationError::RankMismatch(_))
        ));
        assert!(matches!(
            check_shape_rule(def("Abs"), &[vec![1, 1, 1, 1, 1]], &[vec![1, 1, 1, 1, 1]]),
            Err(ValidationError::RankOutOfRange { rank: 5, max: 4, .. })
        ));
    }

    #[test]
    fn matching_shapes_required_for_elementwise() {
        assert!(check_shape_rule(def("Add"), &[vec![4, 4, 3], vec![4, 4, 3]], &[vec![4, 4, 3]]).is_ok());
        assert!(matches!(
            check_shape_rule(def("Add"), &[vec![4, 4, 3], vec![4, 4, 3]], &[vec![4, 4, 1]]),
            Err(ValidationError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn types_must_be_known_and_accepted() {
        assert_eq!(
            resolve_types(def("Sqrt"), &names(&["uint8"]), &names(&["uint8"])),
            Err(ValidationError::UnsupportedType {
                family: "Sqrt",
                side: Side::Input,
                ty: "uint8".to_string()
            })
        );
        assert_eq!(
            resolve_types(def("Abs"), &names(&["double"]), &names(&["double"])),
            Err(ValidationError::UnknownType("double".to_string()))
        );
        assert!(matches!(
            resolve_types(def("BitwiseAnd"), &names(&["uint8", "float"]), &names(&["uint8"])),
            Err(ValidationError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn schema_must_match_in_order() {
        let schema = attr_schema("Sort");
        let ok = AttrLists {
            names: names(&["axis", "descending"]),
            types: names(&["int", "bool"]),
            vals: names(&["1", "false"]),
        };
        assert!(check_attr_schema(schema, &ok, "Sort").is_ok());

        let swapped = AttrLists {
            names: names(&["descending", "axis"]),
            types: names(&["bool", "int"]),
            vals: names(&["false", "1"]),
        };
        assert!(matches!(
            check_attr_schema(schema, &swapped, "Sort"),
            Err(ValidationError::AttributeSchema { .. })
        ));

        let wrong_type = AttrLists {
            names: names(&["axis", "descending"]),
            types: names(&["float", "bool"]),
            vals: names(&["1", "false"]),
        };
        assert!(check_attr_schema(schema, &wrong_type, "Sort").is_err());
    }

    #[test]
    fn schemaless_families_reject_attributes() {
        let attrs = AttrLists {
            names: names(&["alpha"]),
            types: names(&["float"]),
            vals: names(&["0.5"]),
        };
        assert_eq!(
            check_attr_schema(None, &attrs, "Add"),
            Err(ValidationError::UnexpectedAttributes {
                op_name: "Add".to_string(),
                got: names(&["alpha"])
            })
        );
        assert!(check_attr_schema(None, &AttrLists::default(), "Add").is_ok());
    }
}
