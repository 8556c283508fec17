//! Structural validation of raw theory records.
//!
//! Theory collections arrive as JSON. Before decoding into [`Theory`] values,
//! every record is walked field by field so a malformed entry fails fast with
//! the offending theory id and a field path such as `triples[2].subject`,
//! instead of a partial graph or partial script.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::model::Theory;

/// Result type for validation.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

const CONSTRUCT_FIELDS: &[(&str, bool)] = &[("name", true), ("description", false)];
const TRIPLE_FIELDS: &[(&str, bool)] = &[("subject", true), ("predicate", true), ("object", true)];
const ANNOTATION_FIELDS: &[(&str, bool)] = &[
    ("construct", true),
    ("relation", true),
    ("value", true),
    ("source", true),
];

/// Validate and decode a whole theory collection.
///
/// Also rejects duplicate theory ids.
pub fn theories_from_value(value: Value) -> ValidationResult<Vec<Theory>> {
    let Value::Array(items) = value else {
        return Err(ValidationError::NotAnArray {
            found: type_name(&value).into(),
        });
    };

    let mut seen = HashSet::with_capacity(items.len());
    let mut theories = Vec::with_capacity(items.len());
    for (position, item) in items.into_iter().enumerate() {
        let theory = theory_from_value(item, position as u64 + 1)?;
        if !seen.insert(theory.id) {
            return Err(ValidationError::DuplicateId {
                theory_id: theory.id,
            });
        }
        theories.push(theory);
    }
    Ok(theories)
}

/// Validate and decode a single theory record.
///
/// `position` (1-based) identifies the record in errors when its `id` is
/// itself missing or unreadable.
pub fn theory_from_value(value: Value, position: u64) -> ValidationResult<Theory> {
    check_theory(&value, position)?;
    let theory_id = value.get("id").and_then(Value::as_u64).unwrap_or(position);
    serde_json::from_value(value).map_err(|e| {
        tracing::debug!(theory_id, error = %e, "decode failed after structural check");
        ValidationError::WrongType {
            theory_id,
            field: "record".into(),
            expected: "a well-formed theory record",
        }
    })
}

fn check_theory(value: &Value, position: u64) -> ValidationResult<()> {
    let Some(obj) = value.as_object() else {
        return Err(ValidationError::WrongType {
            theory_id: position,
            field: format!("[{}]", position.saturating_sub(1)),
            expected: "an object",
        });
    };

    let theory_id = match obj.get("id") {
        None => {
            return Err(ValidationError::MissingField {
                theory_id: position,
                field: "id".into(),
            });
        }
        Some(id) => id
            .as_u64()
            .filter(|&id| id > 0)
            .ok_or_else(|| ValidationError::WrongType {
                theory_id: position,
                field: "id".into(),
                expected: "a positive integer",
            })?,
    };

    require_string(obj, theory_id, "", "name", true)?;
    require_string(obj, theory_id, "", "description", false)?;
    if let Some(complete) = obj.get("complete") {
        if !complete.is_boolean() {
            return Err(ValidationError::WrongType {
                theory_id,
                field: "complete".into(),
                expected: "a boolean",
            });
        }
    }

    check_list(obj, theory_id, "constructs", CONSTRUCT_FIELDS)?;
    check_list(obj, theory_id, "triples", TRIPLE_FIELDS)?;
    check_list(obj, theory_id, "annotations", ANNOTATION_FIELDS)?;
    Ok(())
}

fn check_list(
    obj: &Map<String, Value>,
    theory_id: u64,
    key: &str,
    fields: &[(&str, bool)],
) -> ValidationResult<()> {
    let Some(list) = obj.get(key) else {
        return Ok(());
    };
    let items = list.as_array().ok_or_else(|| ValidationError::WrongType {
        theory_id,
        field: key.into(),
        expected: "an array",
    })?;

    for (i, item) in items.iter().enumerate() {
        let prefix = format!("{key}[{i}]");
        let entry = item.as_object().ok_or_else(|| ValidationError::WrongType {
            theory_id,
            field: prefix.clone(),
            expected: "an object",
        })?;
        for &(field, required) in fields {
            require_string(entry, theory_id, &prefix, field, required)?;
        }
    }
    Ok(())
}

fn require_string(
    obj: &Map<String, Value>,
    theory_id: u64,
    prefix: &str,
    field: &str,
    required: bool,
) -> ValidationResult<()> {
    let path = || {
        if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        }
    };
    match obj.get(field) {
        None if required => Err(ValidationError::MissingField {
            theory_id,
            field: path(),
        }),
        None | Some(Value::String(_)) => Ok(()),
        Some(_) => Err(ValidationError::WrongType {
            theory_id,
            field: path(),
            expected: "a string",
        }),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn accepts_minimal_and_full_records() {
        let theories = theories_from_value(json!([
            {"id": 1, "name": "Bare"},
            {
                "id": 2,
                "name": "Full",
                "description": "d",
                "picture_path": "",
                "complete": true,
                "constructs": [{"name": "Desire", "description": "Wanting"}],
                "triples": [{"subject": "Desire", "predicate": "influences", "object": "Action"}],
                "annotations": [
                    {"construct": "Desire", "relation": "MF:1", "value": "v", "source": "1"}
                ]
            }
        ]))
        .unwrap();
        assert_eq!(theories.len(), 2);
        assert_eq!(theories[1].triples[0].object, "Action");
        assert_eq!(theories[0].description, "");
    }

    #[test]
    fn construct_description_is_optional() {
        let theories = theories_from_value(json!([
            {"id": 1, "name": "T", "constructs": [{"name": "X"}]}
        ]))
        .unwrap();
        assert_eq!(theories[0].constructs[0].description, "");
    }

    #[test]
    fn missing_nested_field_names_theory_and_path() {
        let err = theories_from_value(json!([
            {"id": 1, "name": "ok"},
            {"id": 9, "name": "T", "triples": [
                {"subject": "a", "predicate": "p", "object": "b"},
                {"subject": "a", "predicate": "p", "object": "b"},
                {"predicate": "p", "object": "b"}
            ]}
        ]))
        .unwrap_err();
        match err {
            ValidationError::MissingField { theory_id, field } => {
                assert_eq!(theory_id, 9);
                assert_eq!(field, "triples[2].subject");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_id_falls_back_to_position() {
        let err =
            theories_from_value(json!([{"id": 1, "name": "a"}, {"name": "b"}])).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::MissingField { theory_id: 2, ref field } if field == "id"
        ));
    }

    #[test]
    fn wrong_types_are_rejected() {
        let err = theories_from_value(json!([{"id": 1, "name": "T", "complete": "yes"}]))
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::WrongType { ref field, .. } if field == "complete"
        ));

        let err =
            theories_from_value(json!([{"id": 1, "name": "T", "constructs": {}}])).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::WrongType { ref field, .. } if field == "constructs"
        ));

        let err = theories_from_value(json!([{
            "id": 1,
            "name": "T",
            "annotations": [{"construct": "X", "relation": "r", "value": 5, "source": "1"}]
        }]))
        .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::WrongType { ref field, .. } if field == "annotations[0].value"
        ));
    }

    #[test]
    fn rejects_non_array_and_duplicate_ids() {
        assert!(matches!(
            theories_from_value(json!({"id": 1})),
            Err(ValidationError::NotAnArray { .. })
        ));
        assert!(matches!(
            theories_from_value(json!([{"id": 4, "name": "a"}, {"id": 4, "name": "b"}])),
            Err(ValidationError::DuplicateId { theory_id: 4 })
        ));
    }

    #[test]
    fn zero_id_is_rejected() {
        let err = theories_from_value(json!([{"id": 0, "name": "T"}])).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::WrongType { theory_id: 1, ref field, expected: "a positive integer" }
                if field == "id"
        ));
    }

    #[test]
    fn non_object_at_position_zero_does_not_underflow() {
        let err = theory_from_value(json!(5), 0).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::WrongType { theory_id: 0, ref field, expected: "an object" }
                if field == "[0]"
        ));
    }
}
