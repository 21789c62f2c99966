//! Structural validation of JSON values against a `JsonSchema`.
use serde_json::{Map, Value};

use crate::error::kind_name;
use crate::pointer::Pointer;
use crate::schema::{JsonSchema, ObjectField};

/// First place where a value departs from its schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("at {at}: {reason}")]
pub struct Mismatch {
    pub at: String,
    pub reason: Reason,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Reason {
    #[error("expected {expected}, found {found}")]
    WrongKind {
        expected: &'static str,
        found: &'static str,
    },
    #[error("key `{0}` is not declared")]
    UnexpectedKey(String),
    #[error("required key `{0}` is missing")]
    MissingKey(String),
    #[error("value differs from the constant")]
    NotConst,
    #[error("none of {0} alternatives matched")]
    NoAlternative(usize),
}

/// Does `value` conform to `schema`?
pub fn validate(value: &Value, schema: &JsonSchema) -> bool {
    check(value, schema).is_ok()
}

/// Like `validate`, but reports where and why the value was rejected.
pub fn check(value: &Value, schema: &JsonSchema) -> Result<(), Mismatch> {
    check_at(value, schema, &mut Pointer::root()).map_err(|(at, reason)| Mismatch { at, reason })
}

type Failure = (String, Reason);

fn check_at(value: &Value, schema: &JsonSchema, at: &mut Pointer) -> Result<(), Failure> {
    match schema {
        JsonSchema::Any => Ok(()),
        JsonSchema::Null => kind(value, at, "null", value.is_null()),
        JsonSchema::Bool => kind(value, at, "boolean", value.is_boolean()),
        JsonSchema::String => kind(value, at, "string", value.is_string()),
        JsonSchema::Number => kind(value, at, "number", value.is_number()),
        JsonSchema::Array(element) => {
            let Value::Array(items) = value else {
                return kind(value, at, "array", false);
            };
            items
                .iter()
                .enumerate()
                .try_for_each(|(ix, item)| at.with(&ix.to_string(), |at| check_at(item, element, at)))
        }
        JsonSchema::Object(fields) => {
            let Value::Object(map) = value else {
                return kind(value, at, "object", false);
            };
            check_object(map, fields, at)
        }
        JsonSchema::Const(expected) if json_eq(value, expected) => Ok(()),
        JsonSchema::Const(_) => Err((at.to_string(), Reason::NotConst)),
        JsonSchema::Choice(alternatives) => {
            if alternatives.iter().any(|alternative| validate(value, alternative)) {
                Ok(())
            } else {
                Err((at.to_string(), Reason::NoAlternative(alternatives.len())))
            }
        }
        JsonSchema::Comment(_, inner) => check_at(value, inner, at),
    }
}

fn check_object(map: &Map<String, Value>, fields: &[ObjectField], at: &mut Pointer) -> Result<(), Failure> {
    // closed: every present key must be declared
    for (key, value) in map {
        let Some(field) = fields.iter().find(|f| &f.key == key) else {
            return Err((at.to_string(), Reason::UnexpectedKey(key.clone())));
        };
        at.with(key, |at| check_at(value, &field.schema, at))?;
    }
    match fields.iter().find(|f| f.is_required() && !map.contains_key(&f.key)) {
        Some(missing) => Err((at.to_string(), Reason::MissingKey(missing.key.clone()))),
        None => Ok(()),
    }
}

/// Structural equality where numbers compare by value: `1`, `1.0` and `1e0`
/// are the same JSON number.
fn json_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) if a.is_f64() || b.is_f64() => {
            a.as_f64() == b.as_f64()
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| json_eq(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter().all(|(key, x)| b.get(key).is_some_and(|y| json_eq(x, y)))
        }
        _ => left == right,
    }
}

fn kind(value: &Value, at: &Pointer, expected: &'static str, matches: bool) -> Result<(), Failure> {
    if matches {
        Ok(())
    } else {
        Err((at.to_string(), Reason::WrongKind { expected, found: kind_name(value) }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person() -> JsonSchema {
        JsonSchema::Object(vec![
            ObjectField::required("a", JsonSchema::String),
            ObjectField::optional("b", JsonSchema::Number),
        ])
    }

    #[test]
    fn primitives_check_the_kind_only() {
        assert!(validate(&json!("x"), &JsonSchema::String));
        assert!(!validate(&json!(1), &JsonSchema::String));
        assert!(validate(&json!(-0.5), &JsonSchema::Number));
        assert!(validate(&json!(null), &JsonSchema::Null));
        assert!(!validate(&json!(false), &JsonSchema::Null));
        assert!(validate(&json!({"anything": [1]}), &JsonSchema::Any));
    }

    #[test]
    fn extra_keys_are_rejected() {
        let schema = JsonSchema::Object(vec![ObjectField::required("a", JsonSchema::String)]);
        assert_eq!(
            check(&json!({"a": "x", "b": 1}), &schema),
            Err(Mismatch { at: "#".into(), reason: Reason::UnexpectedKey("b".into()) }),
        );
    }

    #[test]
    fn optional_keys_may_be_absent() {
        assert!(validate(&json!({"a": "x"}), &person()));
        assert!(validate(&json!({"b": 2, "a": "x"}), &person()));
        assert_eq!(
            check(&json!({"b": 2}), &person()),
            Err(Mismatch { at: "#".into(), reason: Reason::MissingKey("a".into()) }),
        );
    }

    #[test]
    fn present_optional_keys_must_validate() {
        assert_eq!(
            check(&json!({"a": "x", "b": "two"}), &person()),
            Err(Mismatch {
                at: "#/b".into(),
                reason: Reason::WrongKind { expected: "number", found: "string" },
            }),
        );
        // null is a value, not an absence
        assert!(!validate(&json!({"a": "x", "b": null}), &person()));
    }

    #[test]
    fn arrays_check_every_element() {
        let schema = JsonSchema::array(person());
        assert!(validate(&json!([]), &schema));
        let err = check(&json!([{"a": "x"}, {"a": 1}]), &schema).unwrap_err();
        assert_eq!(err.at, "#/1/a");
        assert_eq!(err.to_string(), "at #/1/a: expected string, found number");
        assert!(!validate(&json!({"0": {"a": "x"}}), &schema));
    }

    #[test]
    fn const_is_structural_equality() {
        let schema = JsonSchema::Const(json!({"v": [1, "x"]}));
        assert!(validate(&json!({"v": [1, "x"]}), &schema));
        assert!(!validate(&json!({"v": [1]}), &schema));
        assert_eq!(check(&json!("v"), &schema).unwrap_err().reason, Reason::NotConst);
    }

    #[test]
    fn const_numbers_compare_by_value() {
        let one: Value = serde_json::from_str("1.0").unwrap();
        assert!(validate(&one, &JsonSchema::Const(json!(1))));
        let hundred: Value = serde_json::from_str("1e2").unwrap();
        assert!(validate(&hundred, &JsonSchema::Const(json!(100))));
        assert!(!validate(&json!(101), &JsonSchema::Const(hundred.clone())));

        let parsed = crate::wire::from_str(r#"{"const": {"n": [1.0]}}"#).unwrap();
        assert!(validate(&json!({"n": [1]}), &parsed));
        assert!(!validate(&json!({"n": [1], "m": 2}), &parsed));
        assert!(!validate(&json!(-1), &JsonSchema::Const(json!(1u64))));
    }

    #[test]
    fn choice_needs_one_matching_alternative() {
        let schema = JsonSchema::Choice(vec![JsonSchema::String, JsonSchema::Const(json!(0))]);
        assert!(validate(&json!("x"), &schema));
        assert!(validate(&json!(0), &schema));
        assert_eq!(check(&json!(1), &schema).unwrap_err().reason, Reason::NoAlternative(2));
    }

    #[test]
    fn comments_are_transparent() {
        let schema = JsonSchema::comment("note", JsonSchema::Bool);
        assert!(validate(&json!(true), &schema));
        assert!(!validate(&json!("true"), &schema));
    }
}
