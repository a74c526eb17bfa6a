//! # Deep Structural Equality
//!
//! Exact-match filters (`allow`, `valid`, `invalid`) compare values with
//! [`equals`]. Two values are equal when they have the same shape and
//! equal members all the way down.
//!
//! Differences from IEEE comparison: `NaN` equals `NaN`. Functions compare
//! by identity. Record class tags are ignored.

use crate::value::{Record, Value};

/// Deep structural equality.
pub fn equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| equals(x, y))
        }
        (Value::Object(a), Value::Object(b)) => equals_records(a, b),
        (Value::Function(a), Value::Function(b)) => a.same_as(b),
        _ => false,
    }
}

/// Member-wise equality of two records.
pub fn equals_records(left: &Record, right: &Record) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .all(|(key, value)| right.get(key).is_some_and(|other| equals(value, other)))
}

/// Equality that folds case when both sides are strings.
pub fn equals_ignoring_case(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::String(a), Value::String(b)) => a.to_lowercase() == b.to_lowercase(),
        _ => equals(left, right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_nan_equals_nan() {
        assert!(equals(&Value::Number(f64::NAN), &Value::Number(f64::NAN)));
    }

    #[test]
    fn test_nested_structures() {
        let a = Value::from(json!({"x": [1, {"y": "z"}], "w": null}));
        let b = Value::from(json!({"w": null, "x": [1, {"y": "z"}]}));
        let c = Value::from(json!({"w": null, "x": [1, {"y": "Z"}]}));
        assert!(equals(&a, &b));
        assert!(!equals(&a, &c));
    }

    #[test]
    fn test_null_is_not_undefined() {
        assert!(!equals(&Value::Null, &Value::Undefined));
    }

    #[test]
    fn test_shape_mismatch() {
        assert!(!equals(&Value::from(json!([])), &Value::from(json!({}))));
        assert!(!equals(&Value::from("1"), &Value::from(1)));
    }

    #[test]
    fn test_record_class_is_ignored() {
        let a = Value::from(Record::instance("A").with("k", 1));
        let b = Value::from(Record::new().with("k", 1));
        assert!(equals(&a, &b));
    }

    #[test]
    fn test_ignoring_case() {
        assert!(equals_ignoring_case(&Value::from("Hello"), &Value::from("hELLO")));
        assert!(!equals_ignoring_case(&Value::from("Hello"), &Value::from("world")));
    }

    fn json_value() -> impl Strategy<Value = serde_json::Value> {
        let leaf = prop_oneof![
            Just(serde_json::Value::Null),
            any::<bool>().prop_map(serde_json::Value::Bool),
            any::<i32>().prop_map(|n| json!(n)),
            "[a-z]{0,8}".prop_map(serde_json::Value::String),
        ];
        leaf.prop_recursive(3, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(serde_json::Value::Array),
                prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                    .prop_map(|m| serde_json::Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        /// Every value equals a copy of itself.
        #[test]
        fn equality_is_reflexive(json in json_value()) {
            let value = Value::from(json);
            prop_assert!(equals(&value, &value.clone()));
        }

        /// Equality agrees with JSON equality for JSON-shaped values.
        #[test]
        fn equality_matches_json(a in json_value(), b in json_value()) {
            prop_assert_eq!(equals(&Value::from(a.clone()), &Value::from(b.clone())), a == b);
        }
    }
}
