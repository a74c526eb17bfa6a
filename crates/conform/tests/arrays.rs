//! Array length rules, includes, excludes and uniqueness.

mod common;

use common::{accepts, check, check_with, v};
use conform::prelude::*;
use conform::tags;
use serde_json::json;

#[test]
fn test_exact_length() {
    let schema = array().length(3);
    let result = check(v(json!([1, 2, 3])), schema.clone());
    assert!(result.is_valid());
    assert_eq!(result.value, v(json!([1, 2, 3])));
    assert!(!accepts(v(json!([1, 2])), schema.clone()));
    assert!(!accepts(v(json!([])), schema.clone()));
    assert!(!accepts(v(json!(["a", "b", "c", "d"])), schema));
}

#[test]
fn test_min_length() {
    let schema = array().min_length(3);
    assert!(accepts(v(json!([1, 2, 3])), schema.clone()));
    assert!(accepts(v(json!(["a", "b", "c", "d"])), schema.clone()));
    assert!(!accepts(v(json!([1, 2])), schema.clone()));
    assert!(!accepts(v(json!([])), schema));
}

#[test]
fn test_max_length() {
    let schema = array().max_length(3);
    for ok in [json!([1, 2, 3]), json!([1, 2]), json!([])] {
        let result = check(v(ok.clone()), schema.clone());
        assert!(result.is_valid());
        assert_eq!(result.value, v(ok));
    }
    assert!(!accepts(v(json!(["a", "b", "c", "d"])), schema));
}

#[test]
fn test_min_and_max_length() {
    let schema = array().min_length(3).max_length(3);
    let result = check(v(json!([1, 2, 3])), schema.clone());
    assert!(result.is_valid());
    assert_eq!(result.value, v(json!([1, 2, 3])));
    for rejected in [json!([1, 2]), json!([]), json!([1, 2, 3, 4])] {
        let result = check(v(rejected), schema.clone());
        assert_eq!(result.errors[0].tag, tags::CHECKS_FAILED);
    }
}

#[test]
fn test_length_failure_names_the_rule() {
    let result = check(v(json!([1, 2])), array().min_length(3));
    let Value::Array(details) = &result.errors[0].expected else {
        panic!("expected failure details");
    };
    assert_eq!(details[0].get("type"), &Value::from("min_length"));
    assert_eq!(details[0].get("expected"), &Value::from(3));
}

#[test]
fn test_includes_numbers() {
    let schema = array().includes(number());
    assert!(accepts(v(json!([1, 2, 3, 4])), schema.clone()));

    let result = check(v(json!([1, 2, "x", 4])), schema);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].tag, tags::MISMATCHING_TYPES);
    assert_eq!(result.errors[0].source_path, "/2");
}

#[test]
fn test_includes_any_of_several() {
    let schema = array().includes_all([
        array().includes(number()),
        array().includes(string()),
    ]);
    assert!(accepts(v(json!([])), schema.clone()));
    assert!(accepts(v(json!([[1, 2], [], ["hello"], [3]])), schema.clone()));
    assert!(!accepts(v(json!([[1, "mixed"]])), schema));
}

#[test]
fn test_excludes_numbers() {
    let schema = array().excludes(number());
    assert!(accepts(v(json!([])), schema.clone()));

    let result = check(v(json!(["foo", [], "bar"])), schema.clone());
    assert!(result.is_valid());
    assert_eq!(result.value, v(json!(["foo", [], "bar"])));

    assert!(!accepts(v(json!([10, 20, 30])), schema.clone()));
    let result = check(v(json!(["foo", 1, "bar"])), schema);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].tag, tags::MATCHED_EXCLUDED_TYPE);
    assert_eq!(result.errors[0].source_path, "/1");
}

#[test]
fn test_unique() {
    let schema = array().unique();
    assert!(accepts(v(json!([1, 2, 3, "foo", "bar"])), schema.clone()));
    assert!(!accepts(v(json!([1, 2, "foo", 3, "foo", "bar"])), schema));
}

#[test]
fn test_nested_element_paths() {
    // An optional member's failure would downgrade to a warning.
    let item = object().key("id", number().required());
    let schema = object().key("list", array().includes(item).required());
    let result = check(v(json!({"list": [{"id": 1}, {}]})), schema);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].tag, tags::REQUIRED_MISSING);
    assert_eq!(result.errors[0].source_path, "/list/1/id");
}

#[test]
fn test_uncastable_array_becomes_empty() {
    let result = check_with("x", array(), json!({"strict": false}));
    assert!(result.is_valid());
    assert_eq!(result.value, v(json!([])));
    assert_eq!(result.warnings[0].tag, tags::MISMATCHING_TYPES);
}
