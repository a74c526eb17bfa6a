//! Post-descent checks and the warnings they contribute.

mod common;

use common::{check, check_with, v};
use conform::prelude::*;
use conform::tags;
use serde_json::json;

fn balanced(value: &Value) -> Value {
    let a = value.get("a").as_f64();
    let b = value.get("b").as_f64();
    match (a, b) {
        (Some(a), Some(b)) if a == -b => Value::Bool(true),
        _ => Value::from(Record::new().with("msgType", "custom_error")),
    }
}

#[test]
fn test_record_detail_becomes_warning() {
    let schema = object()
        .key("a", number().check(|_: &Value| true))
        .key("b", number())
        .check(balanced);
    let result = check(v(json!({"a": 3, "b": -4})), schema);
    assert!(result.is_valid());
    assert_eq!(result.value, v(json!({"a": 3, "b": -4})));
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].field("msgType"), Value::from("custom_error"));
    assert_eq!(result.warnings[0].tag, tags::CHECK_FAILED);
    assert_eq!(result.warnings[0].source_value, v(json!({"a": 3, "b": -4})));
}

#[test]
fn test_passing_post_check_adds_nothing() {
    let schema = object().key("a", number()).key("b", number()).check(balanced);
    let result = check(v(json!({"a": 3, "b": -3})), schema);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_sequence_detail_is_flattened() {
    let schema = object().check(|_: &Value| {
        Value::from(vec![
            Value::from(Record::new().with("msgType", "some_error")),
            Value::from("some_warning"),
            Value::from(vec![Value::from("nested_warning")]),
        ])
    });
    let result = check_with(
        v(json!({"a": 3, "b": -4})),
        schema,
        json!({"allowUnknown": true, "warnUnknown": false}),
    );
    assert_eq!(result.warnings.len(), 3);
    assert_eq!(result.warnings[0].field("msgType"), Value::from("some_error"));
    assert_eq!(result.warnings[1].tag, "some_warning");
    assert_eq!(result.warnings[2].tag, "nested_warning");
}

#[test]
fn test_record_detail_may_choose_its_tag() {
    let schema = string().check(|_: &Value| Record::new().with("type", "too_fancy"));
    let result = check("x", schema);
    assert_eq!(result.warnings[0].tag, "too_fancy");
    assert_eq!(result.warnings[0].source_path, "");
}

#[test]
fn test_false_post_check_is_a_generic_warning() {
    let result = check(1, number().check(|_: &Value| false));
    assert!(result.is_valid());
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].tag, tags::CHECK_FAILED);
}

#[test]
fn test_post_checks_see_the_descended_value() {
    let schema = object()
        .key("a", number().default(1))
        .check(|value: &Value| value.get("a") == &Value::from(1));
    let result = check(v(json!({})), schema);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_pre_check_details_are_carried_in_expected() {
    let schema = any().satisfy(|_: &Value| "nope").satisfy(|_: &Value| {
        Record::new().with("type", "custom").with("why", "because")
    });
    let result = check(1, schema);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].tag, tags::CHECKS_FAILED);
    let Value::Array(details) = &result.errors[0].expected else {
        panic!("expected failure details");
    };
    assert_eq!(details.len(), 2);
    assert_eq!(details[0].get("type"), &Value::from(tags::CHECK_FAILED));
    assert_eq!(details[1].get("why"), &Value::from("because"));
}

#[test]
fn test_reports_serialize_with_host_names() {
    let result = check(v(json!({})), object().key("a", string().required()));
    let json = serde_json::to_value(&result.errors[0]).unwrap();
    assert_eq!(json["type"], "required_missing");
    assert_eq!(json["sourcePath"], "/a");
}
