//! Error channel: union failures, option bags, misbehaving user code.

mod common;

use common::{check, init_tracing, v};
use conform::prelude::*;
use conform::{tags, ConformError};
use serde_json::json;

#[test]
fn test_no_alternative_matched() {
    let schema = SchemaSource::sequence([SchemaSource::from(string()), number().into()]);
    let result = check(true, schema);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].tag, tags::NO_ALTERNATIVE_MATCHED);
}

#[test]
fn test_first_matching_alternative_wins() {
    let schema = alternatives([
        SchemaSource::from(string().sanitize(|_| Value::from("first"))),
        string().sanitize(|_| Value::from("second")).into(),
    ]);
    assert_eq!(check("x", schema).value, Value::from("first"));
}

#[test]
fn test_malformed_options_are_returned_as_errors() {
    init_tracing();
    let engine = Engine::new();
    let err = engine
        .validate(1, number(), &v(json!({"strict": "very"})))
        .unwrap_err();
    let ConformError::InvalidOptions { violations } = &err else {
        panic!("unexpected error {err}");
    };
    assert_eq!(violations.len(), 1);
    assert_eq!(violations.reports()[0].source_path, "/strict");
    assert!(err.to_string().contains("/strict: mismatching_types"));
}

#[test]
fn test_unknown_option_is_rejected() {
    init_tracing();
    let err = Engine::new()
        .validate(1, number(), &v(json!({"verbose": true})))
        .unwrap_err();
    assert!(matches!(err, ConformError::InvalidOptions { .. }));
}

#[test]
fn test_invalid_presence_option_is_rejected() {
    init_tracing();
    let err = Engine::new()
        .validate(1, number(), &v(json!({"presence": "sometimes"})))
        .unwrap_err();
    assert!(matches!(err, ConformError::InvalidOptions { .. }));
}

#[test]
fn test_required_presence_option_applies_to_undeclared_schemas() {
    init_tracing();
    let result = Engine::new()
        .validate(v(json!({})), object().key("a", any()), &v(json!({"presence": "required"})))
        .unwrap();
    assert_eq!(result.errors[0].tag, tags::REQUIRED_MISSING);
}

#[test]
fn test_panicking_pre_check_fails_only_its_position() {
    let schema = object()
        .key("a", number().satisfy(|_: &Value| -> bool { panic!("user bug") }).required())
        .key("b", number().required());
    let result = check(v(json!({"a": 1, "b": "x"})), schema);
    let tags_seen: Vec<_> = result.errors.iter().map(|r| r.tag.as_str()).collect();
    assert_eq!(tags_seen, [tags::CHECKS_FAILED, tags::MISMATCHING_TYPES]);
}

#[test]
fn test_panicking_post_check_is_ignored() {
    let schema = number().check(|_: &Value| -> bool { panic!("user bug") });
    let result = check(1, schema);
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_panicking_sanitizer_is_a_sanitize_failure() {
    let schema = object().key(
        "a",
        string().sanitize(|_| -> Value { panic!("user bug") }).required(),
    );
    let result = check(v(json!({"a": "x"})), schema);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].tag, tags::SANITIZE_FAILED);
    assert_eq!(result.errors[0].source_path, "/a");
}

#[test]
fn test_invalid_optional_with_default_downgrades() {
    let result = check(v(json!({"a": "x"})), object().key("a", number().default(5)));
    assert!(result.is_valid());
    assert_eq!(result.value, v(json!({"a": 5})));
    assert_eq!(result.warnings[0].tag, tags::MISMATCHING_TYPES);
}

#[test]
fn test_invalid_optional_is_hard_when_downgrade_disabled() {
    init_tracing();
    let result = Engine::new()
        .validate(
            v(json!({"a": "x"})),
            object().key("a", number()),
            &v(json!({"warnOnInvalidOptionals": false})),
        )
        .unwrap();
    assert_eq!(result.errors[0].tag, tags::MISMATCHING_TYPES);
    assert_eq!(result.errors[0].source_path, "/a");
}
