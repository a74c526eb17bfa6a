//! # Built-in Rules
//!
//! Predicate constructors behind the typed builders' refinements. Every rule
//! fails with a descriptive record `{type, expected, actual}` so callers can
//! tell which constraint rejected a value.

use std::collections::HashSet;
use std::sync::LazyLock;

use conform_core::{coerce, is_empty, is_integer, is_numeric, length_of, Record, Value};
use regex::Regex;

use crate::compiled::{Check, Verdict};

static ALPHANUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-zA-Z]*$").expect("alphanum pattern"));

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]*$").expect("digits pattern"));

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(\w+:?\w*@)?(\S+)(:[0-9]+)?(/|/([\w#!:.?+=&%@!\-/]))?$")
        .expect("url pattern")
});

fn failure(rule: &str, expected: impl Into<Value>, actual: &Value) -> Verdict {
    Verdict::Fail(Value::Object(
        Record::new()
            .with("type", rule)
            .with("expected", expected)
            .with("actual", actual.clone()),
    ))
}

fn verdict(passed: bool, rule: &str, expected: impl Into<Value>, actual: &Value) -> Verdict {
    if passed {
        Verdict::Pass
    } else {
        failure(rule, expected, actual)
    }
}

/// The value as text, the way a host string conversion would render it.
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => coerce::format_number(*n),
        other => other.property_key().unwrap_or_else(|| other.to_string()),
    }
}

// ─── Universal ──────────────────────────────────────────────────────

pub fn not_empty() -> Check {
    Check::new("not_empty", |value: &Value| {
        verdict(!is_empty(value), "not_empty", Value::Undefined, value)
    })
}

// ─── Length ─────────────────────────────────────────────────────────

fn length_rule(rule: &'static str, bound: usize, cmp: fn(usize, usize) -> bool) -> Check {
    Check::new(rule, move |value: &Value| {
        let passed = length_of(value).is_some_and(|len| cmp(len, bound));
        verdict(passed, rule, bound as f64, value)
    })
}

pub fn min_length(bound: usize) -> Check {
    length_rule("min_length", bound, |len, bound| len >= bound)
}

pub fn max_length(bound: usize) -> Check {
    length_rule("max_length", bound, |len, bound| len <= bound)
}

pub fn length(exact: usize) -> Check {
    length_rule("length", exact, |len, exact| len == exact)
}

// ─── Number ─────────────────────────────────────────────────────────

fn bound_rule(rule: &'static str, bound: f64, cmp: fn(f64, f64) -> bool) -> Check {
    Check::new(rule, move |value: &Value| {
        let passed = coerce::to_number(value).is_some_and(|n| cmp(n, bound));
        verdict(passed, rule, bound, value)
    })
}

pub fn min(bound: f64) -> Check {
    bound_rule("min", bound, |n, bound| n >= bound)
}

pub fn max(bound: f64) -> Check {
    bound_rule("max", bound, |n, bound| n <= bound)
}

pub fn greater(bound: f64) -> Check {
    bound_rule("greater", bound, |n, bound| n > bound)
}

pub fn lesser(bound: f64) -> Check {
    bound_rule("lesser", bound, |n, bound| n < bound)
}

pub fn integer() -> Check {
    Check::new("integer", |value: &Value| {
        verdict(is_integer(value), "integer", Value::Undefined, value)
    })
}

// ─── String ─────────────────────────────────────────────────────────

pub fn matches(pattern: Regex) -> Check {
    let expected = pattern.as_str().to_string();
    Check::new("matches", move |value: &Value| {
        verdict(pattern.is_match(&text_of(value)), "matches", expected.as_str(), value)
    })
}

fn pattern_rule(rule: &'static str, pattern: &'static LazyLock<Regex>) -> Check {
    Check::new(rule, move |value: &Value| {
        verdict(pattern.is_match(&text_of(value)), rule, pattern.as_str(), value)
    })
}

pub fn alphanum() -> Check {
    pattern_rule("alphanum", &ALPHANUM)
}

pub fn digits() -> Check {
    pattern_rule("digits", &DIGITS)
}

pub fn url() -> Check {
    pattern_rule("url", &URL)
}

pub fn lowercase() -> Check {
    Check::new("lowercase", |value: &Value| {
        let text = text_of(value);
        verdict(text.to_lowercase() == text, "lowercase", Value::Undefined, value)
    })
}

pub fn uppercase() -> Check {
    Check::new("uppercase", |value: &Value| {
        let text = text_of(value);
        verdict(text.to_uppercase() == text, "uppercase", Value::Undefined, value)
    })
}

pub fn numeric() -> Check {
    Check::new("numeric", |value: &Value| {
        verdict(is_numeric(value), "numeric", Value::Undefined, value)
    })
}

// ─── Array ──────────────────────────────────────────────────────────

/// No number or string element occurs twice. Numbers and strings are kept
/// apart, so `1` and `"1"` do not collide. Other elements are ignored.
pub fn unique() -> Check {
    Check::new("unique", |value: &Value| {
        let Some(items) = value.as_array() else {
            return failure("unique", Value::Undefined, value);
        };
        let mut seen = HashSet::new();
        for item in items {
            let key = match item {
                Value::Number(n) => format!("n:{}", coerce::format_number(*n)),
                Value::String(s) => format!("s:{s}"),
                _ => continue,
            };
            if !seen.insert(key) {
                return failure("unique", Value::Undefined, value);
            }
        }
        Verdict::Pass
    })
}

// ─── Object ─────────────────────────────────────────────────────────

pub fn instance_of(class: String) -> Check {
    Check::new("instance_of", move |value: &Value| {
        let passed = value
            .as_record()
            .and_then(|record| record.class())
            .is_some_and(|tag| tag == class);
        verdict(passed, "instance_of", class.as_str(), value)
    })
}
