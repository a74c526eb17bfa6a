//! # Coercion Helpers
//!
//! Best-effort conversions between primitive shapes, used by non-strict
//! validation and by the built-in numeric and length rules.
//!
//! Numeric parsing follows the host conventions: surrounding whitespace is
//! ignored, the empty string is zero, `Infinity` is accepted by name and
//! `0x`/`0o`/`0b` prefixes are honoured. Anything else that `f64` would not
//! parse is not numeric.

use crate::value::{Value, ValueType};

/// Render a number the way it appears as a property key or string.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        format!("{n}")
    }
}

/// Parse a string as a number; `None` when it is not numeric.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    let (sign, unsigned) = match trimmed.as_bytes()[0] {
        b'-' => (-1.0, &trimmed[1..]),
        b'+' => (1.0, &trimmed[1..]),
        _ => (1.0, trimmed),
    };
    if unsigned == "Infinity" {
        return Some(sign * f64::INFINITY);
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix).ok().map(|n| n as f64);
        }
    }
    // Rust accepts "inf" and "nan" spellings that the host does not.
    if unsigned
        .bytes()
        .any(|b| !(b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-')))
    {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Numeric reading of a value. Containers, functions and `Undefined`
/// have none.
pub fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) if n.is_nan() => None,
        Value::Number(n) => Some(*n),
        Value::String(s) => parse_number(s),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        Value::Undefined | Value::Array(_) | Value::Object(_) | Value::Function(_) => None,
    }
}

/// Whether the value reads as a number.
pub fn is_numeric(value: &Value) -> bool {
    to_number(value).is_some()
}

/// Whether the value reads as a whole number.
pub fn is_integer(value: &Value) -> bool {
    to_number(value).is_some_and(|n| n.is_finite() && n.fract() == 0.0)
}

/// Length of an array, string (in characters) or record (in members).
pub fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::Array(items) => Some(items.len()),
        Value::String(s) => Some(s.chars().count()),
        Value::Object(record) => Some(record.len()),
        _ => None,
    }
}

/// Absent, null, or of length zero.
pub fn is_empty(value: &Value) -> bool {
    value.is_nullish() || length_of(value) == Some(0)
}

/// Convert `value` to the primitive shape `target`.
///
/// Values already of the target shape are returned unchanged. Conversions
/// that cannot be recovered yield `Undefined`.
pub fn cast(value: Value, target: ValueType) -> Value {
    if value.type_of() == target {
        return value;
    }
    match target {
        ValueType::String => match &value {
            Value::Null => Value::from("null"),
            Value::Bool(b) => Value::from(b.to_string()),
            Value::Number(n) => Value::from(format_number(*n)),
            _ => Value::Undefined,
        },
        ValueType::Number => to_number(&value).map_or(Value::Undefined, Value::Number),
        ValueType::Boolean => match value.as_str() {
            Some("true") => Value::Bool(true),
            Some("false") => Value::Bool(false),
            _ => Value::Bool(to_number(&value).is_some_and(|n| n != 0.0)),
        },
        _ => Value::Undefined,
    }
}
