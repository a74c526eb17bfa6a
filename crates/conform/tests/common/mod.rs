//! Shared helpers for the integration suites.

#![allow(dead_code)]

use std::sync::Once;

use conform::{Engine, SchemaSource, ValidationResult, Value};

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

pub fn v(json: serde_json::Value) -> Value {
    Value::from(json)
}

/// Validate with the default options.
pub fn check(value: impl Into<Value>, schema: impl Into<SchemaSource>) -> ValidationResult {
    init_tracing();
    Engine::new()
        .validate(value, schema, &Value::Undefined)
        .expect("default options are valid")
}

/// Validate with an option bag given as JSON.
pub fn check_with(
    value: impl Into<Value>,
    schema: impl Into<SchemaSource>,
    options: serde_json::Value,
) -> ValidationResult {
    init_tracing();
    Engine::new()
        .validate(value, schema, &v(options))
        .expect("options are valid")
}

pub fn accepts(value: impl Into<Value>, schema: impl Into<SchemaSource>) -> bool {
    check(value, schema).is_valid()
}
