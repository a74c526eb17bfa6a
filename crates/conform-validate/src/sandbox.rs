//! # User Code Sandbox
//!
//! Every call into a user-supplied predicate or sanitizer crosses a
//! recoverable boundary. A panic is logged and reported to the walker as
//! `None`, which turns it into a local decision at that position instead of
//! unwinding through the rest of the validation.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use conform_core::Value;
use conform_schema::{Check, Sanitizer, Verdict};

/// Run a predicate; `None` if it panicked.
pub(crate) fn evaluate(check: &Check, value: &Value, path: &str) -> Option<Verdict> {
    match panic::catch_unwind(AssertUnwindSafe(|| check.evaluate(value))) {
        Ok(verdict) => Some(verdict),
        Err(payload) => {
            tracing::error!(
                check = check.label(),
                path,
                panic = %describe(payload.as_ref()),
                "user-supplied check panicked"
            );
            None
        }
    }
}

/// Run a sanitizer; `None` if it panicked.
pub(crate) fn transform(sanitizer: &Sanitizer, value: Value, path: &str) -> Option<Value> {
    match panic::catch_unwind(AssertUnwindSafe(|| sanitizer.apply(value))) {
        Ok(value) => Some(value),
        Err(payload) => {
            tracing::error!(
                sanitizer = sanitizer.label(),
                path,
                panic = %describe(payload.as_ref()),
                "user-supplied sanitizer panicked"
            );
            None
        }
    }
}

fn describe(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
