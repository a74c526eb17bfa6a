//! # Error Types
//!
//! Data problems never surface here: a value that does not match its schema
//! produces [`Report`](crate::Report)s inside a validation result. The
//! errors below are programmer errors, raised at API boundaries.

use thiserror::Error;

use crate::report::Violations;

/// Top-level error type for conform.
#[derive(Error, Debug)]
pub enum ConformError {
    /// The options bag passed to `validate` does not satisfy the options
    /// meta-schema.
    #[error("invalid validation options:\n{violations}")]
    InvalidOptions {
        /// Everything the meta-schema rejected.
        violations: Violations,
    },

    /// Conversion to or from JSON failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
