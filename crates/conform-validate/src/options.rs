//! # Validation Options
//!
//! The typed configuration record for one validation, and the meta-schema
//! that dynamic option bags are checked against before they are trusted.
//!
//! Option bags are validated by this same engine. They are read with
//! `warn_on_invalid_optionals` turned off, so a malformed entry is a hard
//! error instead of a warning that silently falls back to the default.

use std::sync::Arc;

use conform_core::{ConformError, Value};
use conform_schema::{any, boolean, object, CompiledSchema, Compiler, Presence, Refine};
use serde::{Deserialize, Serialize};

/// How a validation treats unknown members, type mismatches and presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationOptions {
    /// Undeclared object members are accepted instead of failing.
    pub allow_unknown: bool,
    /// Undeclared object members are removed from the result.
    pub strip_unknown: bool,
    /// Accepted undeclared members produce an `unknown_key` warning.
    pub warn_unknown: bool,
    /// Type mismatches fail instead of being coerced with a warning.
    pub strict: bool,
    /// Failures under optional members downgrade to warnings.
    pub warn_on_invalid_optionals: bool,
    /// Presence for schemas that do not declare one.
    pub presence: Presence,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            allow_unknown: false,
            strip_unknown: true,
            warn_unknown: true,
            strict: true,
            warn_on_invalid_optionals: true,
            presence: Presence::Optional,
        }
    }
}

impl ValidationOptions {
    /// Options used while validating an option bag.
    pub(crate) fn for_option_bags() -> Self {
        Self {
            warn_on_invalid_optionals: false,
            ..Self::default()
        }
    }

    /// Read options from a bag the meta-schema has already accepted.
    pub(crate) fn from_validated(bag: &Value) -> Result<Self, ConformError> {
        Ok(serde_json::from_value(bag.to_json())?)
    }

    /// The options as a dynamic bag, keyed by serialized field names.
    pub fn to_value(&self) -> Result<Value, ConformError> {
        Ok(Value::from(serde_json::to_value(self)?))
    }
}

/// Schema every non-empty option bag must satisfy. Absent entries take
/// the documented defaults.
pub fn meta_schema(compiler: &Compiler) -> Arc<CompiledSchema> {
    let defaults = ValidationOptions::default();
    let presences = [Presence::Optional, Presence::Required, Presence::Forbidden].map(|p| p.as_str());
    compiler.compile(
        object()
            .key("allowUnknown", boolean().default(defaults.allow_unknown))
            .key("stripUnknown", boolean().default(defaults.strip_unknown))
            .key("warnUnknown", boolean().default(defaults.warn_unknown))
            .key("strict", boolean().default(defaults.strict))
            .key(
                "warnOnInvalidOptionals",
                boolean().default(defaults.warn_on_invalid_optionals),
            )
            .key(
                "presence",
                any()
                    .valid_all(presences)
                    .default(defaults.presence.as_str()),
            ),
    )
}
