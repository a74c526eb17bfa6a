//! # Compiled Schema
//!
//! The canonical, resolved form of a schema. A [`CompiledSchema`] is built
//! once by the compiler, frozen behind an `Arc`, and then shared read-only
//! by every validation that uses it.
//!
//! ## Invariants
//!
//! - Every schema-valued field (`keys`, `pattern`, `includes`, `excludes`,
//!   `alternatives`) holds compiled schemas, never builders or shorthands.
//! - The tree is acyclic. Builders can only refer to schemas that already
//!   exist, so a self-referencing schema cannot be expressed.
//! - User-supplied predicates and sanitizers compare by identity, so two
//!   compilations of the same builder are structurally equal.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use conform_core::{Record, Value, ValueType};
use regex::Regex;
use serde::{Deserialize, Serialize};

// ─── Presence & Type ────────────────────────────────────────────────

/// Whether a value must, may, or must not be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    /// Absence is an error.
    Required,
    /// Absence yields the default, if any.
    Optional,
    /// Presence is an error.
    Forbidden,
}

impl Presence {
    /// The lowercase name used in option bags.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Optional => "optional",
            Self::Forbidden => "forbidden",
        }
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Presence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "required" => Ok(Self::Required),
            "optional" => Ok(Self::Optional),
            "forbidden" => Ok(Self::Forbidden),
            other => Err(format!("unknown presence '{other}'")),
        }
    }
}

/// The primitive shape a schema expects. A schema without one accepts any
/// shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Boolean,
    Number,
    String,
    Object,
    Array,
    Function,
}

impl SchemaType {
    /// The value shape that satisfies this type.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Boolean => ValueType::Boolean,
            Self::Number => ValueType::Number,
            Self::String => ValueType::String,
            Self::Object => ValueType::Object,
            Self::Array => ValueType::Array,
            Self::Function => ValueType::Function,
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value_type().name())
    }
}

// ─── Predicates & Sanitizers ────────────────────────────────────────

/// Outcome of one predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Pass,
    /// Failed; the detail is a tag, a record, a sequence of details, or
    /// anything else the predicate chose to return.
    Fail(Value),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl From<bool> for Verdict {
    fn from(passed: bool) -> Self {
        if passed {
            Self::Pass
        } else {
            Self::Fail(Value::Bool(false))
        }
    }
}

impl From<Value> for Verdict {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(true) => Self::Pass,
            detail => Self::Fail(detail),
        }
    }
}

impl From<Record> for Verdict {
    fn from(record: Record) -> Self {
        Self::Fail(Value::Object(record))
    }
}

impl From<&str> for Verdict {
    fn from(tag: &str) -> Self {
        Self::Fail(Value::from(tag))
    }
}

impl From<String> for Verdict {
    fn from(tag: String) -> Self {
        Self::Fail(Value::String(tag))
    }
}

impl From<Vec<Value>> for Verdict {
    fn from(details: Vec<Value>) -> Self {
        Self::Fail(Value::Array(details))
    }
}

type Predicate = dyn Fn(&Value) -> Verdict + Send + Sync;
type Transform = dyn Fn(Value) -> Value + Send + Sync;

/// A named predicate over a value.
#[derive(Clone)]
pub struct Check {
    label: Arc<str>,
    predicate: Arc<Predicate>,
}

impl Check {
    pub fn new<F, R>(label: impl Into<Arc<str>>, predicate: F) -> Self
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: Into<Verdict>,
    {
        Self {
            label: label.into(),
            predicate: Arc::new(move |value: &Value| -> Verdict { predicate(value).into() }),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run the predicate. No panic boundary; callers sandbox this.
    pub fn evaluate(&self, value: &Value) -> Verdict {
        (self.predicate)(value)
    }
}

impl PartialEq for Check {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.predicate).cast::<()>(),
            Arc::as_ptr(&other.predicate).cast::<()>(),
        )
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Check({})", self.label)
    }
}

/// A named value transformer.
#[derive(Clone)]
pub struct Sanitizer {
    label: Arc<str>,
    transform: Arc<Transform>,
}

impl Sanitizer {
    pub fn new<F>(label: impl Into<Arc<str>>, transform: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            transform: Arc::new(transform),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run the transformer. No panic boundary; callers sandbox this.
    pub fn apply(&self, value: Value) -> Value {
        (self.transform)(value)
    }
}

impl PartialEq for Sanitizer {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.transform).cast::<()>(),
            Arc::as_ptr(&other.transform).cast::<()>(),
        )
    }
}

impl fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sanitizer({})", self.label)
    }
}

// ─── Schema ─────────────────────────────────────────────────────────

/// Fallback schema for object members whose key matches `regex` and that
/// have no declared schema of their own.
#[derive(Debug, Clone)]
pub struct KeyPattern {
    pub regex: Regex,
    pub schema: Arc<CompiledSchema>,
}

impl PartialEq for KeyPattern {
    fn eq(&self, other: &Self) -> bool {
        self.regex.as_str() == other.regex.as_str() && self.schema == other.schema
    }
}

/// Canonical schema record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledSchema {
    /// Expected shape; `None` accepts any shape.
    pub schema_type: Option<SchemaType>,
    /// `None` inherits the presence from the validation options.
    pub presence: Option<Presence>,
    /// Substituted when the value is absent and presence is optional.
    /// `Undefined` means no default.
    pub default_value: Value,
    /// Matching any of these accepts the value immediately.
    pub allowed: Vec<Value>,
    /// When non-empty, the value must match one of these.
    pub valid: Vec<Value>,
    /// Matching any of these rejects the value.
    pub invalid: Vec<Value>,
    /// Run before structural descent; any failure is an error.
    pub checks: Vec<Check>,
    /// Run after structural descent; failures become warnings.
    pub checks_after: Vec<Check>,
    /// Literal-to-canonical replacements, keyed by property key.
    pub alias: Record,
    /// Declared object members.
    pub keys: BTreeMap<String, Arc<CompiledSchema>>,
    pub pattern: Option<KeyPattern>,
    /// Every array element must satisfy at least one of these.
    pub includes: Vec<Arc<CompiledSchema>>,
    /// No array element may satisfy any of these.
    pub excludes: Vec<Arc<CompiledSchema>>,
    /// Union members, tried in order.
    pub alternatives: Vec<Arc<CompiledSchema>>,
    pub sanitize_before: Vec<Sanitizer>,
    pub sanitize: Vec<Sanitizer>,
    /// Exact-match filters fold case when comparing strings.
    pub insensitive: bool,
}
