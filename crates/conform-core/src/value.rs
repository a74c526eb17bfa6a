//! # Value Model — The Host Value Tree
//!
//! Every value that flows through a schema is a [`Value`]. The enum is closed:
//! validation classifies a value by matching on it, never by probing it.
//!
//! ## Absence
//!
//! `Undefined` means "no value at this position". It is distinct from `Null`,
//! which is an explicit null supplied by the caller. Presence rules key off
//! this distinction: only `Undefined` is ever considered missing.
//!
//! ## Interop
//!
//! `Value` converts to and from `serde_json::Value` and implements
//! `Serialize`/`Deserialize` through that representation. `Undefined` record
//! members are skipped on output and functions serialize as `null`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::coerce::format_number;

/// Keyed members of a record, in deterministic key order.
pub type Map = BTreeMap<String, Value>;

/// Runtime shape of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Ordered members.
    Array,
    /// An explicit null.
    Null,
    /// A record, tagged or not.
    Object,
    /// `true` or `false`.
    Boolean,
    /// Any `f64`, `NaN` included.
    Number,
    /// Text.
    String,
    /// A callable.
    Function,
    /// Absent.
    Undefined,
}

impl ValueType {
    /// The lowercase name used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::Null => "null",
            Self::Object => "object",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Function => "function",
            Self::Undefined => "undefined",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a value's runtime shape.
pub fn type_of(value: &Value) -> ValueType {
    value.type_of()
}

// ─── Record ─────────────────────────────────────────────────────────

/// A keyed mapping, optionally tagged with the name of the class that
/// produced it.
///
/// The class tag takes no part in equality; it only backs
/// `instance_of` checks.
#[derive(Clone, Default)]
pub struct Record {
    class: Option<Arc<str>>,
    members: Map,
}

impl Record {
    /// Create an empty, untagged record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty record tagged with `class`.
    pub fn instance(class: impl Into<Arc<str>>) -> Self {
        Self {
            class: Some(class.into()),
            members: Map::new(),
        }
    }

    /// Builder-style insert for literal construction.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.members.insert(key.into(), value.into());
        self
    }

    /// The class tag, if any.
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    /// Borrow a member.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.members.get(key)
    }

    /// Mutably borrow a member.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.members.get_mut(key)
    }

    /// Insert a member, returning the one it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.members.insert(key.into(), value)
    }

    /// Remove a member and return it.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.members.remove(key)
    }

    /// Whether a member with this key exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.members.contains_key(key)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the record has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    /// Members in key order.
    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, String, Value> {
        self.members.iter()
    }

    /// Borrow the underlying member map.
    pub fn members(&self) -> &Map {
        &self.members
    }

    /// Consume the record, keeping only its members.
    pub fn into_members(self) -> Map {
        self.members
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(class) = &self.class {
            write!(f, "{class} ")?;
        }
        f.debug_map().entries(self.members.iter()).finish()
    }
}

impl From<Map> for Record {
    fn from(members: Map) -> Self {
        Self {
            class: None,
            members,
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::from(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect::<Map>(),
        )
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

// ─── Function ───────────────────────────────────────────────────────

type Callable = dyn Fn(&[Value]) -> Value + Send + Sync;

/// A callable value. Two functions are equal only if they are the same
/// allocation.
#[derive(Clone)]
pub struct Function {
    name: Arc<str>,
    call: Arc<Callable>,
}

impl Function {
    /// Wrap a closure under a diagnostic name.
    pub fn new<F>(name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            call: Arc::new(f),
        }
    }

    /// The diagnostic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke with positional arguments.
    pub fn call(&self, args: &[Value]) -> Value {
        (self.call)(args)
    }

    /// Identity comparison.
    pub fn same_as(&self, other: &Function) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.call).cast::<()>(),
            Arc::as_ptr(&other.call).cast::<()>(),
        )
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[function {}]", self.name)
    }
}

// ─── Value ──────────────────────────────────────────────────────────

/// A node in the host value tree.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// No value at this position.
    #[default]
    Undefined,
    /// An explicit null, present but empty.
    Null,
    /// `true` or `false`.
    Bool(bool),
    /// A double, `NaN` included.
    Number(f64),
    /// Text.
    String(String),
    /// Ordered members.
    Array(Vec<Value>),
    /// Keyed members.
    Object(Record),
    /// A callable.
    Function(Function),
}

impl Value {
    /// Wrap a closure as a function value.
    pub fn function<F>(name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self::Function(Function::new(name, f))
    }

    /// Classify this value; see [`type_of`].
    pub fn type_of(&self) -> ValueType {
        match self {
            Self::Undefined => ValueType::Undefined,
            Self::Null => ValueType::Null,
            Self::Bool(_) => ValueType::Boolean,
            Self::Number(_) => ValueType::Number,
            Self::String(_) => ValueType::String,
            Self::Array(_) => ValueType::Array,
            Self::Object(_) => ValueType::Object,
            Self::Function(_) => ValueType::Function,
        }
    }

    /// Whether this is `Undefined`.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// `Undefined` or `Null`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    /// The boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The number, if this is one. Strings are not parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The members, if this is an array.
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The record, if this is an object.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Object(record) => Some(record),
            _ => None,
        }
    }

    /// Mutable access to the record, if this is an object.
    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Self::Object(record) => Some(record),
            _ => None,
        }
    }

    /// The callable, if this is a function.
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Member lookup on a record; `Undefined` for anything else or a
    /// missing key.
    pub fn get(&self, key: &str) -> &Value {
        static UNDEFINED: Value = Value::Undefined;
        self.as_record()
            .and_then(|record| record.get(key))
            .unwrap_or(&UNDEFINED)
    }

    /// The key this value names when used to index a mapping.
    ///
    /// Only primitives name keys; containers and functions return `None`.
    pub fn property_key(&self) -> Option<String> {
        match self {
            Self::Undefined => Some("undefined".to_string()),
            Self::Null => Some("null".to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Number(n) => Some(format_number(*n)),
            Self::String(s) => Some(s.clone()),
            Self::Array(_) | Self::Object(_) | Self::Function(_) => None,
        }
    }

    /// Convert into the equivalent JSON tree.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Undefined | Self::Null | Self::Function(_) => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => number_to_json(*n),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Self::Object(record) => serde_json::Value::Object(
                record
                    .iter()
                    .filter(|(_, v)| !v.is_undefined())
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

/// Integral numbers inside the exactly representable range become JSON
/// integers so that `3.0` round-trips as `3`. Non-finite numbers have no
/// JSON form and become `null`.
fn number_to_json(n: f64) -> serde_json::Value {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        crate::equality::equals(self, other)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        crate::equality::equals_records(self, other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Function(func) => write!(f, "{func:?}"),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

// ─── Conversions ────────────────────────────────────────────────────

macro_rules! value_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

value_from_number!(f64, f32, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record)
    }
}

impl From<Map> for Value {
    fn from(members: Map) -> Self {
        Value::Object(Record::from(members))
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Undefined, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        value.to_json()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_of_distinguishes_null_from_undefined() {
        assert_eq!(type_of(&Value::Null), ValueType::Null);
        assert_eq!(type_of(&Value::Undefined), ValueType::Undefined);
        assert_eq!(type_of(&Value::from(json!([]))), ValueType::Array);
        assert_eq!(type_of(&Value::from(json!({}))), ValueType::Object);
        assert_eq!(type_of(&Value::function("f", |_| Value::Null)), ValueType::Function);
    }

    #[test]
    fn test_json_roundtrip_keeps_integers() {
        let original = json!({"a": 3, "b": [1.5, "x", null, true]});
        let value = Value::from(original.clone());
        assert_eq!(value.to_json(), original);
    }

    #[test]
    fn test_undefined_members_are_skipped_in_json() {
        let record = Record::new()
            .with("kept", 1)
            .with("dropped", Value::Undefined);
        assert_eq!(Value::from(record).to_json(), json!({"kept": 1}));
    }

    #[test]
    fn test_property_key_formats_numbers() {
        assert_eq!(Value::from(1).property_key().as_deref(), Some("1"));
        assert_eq!(Value::from(2.5).property_key().as_deref(), Some("2.5"));
        assert_eq!(Value::from(true).property_key().as_deref(), Some("true"));
        assert!(Value::from(json!([1])).property_key().is_none());
    }

    #[test]
    fn test_function_identity() {
        let f = Function::new("f", |_| Value::Null);
        let g = Function::new("f", |_| Value::Null);
        assert!(f.same_as(&f.clone()));
        assert!(!f.same_as(&g));
    }

    #[test]
    fn test_record_class_tag() {
        let point = Record::instance("Point").with("x", 1);
        assert_eq!(point.class(), Some("Point"));
        assert_eq!(format!("{point:?}"), r#"Point {"x": Number(1.0)}"#);
    }
}
