//! # Schema Sources
//!
//! Everywhere a schema is expected the caller may hand over a builder, an
//! already compiled schema, or a plain value used as shorthand. The shapes
//! are normalized into the closed set of [`SchemaSource`] variants at the
//! compiler boundary:
//!
//! | variant | compiles to |
//! |---|---|
//! | `Compiled` | itself |
//! | `Builder` | the builder's compilation |
//! | `Pattern` | `string().matches(pattern)` |
//! | `Sequence` | `alternatives(...)` over each element |
//! | `Mapping` | `object()` whose keys are each element |
//! | `Literal` | `any().valid(literal)` |
//!
//! A [`Value`] converts by shape: arrays become sequences and records become
//! mappings (both recursively), everything else is a literal.

use std::collections::BTreeMap;
use std::sync::Arc;

use conform_core::Value;
use regex::Regex;

use crate::builder::SchemaBuilder;
use crate::compiled::CompiledSchema;

/// A schema in any of its accepted forms.
#[derive(Debug, Clone)]
pub enum SchemaSource {
    Compiled(Arc<CompiledSchema>),
    Builder(SchemaBuilder),
    Pattern(Regex),
    Sequence(Vec<SchemaSource>),
    Mapping(BTreeMap<String, SchemaSource>),
    Literal(Value),
}

impl SchemaSource {
    /// Mapping shorthand from `(key, schema)` pairs.
    pub fn mapping<K, S, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<SchemaSource>,
    {
        Self::Mapping(
            entries
                .into_iter()
                .map(|(k, s)| (k.into(), s.into()))
                .collect(),
        )
    }

    /// Sequence shorthand from any schemas.
    pub fn sequence<S, I>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SchemaSource>,
    {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// Whether compiling this source is a no-op.
    pub fn is_compiled(&self) -> bool {
        matches!(self, Self::Compiled(_))
    }
}

impl From<Arc<CompiledSchema>> for SchemaSource {
    fn from(schema: Arc<CompiledSchema>) -> Self {
        Self::Compiled(schema)
    }
}

impl From<&Arc<CompiledSchema>> for SchemaSource {
    fn from(schema: &Arc<CompiledSchema>) -> Self {
        Self::Compiled(Arc::clone(schema))
    }
}

impl From<CompiledSchema> for SchemaSource {
    fn from(schema: CompiledSchema) -> Self {
        Self::Compiled(Arc::new(schema))
    }
}

impl From<SchemaBuilder> for SchemaSource {
    fn from(builder: SchemaBuilder) -> Self {
        Self::Builder(builder)
    }
}

impl From<Regex> for SchemaSource {
    fn from(pattern: Regex) -> Self {
        Self::Pattern(pattern)
    }
}

impl From<Vec<SchemaSource>> for SchemaSource {
    fn from(items: Vec<SchemaSource>) -> Self {
        Self::Sequence(items)
    }
}

impl From<BTreeMap<String, SchemaSource>> for SchemaSource {
    fn from(entries: BTreeMap<String, SchemaSource>) -> Self {
        Self::Mapping(entries)
    }
}

impl From<Value> for SchemaSource {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(record) => Self::Mapping(
                record
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
            literal => Self::Literal(literal),
        }
    }
}

impl From<serde_json::Value> for SchemaSource {
    fn from(json: serde_json::Value) -> Self {
        Self::from(Value::from(json))
    }
}

macro_rules! literal_source {
    ($($t:ty),*) => {
        $(
            impl From<$t> for SchemaSource {
                fn from(literal: $t) -> Self {
                    Self::Literal(Value::from(literal))
                }
            }
        )*
    };
}

literal_source!(bool, f64, i32, i64, u32, u64, &str, String);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_shapes_become_tagged_variants() {
        assert!(matches!(SchemaSource::from(json!([1, 2])), SchemaSource::Sequence(ref v) if v.len() == 2));
        assert!(matches!(SchemaSource::from(json!({"a": 1})), SchemaSource::Mapping(ref m) if m.contains_key("a")));
        assert!(matches!(SchemaSource::from(3), SchemaSource::Literal(Value::Number(n)) if n == 3.0));
        assert!(matches!(SchemaSource::from(Value::Null), SchemaSource::Literal(Value::Null)));
    }

    #[test]
    fn test_nested_shorthand_is_recursive() {
        match SchemaSource::from(json!({"a": ["x", "y"]})) {
            SchemaSource::Mapping(entries) => {
                assert!(matches!(entries["a"], SchemaSource::Sequence(_)));
            }
            other => panic!("expected a mapping, got {other:?}"),
        }
    }
}
