//! # Schema Builder DSL
//!
//! Chainable, side-effect-free construction of schema descriptions.
//!
//! A [`SchemaBuilder`] is a persistent chain of [`Refinement`] steps. Each
//! refinement call allocates one new link pointing at its parent, so the
//! parent stays valid and reusable:
//!
//! ```text
//! string() ── required() ── min_length(2)
//!          └─ optional()
//! ```
//!
//! Folding a chain from the root into a [`Draft`] applies the steps in
//! order. Collection fields accumulate (sequences append, the alias table
//! merges, keys merge by name) while scalar fields (type, presence, default)
//! take the most recent value, which gives presence its last-declaration-wins
//! behaviour.
//!
//! Typed builders ([`StringBuilder`], [`NumberBuilder`], ...) wrap the same
//! chain and only differ in which refinements they expose. Universal
//! refinements live on the [`Refine`] trait.

use std::collections::BTreeMap;
use std::sync::Arc;

use conform_core::{merge, Record, Value};
use regex::Regex;

use crate::compiled::{Check, CompiledSchema, Presence, Sanitizer, SchemaType, Verdict};
use crate::compiler::Compiler;
use crate::rules;
use crate::source::SchemaSource;

// ─── Refinements ────────────────────────────────────────────────────

/// One step in a builder chain.
#[derive(Debug, Clone)]
pub enum Refinement {
    /// First link of every chain.
    Root(Option<SchemaType>),
    Presence(Presence),
    Default(Value),
    Allow(Vec<Value>),
    Valid(Vec<Value>),
    Invalid(Vec<Value>),
    Alias(Record),
    /// Post-descent predicate.
    CheckAfter(Check),
    /// Pre-descent predicate.
    Satisfy(Check),
    Sanitize(Sanitizer),
    SanitizeBefore(Sanitizer),
    Keys(BTreeMap<String, SchemaSource>),
    Pattern(Regex, SchemaSource),
    Includes(Vec<SchemaSource>),
    Excludes(Vec<SchemaSource>),
    Alternatives(Vec<SchemaSource>),
    Insensitive,
}

#[derive(Debug)]
struct Link {
    parent: Option<SchemaBuilder>,
    step: Refinement,
}

/// An untyped builder chain.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    link: Arc<Link>,
}

impl SchemaBuilder {
    pub fn root(schema_type: Option<SchemaType>) -> Self {
        Self {
            link: Arc::new(Link {
                parent: None,
                step: Refinement::Root(schema_type),
            }),
        }
    }

    /// A child of this builder with one more step. `self` is unchanged.
    pub fn derive(&self, step: Refinement) -> Self {
        Self {
            link: Arc::new(Link {
                parent: Some(self.clone()),
                step,
            }),
        }
    }

    /// Steps from the root down to this builder.
    pub fn steps(&self) -> Vec<&Refinement> {
        let mut steps = Vec::new();
        let mut cursor = Some(self);
        while let Some(builder) = cursor {
            steps.push(&builder.link.step);
            cursor = builder.link.parent.as_ref();
        }
        steps.reverse();
        steps
    }

    /// Fold the chain without compiling nested schemas.
    pub fn draft(&self) -> Draft {
        let mut draft = Draft::default();
        for step in self.steps() {
            draft.apply(step);
        }
        draft
    }
}

// ─── Draft ──────────────────────────────────────────────────────────

/// A folded builder chain whose schema-valued fields are still sources.
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub schema_type: Option<SchemaType>,
    pub presence: Option<Presence>,
    pub default_value: Value,
    pub allowed: Vec<Value>,
    pub valid: Vec<Value>,
    pub invalid: Vec<Value>,
    pub checks: Vec<Check>,
    pub checks_after: Vec<Check>,
    pub alias: Record,
    pub keys: BTreeMap<String, SchemaSource>,
    pub pattern: Option<(Regex, SchemaSource)>,
    pub includes: Vec<SchemaSource>,
    pub excludes: Vec<SchemaSource>,
    pub alternatives: Vec<SchemaSource>,
    pub sanitize_before: Vec<Sanitizer>,
    pub sanitize: Vec<Sanitizer>,
    pub insensitive: bool,
}

impl Draft {
    pub fn apply(&mut self, step: &Refinement) {
        match step {
            Refinement::Root(schema_type) => self.schema_type = *schema_type,
            Refinement::Presence(presence) => self.presence = Some(*presence),
            Refinement::Default(value) => self.default_value = value.clone(),
            Refinement::Allow(values) => self.allowed.extend(values.iter().cloned()),
            Refinement::Valid(values) => self.valid.extend(values.iter().cloned()),
            Refinement::Invalid(values) => self.invalid.extend(values.iter().cloned()),
            Refinement::Alias(table) => self.alias = merge(&self.alias, table),
            Refinement::CheckAfter(check) => self.checks_after.push(check.clone()),
            Refinement::Satisfy(check) => self.checks.push(check.clone()),
            Refinement::Sanitize(sanitizer) => self.sanitize.push(sanitizer.clone()),
            Refinement::SanitizeBefore(sanitizer) => self.sanitize_before.push(sanitizer.clone()),
            Refinement::Keys(keys) => {
                for (key, source) in keys {
                    self.keys.insert(key.clone(), source.clone());
                }
            }
            Refinement::Pattern(regex, source) => {
                self.pattern = Some((regex.clone(), source.clone()));
            }
            Refinement::Includes(sources) => self.includes.extend(sources.iter().cloned()),
            Refinement::Excludes(sources) => self.excludes.extend(sources.iter().cloned()),
            Refinement::Alternatives(sources) => self.alternatives.extend(sources.iter().cloned()),
            Refinement::Insensitive => self.insensitive = true,
        }
    }
}

// ─── Universal Refinements ──────────────────────────────────────────

/// Refinements shared by every builder.
pub trait Refine: Sized + Clone {
    fn builder(&self) -> &SchemaBuilder;

    fn from_builder(builder: SchemaBuilder) -> Self;

    fn refine(&self, step: Refinement) -> Self {
        Self::from_builder(self.builder().derive(step))
    }

    fn required(&self) -> Self {
        self.refine(Refinement::Presence(Presence::Required))
    }

    fn optional(&self) -> Self {
        self.refine(Refinement::Presence(Presence::Optional))
    }

    fn forbidden(&self) -> Self {
        self.refine(Refinement::Presence(Presence::Forbidden))
    }

    fn presence(&self, presence: Presence) -> Self {
        self.refine(Refinement::Presence(presence))
    }

    /// Substituted when the value is absent and presence is optional.
    fn default(&self, value: impl Into<Value>) -> Self {
        self.refine(Refinement::Default(value.into()))
    }

    fn allow(&self, value: impl Into<Value>) -> Self {
        self.refine(Refinement::Allow(vec![value.into()]))
    }

    fn allow_all<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Self {
        self.refine(Refinement::Allow(values.into_iter().map(Into::into).collect()))
    }

    fn valid(&self, value: impl Into<Value>) -> Self {
        self.refine(Refinement::Valid(vec![value.into()]))
    }

    fn valid_all<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Self {
        self.refine(Refinement::Valid(values.into_iter().map(Into::into).collect()))
    }

    fn invalid(&self, value: impl Into<Value>) -> Self {
        self.refine(Refinement::Invalid(vec![value.into()]))
    }

    fn invalid_all<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Self {
        self.refine(Refinement::Invalid(values.into_iter().map(Into::into).collect()))
    }

    /// Merge entries into the alias table.
    fn alias<K, V, I>(&self, table: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let table: Record = table.into_iter().map(|(k, v)| (k, v.into())).collect();
        self.refine(Refinement::Alias(table))
    }

    /// Post-descent predicate. Anything but a pass becomes warnings.
    fn check<F, R>(&self, predicate: F) -> Self
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: Into<Verdict>,
    {
        self.refine(Refinement::CheckAfter(Check::new("check", predicate)))
    }

    /// Pre-descent predicate. Anything but a pass fails the value.
    fn satisfy<F, R>(&self, predicate: F) -> Self
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: Into<Verdict>,
    {
        self.refine(Refinement::Satisfy(Check::new("satisfy", predicate)))
    }

    fn sanitize<F>(&self, transform: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.refine(Refinement::Sanitize(Sanitizer::new("sanitize", transform)))
    }

    fn sanitize_before<F>(&self, transform: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.refine(Refinement::SanitizeBefore(Sanitizer::new("sanitize_before", transform)))
    }

    fn not_empty(&self) -> Self {
        self.refine(Refinement::Satisfy(rules::not_empty()))
    }

    /// Fold the chain, leaving nested schemas uncompiled.
    fn draft(&self) -> Draft {
        self.builder().draft()
    }

    /// Compile with the native capabilities.
    fn compile(&self) -> Arc<CompiledSchema> {
        Compiler::default().compile(self.builder().clone())
    }
}

impl Refine for SchemaBuilder {
    fn builder(&self) -> &SchemaBuilder {
        self
    }

    fn from_builder(builder: SchemaBuilder) -> Self {
        builder
    }
}

/// Length constraints for strings, arrays and objects.
pub trait LengthRules: Refine {
    fn min_length(&self, bound: usize) -> Self {
        self.refine(Refinement::Satisfy(rules::min_length(bound)))
    }

    fn max_length(&self, bound: usize) -> Self {
        self.refine(Refinement::Satisfy(rules::max_length(bound)))
    }

    fn length(&self, exact: usize) -> Self {
        self.refine(Refinement::Satisfy(rules::length(exact)))
    }
}

// ─── Typed Builders ─────────────────────────────────────────────────

macro_rules! typed_builder {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(SchemaBuilder);

        impl Refine for $name {
            fn builder(&self) -> &SchemaBuilder {
                &self.0
            }

            fn from_builder(builder: SchemaBuilder) -> Self {
                Self(builder)
            }
        }

        impl From<$name> for SchemaSource {
            fn from(builder: $name) -> Self {
                SchemaSource::Builder(builder.0)
            }
        }

        impl From<&$name> for SchemaSource {
            fn from(builder: &$name) -> Self {
                SchemaSource::Builder(builder.0.clone())
            }
        }
    };
}

typed_builder!(
    /// Accepts any shape.
    AnyBuilder
);
typed_builder!(BooleanBuilder);
typed_builder!(NumberBuilder);
typed_builder!(StringBuilder);
typed_builder!(ArrayBuilder);
typed_builder!(ObjectBuilder);
typed_builder!(FunctionBuilder);

impl LengthRules for StringBuilder {}
impl LengthRules for ArrayBuilder {}
impl LengthRules for ObjectBuilder {}

fn sources<S: Into<SchemaSource>>(items: impl IntoIterator<Item = S>) -> Vec<SchemaSource> {
    items.into_iter().map(Into::into).collect()
}

impl NumberBuilder {
    pub fn min(&self, bound: f64) -> Self {
        self.refine(Refinement::Satisfy(rules::min(bound)))
    }

    pub fn max(&self, bound: f64) -> Self {
        self.refine(Refinement::Satisfy(rules::max(bound)))
    }

    pub fn greater(&self, bound: f64) -> Self {
        self.refine(Refinement::Satisfy(rules::greater(bound)))
    }

    pub fn lesser(&self, bound: f64) -> Self {
        self.refine(Refinement::Satisfy(rules::lesser(bound)))
    }

    pub fn integer(&self) -> Self {
        self.refine(Refinement::Satisfy(rules::integer()))
    }
}

impl StringBuilder {
    pub fn matches(&self, pattern: Regex) -> Self {
        self.refine(Refinement::Satisfy(rules::matches(pattern)))
    }

    pub fn lowercase(&self) -> Self {
        self.refine(Refinement::Satisfy(rules::lowercase()))
    }

    pub fn uppercase(&self) -> Self {
        self.refine(Refinement::Satisfy(rules::uppercase()))
    }

    pub fn alphanum(&self) -> Self {
        self.refine(Refinement::Satisfy(rules::alphanum()))
    }

    pub fn url(&self) -> Self {
        self.refine(Refinement::Satisfy(rules::url()))
    }

    pub fn numeric(&self) -> Self {
        self.refine(Refinement::Satisfy(rules::numeric()))
    }

    pub fn digits(&self) -> Self {
        self.refine(Refinement::Satisfy(rules::digits()))
    }

    /// Compare strings case-insensitively in `allow`, `valid` and `invalid`.
    pub fn insensitive(&self) -> Self {
        self.refine(Refinement::Insensitive)
    }
}

impl ArrayBuilder {
    pub fn unique(&self) -> Self {
        self.refine(Refinement::Satisfy(rules::unique()))
    }

    pub fn includes(&self, schema: impl Into<SchemaSource>) -> Self {
        self.refine(Refinement::Includes(vec![schema.into()]))
    }

    pub fn includes_all<S: Into<SchemaSource>>(&self, schemas: impl IntoIterator<Item = S>) -> Self {
        self.refine(Refinement::Includes(sources(schemas)))
    }

    pub fn excludes(&self, schema: impl Into<SchemaSource>) -> Self {
        self.refine(Refinement::Excludes(vec![schema.into()]))
    }

    pub fn excludes_all<S: Into<SchemaSource>>(&self, schemas: impl IntoIterator<Item = S>) -> Self {
        self.refine(Refinement::Excludes(sources(schemas)))
    }
}

impl ObjectBuilder {
    pub fn key(&self, name: impl Into<String>, schema: impl Into<SchemaSource>) -> Self {
        let keys = BTreeMap::from([(name.into(), schema.into())]);
        self.refine(Refinement::Keys(keys))
    }

    pub fn keys<K, S, I>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<SchemaSource>,
    {
        let keys = keys
            .into_iter()
            .map(|(k, s)| (k.into(), s.into()))
            .collect();
        self.refine(Refinement::Keys(keys))
    }

    /// The record must carry this class tag.
    pub fn instance_of(&self, class: impl Into<String>) -> Self {
        self.refine(Refinement::Satisfy(rules::instance_of(class.into())))
    }

    /// Schema for undeclared members whose key matches `regex`. A sequence
    /// source is tried as alternatives.
    pub fn pattern(&self, regex: Regex, schema: impl Into<SchemaSource>) -> Self {
        self.refine(Refinement::Pattern(regex, schema.into()))
    }
}

// ─── Entry Points ───────────────────────────────────────────────────

pub fn any() -> AnyBuilder {
    AnyBuilder(SchemaBuilder::root(None))
}

pub fn boolean() -> BooleanBuilder {
    BooleanBuilder(SchemaBuilder::root(Some(SchemaType::Boolean)))
}

pub fn number() -> NumberBuilder {
    NumberBuilder(SchemaBuilder::root(Some(SchemaType::Number)))
}

pub fn string() -> StringBuilder {
    StringBuilder(SchemaBuilder::root(Some(SchemaType::String)))
}

pub fn array() -> ArrayBuilder {
    ArrayBuilder(SchemaBuilder::root(Some(SchemaType::Array)))
}

pub fn object() -> ObjectBuilder {
    ObjectBuilder(SchemaBuilder::root(Some(SchemaType::Object)))
}

pub fn function() -> FunctionBuilder {
    FunctionBuilder(SchemaBuilder::root(Some(SchemaType::Function)))
}

/// A union over `members`, tried in order.
pub fn alternatives<S: Into<SchemaSource>>(members: impl IntoIterator<Item = S>) -> AnyBuilder {
    any().refine(Refinement::Alternatives(sources(members)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_refinement_leaves_parent_untouched() {
        let base = string();
        let required = base.required();
        assert_eq!(base.draft().presence, None);
        assert_eq!(required.draft().presence, Some(Presence::Required));
    }

    #[test]
    fn test_presence_last_declaration_wins() {
        assert_eq!(any().required().forbidden().draft().presence, Some(Presence::Forbidden));
        assert_eq!(any().forbidden().required().draft().presence, Some(Presence::Required));
    }

    #[test]
    fn test_collections_accumulate() {
        let draft = any().valid(3).valid(7).valid_all([8, 9]).draft();
        assert_eq!(draft.valid.len(), 4);
        let draft = any().alias([("a", "b")]).alias([("c", "d")]).draft();
        assert_eq!(draft.alias.len(), 2);
    }

    #[test]
    fn test_scalars_overwrite() {
        let draft = number().default(1).default(2).draft();
        assert_eq!(draft.default_value, Value::from(2));
        assert_eq!(draft.schema_type, Some(SchemaType::Number));
    }

    #[test]
    fn test_keys_merge_by_name() {
        let draft = object()
            .key("a", string())
            .keys([("b", json!(1)), ("a", json!(2))])
            .draft();
        assert_eq!(draft.keys.len(), 2);
        assert!(matches!(draft.keys["a"], SchemaSource::Literal(_)));
    }

    #[test]
    fn test_typed_rules_land_in_prechecks() {
        let draft = string().min_length(2).alphanum().check(|_: &Value| true).draft();
        assert_eq!(draft.checks.len(), 2);
        assert_eq!(draft.checks_after.len(), 1);
    }

    #[test]
    fn test_alternatives_entry_point() {
        let draft = alternatives([SchemaSource::from(string()), number().into()]).draft();
        assert_eq!(draft.schema_type, None);
        assert_eq!(draft.alternatives.len(), 2);
    }
}
