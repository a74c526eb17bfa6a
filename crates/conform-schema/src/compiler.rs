//! # Compiler
//!
//! Normalizes any [`SchemaSource`] into a frozen [`CompiledSchema`].
//!
//! Compilation is idempotent: an already compiled schema is returned as the
//! same `Arc`. A builder is folded into a [`Draft`] and every schema-valued
//! field (`keys`, `pattern`, `includes`, `excludes`, `alternatives`) is
//! compiled recursively before the result is frozen through the injected
//! [`Capabilities`]. Shorthands are first rewritten into the builder they
//! stand for.

use std::sync::Arc;

use conform_core::Members;

use crate::builder::{self, Draft, Refine};
use crate::capabilities::{Capabilities, NativeCapabilities};
use crate::compiled::{CompiledSchema, KeyPattern};
use crate::source::SchemaSource;

/// Schema compiler bound to one set of host capabilities.
#[derive(Debug, Clone)]
pub struct Compiler {
    caps: Arc<dyn Capabilities>,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::with_capabilities(Arc::new(NativeCapabilities))
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capabilities(caps: Arc<dyn Capabilities>) -> Self {
        Self { caps }
    }

    pub fn capabilities(&self) -> &Arc<dyn Capabilities> {
        &self.caps
    }

    pub fn compile(&self, source: impl Into<SchemaSource>) -> Arc<CompiledSchema> {
        match source.into() {
            SchemaSource::Compiled(schema) => schema,
            SchemaSource::Builder(builder) => self.resolve(builder.draft()),
            SchemaSource::Pattern(regex) => self.resolve(builder::string().matches(regex).draft()),
            SchemaSource::Sequence(members) => {
                self.resolve(builder::alternatives(members).draft())
            }
            SchemaSource::Mapping(keys) => self.resolve(builder::object().keys(keys).draft()),
            SchemaSource::Literal(value) => self.resolve(builder::any().valid(value).draft()),
        }
    }

    /// Compile every nested source of a draft and freeze the result.
    pub fn resolve(&self, draft: Draft) -> Arc<CompiledSchema> {
        let schema = CompiledSchema {
            schema_type: draft.schema_type,
            presence: draft.presence,
            default_value: draft.default_value,
            allowed: draft.allowed,
            valid: draft.valid,
            invalid: draft.invalid,
            checks: draft.checks,
            checks_after: draft.checks_after,
            alias: draft.alias,
            keys: draft.keys.map_members(|_, source| self.compile(source)),
            pattern: draft.pattern.map(|(regex, source)| KeyPattern {
                regex,
                schema: self.compile(source),
            }),
            includes: draft.includes.map_members(|_, source| self.compile(source)),
            excludes: draft.excludes.map_members(|_, source| self.compile(source)),
            alternatives: draft.alternatives.map_members(|_, source| self.compile(source)),
            sanitize_before: draft.sanitize_before,
            sanitize: draft.sanitize,
            insensitive: draft.insensitive,
        };
        self.caps.freeze(schema)
    }
}

/// Compile with the native capabilities.
pub fn compile(source: impl Into<SchemaSource>) -> Arc<CompiledSchema> {
    Compiler::default().compile(source)
}
