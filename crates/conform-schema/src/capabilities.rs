//! # Host Capabilities
//!
//! The three host primitives the builder, compiler and validator rely on,
//! behind one injectable interface:
//!
//! - **freeze**: seal a compiled schema so holders only get shared,
//!   read-only access;
//! - **own keys**: enumerate a record's own member keys, in order;
//! - **derive**: build a new record from a parent, overlaid with fresh
//!   members, leaving the parent untouched.
//!
//! [`NativeCapabilities`] is the default. Alternative hosts plug in through
//! `Compiler::with_capabilities` and `Engine::with_capabilities`.

use std::fmt;
use std::sync::Arc;

use conform_core::Record;

use crate::compiled::CompiledSchema;

/// Host primitives injected into compilation and validation.
pub trait Capabilities: Send + Sync + fmt::Debug {
    /// Seal a schema for shared read-only use.
    fn freeze(&self, schema: CompiledSchema) -> Arc<CompiledSchema>;

    /// The record's own member keys, in iteration order.
    fn own_keys(&self, record: &Record) -> Vec<String>;

    /// A copy of `parent` with `overlay`'s members written over it.
    fn derive(&self, parent: &Record, overlay: &Record) -> Record;
}

/// Capabilities backed by the standard library.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCapabilities;

impl Capabilities for NativeCapabilities {
    fn freeze(&self, schema: CompiledSchema) -> Arc<CompiledSchema> {
        Arc::new(schema)
    }

    fn own_keys(&self, record: &Record) -> Vec<String> {
        record.keys().map(str::to_string).collect()
    }

    fn derive(&self, parent: &Record, overlay: &Record) -> Record {
        let mut derived = parent.clone();
        for (key, value) in overlay {
            derived.insert(key.clone(), value.clone());
        }
        derived
    }
}
