//! # Validation Engine
//!
//! [`Engine::new`] is the single startup routine: it compiles the options
//! meta-schema and records the default options once. After that the engine
//! is read-only, `Send + Sync`, and can be shared by reference.
//!
//! ## Entry Points
//!
//! - [`Engine::validate`] takes a dynamic option bag. An empty or absent bag
//!   means the defaults; anything else is validated first and a malformed
//!   bag is returned as [`ConformError::InvalidOptions`].
//! - [`Engine::validate_with`] takes typed options and cannot fail.
//! - [`Engine::validate_deferred`] schedules the result for one later
//!   delivery; [`Engine::run_deferred`] performs pending deliveries.
//! - [`Engine::call`] is the positional form over dynamic values, where the
//!   third argument is either the options or the callback.
//!
//! Validation consumes the input value and returns a freshly built tree.

use std::sync::Arc;

use conform_core::{is_empty, ConformError, Function, Record, Report, Value, Violations};
use conform_schema::{Capabilities, CompiledSchema, Compiler, NativeCapabilities, SchemaSource};
use serde::Serialize;

use crate::deferred::DeferredQueue;
use crate::options::{self, ValidationOptions};
use crate::walk::Walker;

/// Outcome of one validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    /// The accepted value, or the best value reached when there are errors.
    pub value: Value,
    pub errors: Vec<Report>,
    pub warnings: Vec<Report>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The result as a record `{errors, value, warnings}`, with `null` for
    /// an empty report list.
    pub fn to_value(&self) -> Value {
        let [errors, value, warnings] = self.clone().into_arguments();
        Value::Object(
            Record::new()
                .with("errors", errors)
                .with("value", value)
                .with("warnings", warnings),
        )
    }

    /// Callback arguments `[errors | null, value, warnings | null]`.
    pub fn into_arguments(self) -> [Value; 3] {
        [reports_value(&self.errors), self.value, reports_value(&self.warnings)]
    }
}

fn reports_value(reports: &[Report]) -> Value {
    if reports.is_empty() {
        Value::Null
    } else {
        Value::Array(
            reports
                .iter()
                .map(|report| Value::Object(report.to_record()))
                .collect(),
        )
    }
}

/// Compiler, options and delivery queue for validations.
#[derive(Debug)]
pub struct Engine {
    compiler: Compiler,
    defaults: ValidationOptions,
    bag_options: ValidationOptions,
    meta: Arc<CompiledSchema>,
    deferred: DeferredQueue,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::with_capabilities(Arc::new(NativeCapabilities))
    }

    pub fn with_capabilities(caps: Arc<dyn Capabilities>) -> Self {
        let compiler = Compiler::with_capabilities(caps);
        let meta = options::meta_schema(&compiler);
        Self {
            compiler,
            defaults: ValidationOptions::default(),
            bag_options: ValidationOptions::for_option_bags(),
            meta,
            deferred: DeferredQueue::new(),
        }
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    pub fn defaults(&self) -> &ValidationOptions {
        &self.defaults
    }

    pub fn meta_schema(&self) -> &Arc<CompiledSchema> {
        &self.meta
    }

    pub fn compile(&self, schema: impl Into<SchemaSource>) -> Arc<CompiledSchema> {
        self.compiler.compile(schema)
    }

    /// Resolve a dynamic option bag into typed options.
    pub fn options(&self, bag: &Value) -> Result<ValidationOptions, ConformError> {
        if !matches!(bag, Value::Object(_)) || is_empty(bag) {
            return Ok(self.defaults.clone());
        }
        let mut walker = Walker::new(&self.bag_options, self.caps());
        let outcome = walker.walk(bag.clone(), &self.meta, "");
        if !outcome.is_ok() {
            let violations = Violations::from(outcome.errors);
            tracing::warn!(violations = violations.len(), "rejected validation options");
            return Err(ConformError::InvalidOptions { violations });
        }
        ValidationOptions::from_validated(&outcome.value)
    }

    pub fn validate(
        &self,
        value: impl Into<Value>,
        schema: impl Into<SchemaSource>,
        options: &Value,
    ) -> Result<ValidationResult, ConformError> {
        let options = self.options(options)?;
        Ok(self.validate_with(value, schema, &options))
    }

    pub fn validate_with(
        &self,
        value: impl Into<Value>,
        schema: impl Into<SchemaSource>,
        options: &ValidationOptions,
    ) -> ValidationResult {
        let schema = self.compiler.compile(schema);
        tracing::debug!(strict = options.strict, "validation started");
        let mut walker = Walker::new(options, self.caps());
        let outcome = walker.walk(value.into(), &schema, "");
        let result = ValidationResult {
            value: outcome.value,
            errors: outcome.errors,
            warnings: walker.into_warnings(),
        };
        tracing::debug!(
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "validation finished"
        );
        result
    }

    /// Validate now and deliver the result to `callback` on the next
    /// [`run_deferred`](Self::run_deferred). Option errors are returned
    /// immediately and nothing is scheduled.
    pub fn validate_deferred<F>(
        &self,
        value: impl Into<Value>,
        schema: impl Into<SchemaSource>,
        options: &Value,
        callback: F,
    ) -> Result<(), ConformError>
    where
        F: FnOnce(ValidationResult) + Send + 'static,
    {
        let result = self.validate(value, schema, options)?;
        self.deferred.schedule(move || callback(result));
        Ok(())
    }

    /// Perform every pending delivery in scheduling order.
    pub fn run_deferred(&self) -> usize {
        self.deferred.drain()
    }

    pub fn pending_deliveries(&self) -> usize {
        self.deferred.pending()
    }

    /// Positional form. A record in `third` is the option bag; a function in
    /// `fourth`, or else in `third`, is the callback.
    ///
    /// Without a callback the result record is returned. With one, the
    /// callback is scheduled with `[errors, value, warnings]` and
    /// `Undefined` is returned.
    pub fn call(
        &self,
        value: impl Into<Value>,
        schema: impl Into<SchemaSource>,
        third: Value,
        fourth: Value,
    ) -> Result<Value, ConformError> {
        let callback: Option<Function> = match (fourth, &third) {
            (Value::Function(callback), _) => Some(callback),
            (_, Value::Function(callback)) => Some(callback.clone()),
            _ => None,
        };
        let options = match third {
            bag @ Value::Object(_) => bag,
            _ => Value::Undefined,
        };
        let result = self.validate(value, schema, &options)?;
        match callback {
            None => Ok(result.to_value()),
            Some(callback) => {
                self.deferred.schedule(move || {
                    callback.call(&result.into_arguments());
                });
                Ok(Value::Undefined)
            }
        }
    }

    fn caps(&self) -> &dyn Capabilities {
        self.compiler.capabilities().as_ref()
    }
}
