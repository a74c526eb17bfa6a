//! # conform — Declarative Schemas for Dynamic Values
//!
//! Describe the legal shape of a value once, compile it, then validate,
//! coerce and sanitize any number of inputs against it. Each validation
//! yields the accepted value plus structured errors and warnings.
//!
//! This crate is the public surface of the workspace:
//!
//! 1. **Builders.** [`any`], [`boolean`], [`number`], [`string`],
//!    [`object`], [`array`], [`function`] and [`alternatives`] start
//!    immutable builder chains. Universal refinements come from [`Refine`],
//!    length constraints from [`LengthRules`].
//!
//! 2. **Compilation.** [`compile`] turns a builder, an already compiled
//!    schema, or a plain-value shorthand into a frozen [`CompiledSchema`].
//!
//! 3. **Validation.** An [`Engine`] holds the default options and the
//!    options meta-schema. [`validate`] is a convenience that builds a fresh
//!    engine per call.
//!
//! 4. **Classification.** [`type_of`] names a value's runtime shape.
//!
//! ## Example
//!
//! ```
//! use conform::prelude::*;
//!
//! let engine = Engine::new();
//! let schema = object()
//!     .key("name", string().required())
//!     .key("age", number().integer().min(0.0));
//!
//! let input = Value::from(serde_json::json!({"name": "Ada", "age": 36}));
//! let result = engine.validate(input, schema, &Value::Undefined).unwrap();
//! assert!(result.is_valid());
//! ```
//!
//! ## Crate Policy
//!
//! - No logic of its own beyond [`validate`]; everything is re-exported.
//! - No subscriber is installed; logging goes through `tracing`.

pub use conform_core::{
    cast, equals, is_empty, is_integer, is_numeric, length_of, merge, tags, to_number, type_of,
    ConformError, Function, Map, Record, Report, Value, ValueType, Violations,
};
pub use conform_schema::{
    alternatives, any, array, boolean, compile, function, number, object, string, Capabilities,
    CompiledSchema, Compiler, LengthRules, NativeCapabilities, Presence, Refine, SchemaSource,
    SchemaType, Verdict,
};
pub use conform_validate::{Engine, ValidationOptions, ValidationResult};

/// Builders, typed builders and the engine in one import.
pub mod prelude {
    pub use conform_core::{Record, Report, Value};
    pub use conform_schema::{
        alternatives, any, array, boolean, compile, function, number, object, string, AnyBuilder,
        ArrayBuilder, BooleanBuilder, FunctionBuilder, LengthRules, NumberBuilder, ObjectBuilder,
        Refine, SchemaSource, StringBuilder, Verdict,
    };
    pub use conform_validate::{Engine, ValidationOptions, ValidationResult};
}

/// Validate with a one-off [`Engine`]. Prefer a long-lived engine when
/// validating repeatedly.
pub fn validate(
    value: impl Into<Value>,
    schema: impl Into<SchemaSource>,
    options: &Value,
) -> Result<ValidationResult, ConformError> {
    Engine::new().validate(value, schema, options)
}
