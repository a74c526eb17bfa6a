//! # conform-schema — Builder DSL & Compiler
//!
//! Schemas are authored with immutable builder chains and compiled once into
//! frozen [`CompiledSchema`] trees that any number of validations share.
//!
//! - [`builder`]: entry points ([`any`], [`boolean`], [`number`], [`string`],
//!   [`object`], [`array`], [`function`], [`alternatives`]), the [`Refine`]
//!   trait of universal refinements, and the typed builders.
//! - [`source`]: [`SchemaSource`], the closed set of shapes accepted
//!   wherever a schema is expected.
//! - [`compiler`]: [`Compiler`], which normalizes a source into a
//!   [`CompiledSchema`].
//! - [`capabilities`]: the injectable host primitives.
//! - [`rules`]: predicates behind the built-in refinements.
//!
//! ## Example
//!
//! ```
//! use conform_schema::{object, string, number, LengthRules, Refine};
//!
//! let person = object()
//!     .key("name", string().required().min_length(1))
//!     .key("age", number().integer().min(0.0))
//!     .compile();
//! assert_eq!(person.keys.len(), 2);
//! ```

pub mod builder;
pub mod capabilities;
pub mod compiled;
pub mod compiler;
pub mod rules;
pub mod source;

pub use builder::{
    alternatives, any, array, boolean, function, number, object, string, AnyBuilder, ArrayBuilder,
    BooleanBuilder, Draft, FunctionBuilder, LengthRules, NumberBuilder, ObjectBuilder, Refine,
    Refinement, SchemaBuilder, StringBuilder,
};
pub use capabilities::{Capabilities, NativeCapabilities};
pub use compiled::{Check, CompiledSchema, KeyPattern, Presence, Sanitizer, SchemaType, Verdict};
pub use compiler::{compile, Compiler};
pub use source::SchemaSource;
