//! # conform-validate — Validation Engine
//!
//! Walks a value tree alongside a compiled schema and produces a
//! [`ValidationResult`] of the accepted value, the errors that rejected it,
//! and any warnings.
//!
//! - [`engine`]: [`Engine`], the explicit startup context with typed and
//!   dynamic entry points and deferred delivery.
//! - [`options`]: [`ValidationOptions`] and the option-bag meta-schema.
//! - [`deferred`]: the FIFO [`DeferredQueue`] behind callback delivery.
//!
//! The walker and the sandbox around user-supplied code are internal.
//!
//! ## Logging
//!
//! Logs through `tracing` only; installing a subscriber is left to the
//! application. Panics in user code are `error!`, rejected option bags are
//! `warn!`, validation start and finish are `debug!`, deliveries `trace!`.

pub mod deferred;
pub mod engine;
pub mod options;
mod sandbox;
mod walk;

pub use deferred::DeferredQueue;
pub use engine::{Engine, ValidationResult};
pub use options::{meta_schema, ValidationOptions};
