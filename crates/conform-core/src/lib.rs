#![deny(missing_docs)]

//! # conform-core — Data Model
//!
//! The leaf of the conform workspace. Everything the schema builder,
//! compiler and validator share lives here:
//!
//! - [`Value`], the closed host value tree, with [`Record`] (keyed members
//!   plus an optional class tag) and [`Function`] (identity-compared callables).
//! - [`type_of`] classification into [`ValueType`].
//! - [`equals`] deep structural equality and [`merge`] deep merge.
//! - [`Members`], one iteration interface over ordered and keyed collections.
//! - [`coerce`] helpers used by non-strict validation and built-in rules.
//! - [`Report`] records and the [`ConformError`] boundary error.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `conform-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod coerce;
pub mod equality;
pub mod error;
pub mod members;
pub mod merge;
pub mod report;
pub mod value;

pub use coerce::{cast, is_empty, is_integer, is_numeric, length_of, to_number};
pub use equality::{equals, equals_ignoring_case};
pub use error::ConformError;
pub use members::{Members, Slot};
pub use merge::{merge, merge_all};
pub use report::{tags, Report, Violations};
pub use value::{type_of, Function, Map, Record, Value, ValueType};
