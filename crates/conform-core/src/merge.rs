//! # Deep Merge
//!
//! Accumulation rule shared by the schema builder and by any caller that
//! layers record-shaped configuration:
//!
//! - an array on the left is extended by the right side (a right-hand array
//!   contributes each element, anything else is appended as one element);
//! - two records merge member by member, recursively;
//! - everything else is overwritten by the right side.
//!
//! Neither input is modified; the merged record is freshly built.

use crate::value::{Record, Value};

/// Merge `right` into a copy of `left`.
pub fn merge(left: &Record, right: &Record) -> Record {
    let mut merged = left.clone();
    for (key, incoming) in right {
        let combined = match (merged.remove(key), incoming) {
            (Some(Value::Array(mut items)), Value::Array(more)) => {
                items.extend(more.iter().cloned());
                Value::Array(items)
            }
            (Some(Value::Array(mut items)), other) => {
                items.push(other.clone());
                Value::Array(items)
            }
            (Some(Value::Object(existing)), Value::Object(more)) => {
                Value::Object(merge(&existing, more))
            }
            (_, other) => other.clone(),
        };
        merged.insert(key.clone(), combined);
    }
    merged
}

/// Fold [`merge`] over any number of records, left to right.
pub fn merge_all<'a>(records: impl IntoIterator<Item = &'a Record>) -> Record {
    records
        .into_iter()
        .fold(Record::new(), |acc, next| merge(&acc, next))
}
