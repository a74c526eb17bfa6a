//! # Member Iteration
//!
//! One iteration abstraction over ordered collections (members addressed by
//! index) and keyed collections (members addressed by key). The compiler
//! uses it to resolve every nested schema in place and the validator uses
//! the yielded [`Slot`] to build report paths.

use std::collections::BTreeMap;
use std::fmt;

use crate::value::{Record, Value};

/// Address of one member inside its parent collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<'a> {
    /// Position in an ordered collection.
    Index(usize),
    /// Name in a keyed collection.
    Key(&'a str),
}

impl Slot<'_> {
    /// Extend a slash-delimited path with this slot.
    pub fn join(&self, path: &str) -> String {
        format!("{path}/{self}")
    }
}

impl fmt::Display for Slot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Index(i) => write!(f, "{i}"),
            Slot::Key(k) => f.write_str(k),
        }
    }
}

/// A collection whose members can be visited and rebuilt uniformly.
pub trait Members {
    /// The member type.
    type Item;
    /// The same collection shape holding `U` members.
    type Mapped<U>;

    /// Visit every member in order.
    fn for_each_member(&self, f: impl FnMut(Slot<'_>, &Self::Item));

    /// Rebuild the collection with every member replaced by `f`'s result.
    fn map_members<U>(self, f: impl FnMut(Slot<'_>, Self::Item) -> U) -> Self::Mapped<U>;
}

impl<T> Members for Vec<T> {
    type Item = T;
    type Mapped<U> = Vec<U>;

    fn for_each_member(&self, mut f: impl FnMut(Slot<'_>, &T)) {
        for (i, item) in self.iter().enumerate() {
            f(Slot::Index(i), item);
        }
    }

    fn map_members<U>(self, mut f: impl FnMut(Slot<'_>, T) -> U) -> Vec<U> {
        self.into_iter()
            .enumerate()
            .map(|(i, item)| f(Slot::Index(i), item))
            .collect()
    }
}

impl<T> Members for BTreeMap<String, T> {
    type Item = T;
    type Mapped<U> = BTreeMap<String, U>;

    fn for_each_member(&self, mut f: impl FnMut(Slot<'_>, &T)) {
        for (key, item) in self {
            f(Slot::Key(key), item);
        }
    }

    fn map_members<U>(self, mut f: impl FnMut(Slot<'_>, T) -> U) -> BTreeMap<String, U> {
        self.into_iter()
            .map(|(key, item)| {
                let mapped = f(Slot::Key(&key), item);
                (key, mapped)
            })
            .collect()
    }
}

impl Members for Record {
    type Item = Value;
    type Mapped<U> = BTreeMap<String, U>;

    fn for_each_member(&self, f: impl FnMut(Slot<'_>, &Value)) {
        self.members().for_each_member(f);
    }

    fn map_members<U>(self, f: impl FnMut(Slot<'_>, Value) -> U) -> BTreeMap<String, U> {
        self.into_members().map_members(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_join_builds_paths() {
        assert_eq!(Slot::Key("a").join(""), "/a");
        assert_eq!(Slot::Index(2).join("/a"), "/a/2");
    }

    #[test]
    fn test_vec_members_are_indexed() {
        let mut seen = Vec::new();
        vec!["x", "y"].for_each_member(|slot, item| seen.push(format!("{slot}={item}")));
        assert_eq!(seen, ["0=x", "1=y"]);
    }

    #[test]
    fn test_map_members_keeps_keys() {
        let map: BTreeMap<String, i32> = [("a".to_string(), 1), ("b".to_string(), 2)].into();
        let doubled = map.map_members(|slot, n| format!("{slot}:{}", n * 2));
        assert_eq!(doubled["a"], "a:2");
        assert_eq!(doubled["b"], "b:4");
    }

    #[test]
    fn test_record_members() {
        let record = Record::new().with("k", 1);
        let mut keys = Vec::new();
        record.for_each_member(|slot, _| keys.push(slot.to_string()));
        assert_eq!(keys, ["k"]);
    }
}
