//! # Validation Reports
//!
//! Both failure channels (hard errors and warnings) carry the same record:
//! a tag naming what went wrong, the expected and actual shapes when they
//! are known, and the slash-delimited path and value at which it happened.
//!
//! Custom post-descent checks may contribute their own records. Fields with
//! no dedicated slot are kept verbatim in [`Report::extra`] and serialize
//! flattened next to the standard fields.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::{Map, Record, Value};

/// Report tags emitted by the validator itself.
pub mod tags {
    #![allow(missing_docs)]

    pub const REQUIRED_MISSING: &str = "required_missing";
    pub const FORBIDDEN_ENCOUNTERED: &str = "forbidden_encountered";
    pub const NO_ALTERNATIVE_MATCHED: &str = "no_alternative_matched";
    pub const MISMATCHING_TYPES: &str = "mismatching_types";
    pub const INVALID_VALUE: &str = "invalid_value";
    pub const NOT_A_VALID_VALUE: &str = "not_a_valid_value";
    pub const CHECK_FAILED: &str = "check_failed";
    pub const CHECKS_FAILED: &str = "checks_failed";
    pub const UNKNOWN_KEY: &str = "unknown_key";
    pub const MATCHED_EXCLUDED_TYPE: &str = "matched_excluded_type";
    pub const SANITIZE_FAILED: &str = "sanitize_failed";
}

/// One error or warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// What went wrong.
    #[serde(rename = "type")]
    pub tag: String,
    /// The shape or values the position called for.
    #[serde(default, skip_serializing_if = "Value::is_undefined")]
    pub expected: Value,
    /// What was found instead.
    #[serde(default, skip_serializing_if = "Value::is_undefined")]
    pub actual: Value,
    /// Slash-delimited path from the root; empty at the root.
    pub source_path: String,
    /// The value found at `source_path` when the report was made.
    #[serde(default)]
    pub source_value: Value,
    /// Fields contributed by custom checks.
    #[serde(flatten)]
    pub extra: Map,
}

impl Report {
    /// A report with no expected or actual detail.
    pub fn new(tag: impl Into<String>, source_path: impl Into<String>, source_value: Value) -> Self {
        Self {
            tag: tag.into(),
            expected: Value::Undefined,
            actual: Value::Undefined,
            source_path: source_path.into(),
            source_value,
            extra: Map::new(),
        }
    }

    /// Attach the expected detail.
    pub fn with_expected(mut self, expected: impl Into<Value>) -> Self {
        self.expected = expected.into();
        self
    }

    /// Attach the actual detail.
    pub fn with_actual(mut self, actual: impl Into<Value>) -> Self {
        self.actual = actual.into();
        self
    }

    /// Look up a field by its serialized name.
    pub fn field(&self, name: &str) -> Value {
        match name {
            "type" => Value::from(self.tag.as_str()),
            "expected" => self.expected.clone(),
            "actual" => self.actual.clone(),
            "sourcePath" => Value::from(self.source_path.as_str()),
            "sourceValue" => self.source_value.clone(),
            other => self.extra.get(other).cloned().unwrap_or_default(),
        }
    }

    /// The report as a record keyed by serialized field names.
    pub fn to_record(&self) -> Record {
        let mut record = Record::from(self.extra.clone());
        record.insert("type", Value::from(self.tag.as_str()));
        record.insert("sourcePath", Value::from(self.source_path.as_str()));
        record.insert("sourceValue", self.source_value.clone());
        if !self.expected.is_undefined() {
            record.insert("expected", self.expected.clone());
        }
        if !self.actual.is_undefined() {
            record.insert("actual", self.actual.clone());
        }
        record
    }

    /// Rebuild a report from a record. A missing or non-textual `type`
    /// becomes `check_failed`.
    pub fn from_record(record: Record) -> Self {
        let mut extra = record.into_members();
        let tag = match extra.remove("type") {
            Some(Value::String(tag)) => tag,
            _ => tags::CHECK_FAILED.to_string(),
        };
        let source_path = match extra.remove("sourcePath") {
            Some(Value::String(path)) => path,
            _ => String::new(),
        };
        Self {
            tag,
            expected: extra.remove("expected").unwrap_or_default(),
            actual: extra.remove("actual").unwrap_or_default(),
            source_path,
            source_value: extra.remove("sourceValue").unwrap_or_default(),
            extra,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.source_path.is_empty() {
            write!(f, "  (root): {}", self.tag)?;
        } else {
            write!(f, "  {}: {}", self.source_path, self.tag)?;
        }
        if !self.expected.is_undefined() || !self.actual.is_undefined() {
            write!(f, " (expected {}, got {})", self.expected, self.actual)?;
        }
        Ok(())
    }
}

/// An ordered collection of reports with one line per report in `Display`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Violations(Vec<Report>);

impl Violations {
    /// Number of reports.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no reports.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the reports in order.
    pub fn reports(&self) -> &[Report] {
        &self.0
    }

    /// Take the reports out.
    pub fn into_inner(self) -> Vec<Report> {
        self.0
    }
}

impl From<Vec<Report>> for Violations {
    fn from(reports: Vec<Report>) -> Self {
        Self(reports)
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, report) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{report}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_with_host_field_names() {
        let report = Report::new(tags::MISMATCHING_TYPES, "/x", Value::from("34"))
            .with_expected("number")
            .with_actual("string");
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "type": "mismatching_types",
                "expected": "number",
                "actual": "string",
                "sourcePath": "/x",
                "sourceValue": "34"
            })
        );
    }

    #[test]
    fn test_record_roundtrip_keeps_extra_fields() {
        let record = Record::new()
            .with("msgType", "custom_error")
            .with("sourcePath", "/a");
        let report = Report::from_record(record);
        assert_eq!(report.tag, tags::CHECK_FAILED);
        assert_eq!(report.field("msgType"), Value::from("custom_error"));
        assert_eq!(report.to_record().get("msgType"), Some(&Value::from("custom_error")));
    }

    #[test]
    fn test_display_root_and_path() {
        let root = Report::new(tags::REQUIRED_MISSING, "", Value::Undefined);
        let nested = Report::new(tags::REQUIRED_MISSING, "/a", Value::Undefined);
        assert_eq!(root.to_string(), "  (root): required_missing");
        assert_eq!(nested.to_string(), "  /a: required_missing");
    }

    #[test]
    fn test_violations_display_one_line_each() {
        let violations = Violations::from(vec![
            Report::new(tags::UNKNOWN_KEY, "", Value::Null).with_actual("w"),
            Report::new(tags::REQUIRED_MISSING, "/a", Value::Undefined),
        ]);
        let rendered = violations.to_string();
        assert_eq!(rendered.lines().count(), 2);
        assert!(rendered.contains("/a: required_missing"));
    }
}
