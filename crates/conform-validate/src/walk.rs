//! # Recursive Walker
//!
//! Descends a value tree alongside a compiled schema tree. At every position
//! the schema is applied in a fixed order:
//!
//! 1. presence resolution (absent values end here);
//! 2. forbidden values fail;
//! 3. alternatives, first match wins;
//! 4. `sanitize_before` transformers;
//! 5. one alias lookup;
//! 6. type check against the shape the value had on arrival (strict
//!    failure, or a warning plus coercion);
//! 7. `allowed`, then `invalid`, then `valid`;
//! 8. pre-descent checks;
//! 9. structural descent into objects and arrays;
//! 10. post-descent checks, whose failures are warnings;
//! 11. `sanitize` transformers.
//!
//! The walker owns the value it is given and returns a freshly built tree;
//! nothing the caller holds is modified. Warnings accumulate on the walker
//! for the whole validation. Errors travel back with each [`Outcome`].

use conform_core::{cast, equals, equals_ignoring_case, tags, Record, Report, Slot, Value};
use conform_schema::{Capabilities, CompiledSchema, Presence, SchemaType, Verdict};

use crate::options::ValidationOptions;
use crate::sandbox;

/// The value produced at one position and the errors that rejected it.
#[derive(Debug)]
pub(crate) struct Outcome {
    pub value: Value,
    pub errors: Vec<Report>,
}

impl Outcome {
    fn ok(value: Value) -> Self {
        Self {
            value,
            errors: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Descent result of an object or array: the rebuilt container, or the
/// partially rebuilt container and the member errors.
type Descent = Result<Value, (Value, Vec<Report>)>;

pub(crate) struct Walker<'a> {
    options: &'a ValidationOptions,
    caps: &'a dyn Capabilities,
    warnings: Vec<Report>,
}

impl<'a> Walker<'a> {
    pub fn new(options: &'a ValidationOptions, caps: &'a dyn Capabilities) -> Self {
        Self {
            options,
            caps,
            warnings: Vec::new(),
        }
    }

    pub fn into_warnings(self) -> Vec<Report> {
        self.warnings
    }

    pub fn walk(&mut self, value: Value, schema: &CompiledSchema, path: &str) -> Outcome {
        let presence = schema.presence.unwrap_or(self.options.presence);
        let actual = value.type_of();

        if value.is_undefined() {
            return match presence {
                Presence::Optional => Outcome::ok(schema.default_value.clone()),
                Presence::Required => self.fail(
                    schema,
                    presence,
                    Value::Undefined,
                    Report::new(tags::REQUIRED_MISSING, path, Value::Undefined),
                ),
                Presence::Forbidden => Outcome::ok(Value::Undefined),
            };
        }

        if presence == Presence::Forbidden {
            let report = Report::new(tags::FORBIDDEN_ENCOUNTERED, path, value);
            return self.fail(schema, presence, Value::Undefined, report);
        }

        if !schema.alternatives.is_empty() {
            for alternative in &schema.alternatives {
                let mark = self.warnings.len();
                let outcome = self.walk(value.clone(), alternative, path);
                if outcome.is_ok() {
                    return outcome;
                }
                self.warnings.truncate(mark);
            }
            let report = Report::new(tags::NO_ALTERNATIVE_MATCHED, path, value);
            return self.fail(schema, presence, schema.default_value.clone(), report);
        }

        let mut value = value;
        for sanitizer in &schema.sanitize_before {
            let before = value.clone();
            match sandbox::transform(sanitizer, value, path) {
                Some(sanitized) => value = sanitized,
                None => {
                    let report = Report::new(tags::SANITIZE_FAILED, path, before);
                    return self.fail(schema, presence, schema.default_value.clone(), report);
                }
            }
        }

        if let Some(canonical) = value
            .property_key()
            .and_then(|key| schema.alias.get(&key))
            .filter(|canonical| !canonical.is_nullish())
        {
            value = canonical.clone();
        }

        if let Some(expected) = schema.schema_type {
            if actual != expected.value_type() {
                let report = Report::new(tags::MISMATCHING_TYPES, path, value.clone())
                    .with_expected(expected.to_string())
                    .with_actual(actual.name());
                if self.options.strict {
                    return self.fail(schema, presence, schema.default_value.clone(), report);
                }
                self.warnings.push(report);
                value = cast(value, expected.value_type());
            }
        }

        if contains(&schema.allowed, &value, schema.insensitive) {
            return Outcome::ok(value);
        }
        if contains(&schema.invalid, &value, schema.insensitive) {
            let report = Report::new(tags::INVALID_VALUE, path, value);
            return self.fail(schema, presence, schema.default_value.clone(), report);
        }
        if !schema.valid.is_empty() {
            if contains(&schema.valid, &value, schema.insensitive) {
                return Outcome::ok(value);
            }
            let report = Report::new(tags::NOT_A_VALID_VALUE, path, value)
                .with_expected(schema.valid.clone());
            return self.fail(schema, presence, schema.default_value.clone(), report);
        }

        let failed = self.run_checks(schema, &value, path);
        if !failed.is_empty() {
            let report =
                Report::new(tags::CHECKS_FAILED, path, value).with_expected(Value::Array(failed));
            return self.fail(schema, presence, schema.default_value.clone(), report);
        }

        let descent = match schema.schema_type {
            Some(SchemaType::Object) => self.descend_object(value, schema, path),
            Some(SchemaType::Array) => self.descend_array(value, schema, path),
            _ => Ok(value),
        };
        let mut value = match descent {
            Ok(value) => value,
            Err((partial, errors)) => return self.fail_all(schema, presence, partial, errors),
        };

        self.run_checks_after(schema, &value, path);

        for sanitizer in &schema.sanitize {
            let before = value.clone();
            match sandbox::transform(sanitizer, value, path) {
                Some(sanitized) => value = sanitized,
                None => {
                    let report = Report::new(tags::SANITIZE_FAILED, path, before);
                    return self.fail(schema, presence, schema.default_value.clone(), report);
                }
            }
        }

        Outcome::ok(value)
    }

    // ─── Failure ────────────────────────────────────────────────────

    fn fail(
        &mut self,
        schema: &CompiledSchema,
        presence: Presence,
        value: Value,
        report: Report,
    ) -> Outcome {
        self.fail_all(schema, presence, value, vec![report])
    }

    /// An optional position with a default downgrades its errors to
    /// warnings when `warn_on_invalid_optionals` is set.
    fn fail_all(
        &mut self,
        schema: &CompiledSchema,
        presence: Presence,
        value: Value,
        errors: Vec<Report>,
    ) -> Outcome {
        if !schema.default_value.is_nullish()
            && presence == Presence::Optional
            && self.options.warn_on_invalid_optionals
        {
            self.warnings.extend(errors);
            return Outcome::ok(value);
        }
        Outcome { value, errors }
    }

    // ─── Checks ─────────────────────────────────────────────────────

    /// Failure details of every pre-descent check that did not pass.
    fn run_checks(&self, schema: &CompiledSchema, value: &Value, path: &str) -> Vec<Value> {
        let mut failed = Vec::new();
        for check in &schema.checks {
            match sandbox::evaluate(check, value, path) {
                Some(Verdict::Pass) => {}
                Some(Verdict::Fail(detail @ Value::Object(_))) => failed.push(detail),
                Some(Verdict::Fail(_)) | None => failed.push(Value::Object(
                    Report::new(tags::CHECK_FAILED, path, value.clone()).to_record(),
                )),
            }
        }
        failed
    }

    fn run_checks_after(&mut self, schema: &CompiledSchema, value: &Value, path: &str) {
        for check in &schema.checks_after {
            if let Some(Verdict::Fail(detail)) = sandbox::evaluate(check, value, path) {
                self.custom_warning(detail, value, path);
            }
        }
    }

    fn custom_warning(&mut self, detail: Value, value: &Value, path: &str) {
        match detail {
            Value::Array(details) => {
                for detail in details {
                    self.custom_warning(detail, value, path);
                }
            }
            Value::String(tag) => self.warnings.push(Report::new(tag, path, value.clone())),
            Value::Object(overlay) => {
                let base = Report::new(tags::CHECK_FAILED, path, value.clone()).to_record();
                let derived = self.caps.derive(&base, &overlay);
                self.warnings.push(Report::from_record(derived));
            }
            _ => self
                .warnings
                .push(Report::new(tags::CHECK_FAILED, path, value.clone())),
        }
    }

    // ─── Descent ────────────────────────────────────────────────────

    fn descend_object(&mut self, value: Value, schema: &CompiledSchema, path: &str) -> Descent {
        let record = match value {
            Value::Object(record) => record,
            _ => Record::new(),
        };
        let own_keys = self.caps.own_keys(&record);
        let has_unknown = own_keys.iter().any(|key| !schema.keys.contains_key(key));
        let source = if has_unknown {
            Value::Object(record.clone())
        } else {
            Value::Undefined
        };

        let mut result = match record.class() {
            Some(class) => Record::instance(class),
            None => Record::new(),
        };
        let mut members = record.into_members();
        let mut errors = Vec::new();

        for (key, key_schema) in &schema.keys {
            let member = members.remove(key).unwrap_or_default();
            let outcome = self.walk(member, key_schema, &Slot::Key(key).join(path));
            if !outcome.is_ok() {
                let key_presence = key_schema.presence.unwrap_or(self.options.presence);
                if key_presence == Presence::Optional && self.options.warn_on_invalid_optionals {
                    self.warnings.extend(outcome.errors);
                } else {
                    errors.extend(outcome.errors);
                }
            }
            if !outcome.value.is_undefined() {
                result.insert(key.clone(), outcome.value);
            }
        }

        for key in own_keys {
            let Some(member) = members.remove(&key) else {
                continue;
            };
            let pattern = schema
                .pattern
                .as_ref()
                .filter(|pattern| pattern.regex.is_match(&key));
            if let Some(pattern) = pattern {
                let outcome = self.walk(member, &pattern.schema, &Slot::Key(&key).join(path));
                self.warnings.extend(outcome.errors);
                if !outcome.value.is_undefined() {
                    result.insert(key, outcome.value);
                }
                continue;
            }

            let unknown =
                Report::new(tags::UNKNOWN_KEY, path, source.clone()).with_actual(key.as_str());
            if self.options.allow_unknown {
                if self.options.warn_unknown {
                    self.warnings.push(unknown);
                }
            } else {
                errors.push(unknown);
            }
            if !self.options.strip_unknown {
                result.insert(key, member);
            }
        }

        if errors.is_empty() {
            Ok(Value::Object(result))
        } else {
            Err((Value::Object(result), errors))
        }
    }

    fn descend_array(&mut self, value: Value, schema: &CompiledSchema, path: &str) -> Descent {
        let items = match value {
            Value::Array(items) => items,
            _ => Vec::new(),
        };
        if schema.includes.is_empty() && schema.excludes.is_empty() {
            return Ok(Value::Array(items));
        }
        let mut accepted = Vec::with_capacity(items.len());
        let mut errors = Vec::new();

        for (index, item) in items.into_iter().enumerate() {
            let item_path = Slot::Index(index).join(path);
            if !schema.includes.is_empty() {
                let mut last_errors = Vec::new();
                let mut matched = None;
                for candidate in &schema.includes {
                    let mark = self.warnings.len();
                    let outcome = self.walk(item.clone(), candidate, &item_path);
                    if outcome.is_ok() {
                        matched = Some(outcome.value);
                        break;
                    }
                    self.warnings.truncate(mark);
                    last_errors = outcome.errors;
                }
                match matched {
                    Some(value) => accepted.push(value),
                    None => errors.extend(last_errors),
                }
            } else {
                let excluded = schema.excludes.iter().any(|candidate| {
                    let mark = self.warnings.len();
                    let matched = self.walk(item.clone(), candidate, &item_path).is_ok();
                    self.warnings.truncate(mark);
                    matched
                });
                if excluded {
                    errors.push(Report::new(tags::MATCHED_EXCLUDED_TYPE, item_path, item));
                } else {
                    accepted.push(item);
                }
            }
        }

        if errors.is_empty() {
            Ok(Value::Array(accepted))
        } else {
            Err((Value::Array(accepted), errors))
        }
    }
}

fn contains(candidates: &[Value], value: &Value, insensitive: bool) -> bool {
    candidates.iter().any(|candidate| {
        if insensitive {
            equals_ignoring_case(candidate, value)
        } else {
            equals(candidate, value)
        }
    })
}
