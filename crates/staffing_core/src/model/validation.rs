//! Field normalization and validation result types.
//!
//! # Responsibility
//! - Strip formatting characters from phone/SSN-like inputs.
//! - Collect per-field rule violations into one structured result.
//!
//! # Invariants
//! - Normalization runs before validation on every write path.
//! - A record is valid iff its `ValidationErrors` is empty.
//! - Violations are grouped by field in deterministic (field name) order.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub(crate) static ZIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{5}$").expect("valid zip regex"));
pub(crate) static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{10}$").expect("valid phone regex"));
pub(crate) static SSN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{9}$").expect("valid ssn regex"));

pub const MSG_BLANK: &str = "can't be blank";
pub const MSG_INVALID: &str = "is invalid";
pub const MSG_NOT_INCLUDED: &str = "is not included in the list";
pub const MSG_TAKEN: &str = "has already been taken";
pub const MSG_END_BEFORE_START: &str = "must not be earlier than start date";
pub const MSG_MISSING_REFERENCE: &str = "does not exist";

/// Validation rule kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Field must be non-blank.
    Presence,
    /// Field must match its anchored format.
    Format,
    /// Field must be one of an allowed set.
    Inclusion,
    /// Field value must not collide with another record.
    Uniqueness,
    /// Field must be ordered correctly relative to another field.
    Ordering,
    /// Field must reference an existing record.
    Reference,
}

/// One failed rule on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule: Rule,
    pub message: String,
}

/// Flattened view of a single violation including its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationError<'a> {
    pub field: &'static str,
    pub rule: Rule,
    pub message: &'a str,
}

/// Per-field collection of violated rules for one candidate record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, Vec<Violation>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether no rule was violated.
    pub fn is_valid(&self) -> bool {
        self.fields.is_empty()
    }

    /// Records one violation for `field`.
    pub fn add(&mut self, field: &'static str, rule: Rule, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(Violation {
            rule,
            message: message.into(),
        });
    }

    /// Returns messages recorded for `field`, in insertion order.
    pub fn messages(&self, field: &str) -> Vec<&str> {
        self.fields
            .get(field)
            .map(|items| items.iter().map(|item| item.message.as_str()).collect())
            .unwrap_or_default()
    }

    /// Returns whether `field` violated `rule`.
    pub fn has(&self, field: &str, rule: Rule) -> bool {
        self.fields
            .get(field)
            .is_some_and(|items| items.iter().any(|item| item.rule == rule))
    }

    /// Field names with at least one violation.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = ValidationError<'_>> + '_ {
        self.fields.iter().flat_map(|(&field, items)| {
            items.iter().map(move |item| ValidationError {
                field,
                rule: item.rule,
                message: item.message.as_str(),
            })
        })
    }

    pub fn len(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Merges violations from another result into this one.
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, items) in other.fields {
            self.fields.entry(field).or_default().extend(items);
        }
    }

    /// Converts into `Ok(())` when valid, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Checks non-blank presence. Returns whether the value was present.
    pub(crate) fn require_present(&mut self, field: &'static str, value: &str) -> bool {
        if is_blank(value) {
            self.add(field, Rule::Presence, MSG_BLANK);
            return false;
        }
        true
    }

    /// Checks presence, then an anchored format when present.
    pub(crate) fn require_format(&mut self, field: &'static str, value: &str, pattern: &Regex) {
        if self.require_present(field, value) && !pattern.is_match(value) {
            self.add(field, Rule::Format, MSG_INVALID);
        }
    }

    /// Checks presence, then membership in `allowed` when present.
    pub(crate) fn require_inclusion(
        &mut self,
        field: &'static str,
        value: &str,
        allowed: &[&str],
    ) {
        if self.require_present(field, value) && !allowed.contains(&value) {
            self.add(field, Rule::Inclusion, MSG_NOT_INCLUDED);
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed:")?;
        let mut first = true;
        for error in self.iter() {
            let separator = if first { " " } else { "; " };
            write!(f, "{separator}{} {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl Error for ValidationErrors {}

/// Returns whether a raw input counts as absent.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Removes every character that is not an ASCII decimal digit.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Normalizes a phone/SSN-like field.
///
/// Blank input is returned unchanged so presence validation reports it.
pub fn normalize_digits(raw: &str) -> String {
    if is_blank(raw) {
        return raw.to_string();
    }
    digits_only(raw)
}
