//! Store domain model.
//!
//! # Responsibility
//! - Define the canonical store record and its field rules.
//! - Normalize raw phone input into canonical digit-only form.
//!
//! # Invariants
//! - `state` is one of `SUPPORTED_STATES`.
//! - `zip` is exactly five digits; `phone` is exactly ten digits once normalized.
//! - Name uniqueness is checked by the repository, not here, against
//!   `name_key()` so case differences outside ASCII also collide.

use crate::model::validation::{normalize_digits, Rule, ValidationErrors, PHONE_RE, ZIP_RE};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a store.
pub type StoreId = Uuid;

/// State codes a store may be located in.
pub const SUPPORTED_STATES: &[&str] = &["PA", "OH", "WV"];

/// Canonical store record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    /// Unique across all stores, ignoring letter case.
    pub name: String,
    pub street: String,
    pub city: String,
    /// Two-letter code from `SUPPORTED_STATES`.
    pub state: String,
    pub zip: String,
    /// Ten digits once normalized.
    pub phone: String,
    pub active: bool,
}

impl Store {
    /// Creates an active store draft with a generated stable ID.
    pub fn new(
        name: impl Into<String>,
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            street: street.into(),
            city: city.into(),
            state: state.into(),
            zip: zip.into(),
            phone: phone.into(),
            active: true,
        }
    }

    /// Replaces the generated ID with a caller-provided one.
    ///
    /// Used by import paths where identity already exists externally.
    ///
    /// # Errors
    /// - Returns a presence violation on `id` when `id` is nil.
    pub fn with_id(mut self, id: StoreId) -> Result<Self, ValidationErrors> {
        if id.is_nil() {
            let mut errors = ValidationErrors::new();
            errors.add("id", Rule::Presence, "must not be nil");
            return Err(errors);
        }
        self.id = id;
        Ok(self)
    }

    /// Returns a copy with formatting characters stripped from `phone`.
    pub fn normalized(&self) -> Self {
        Self {
            phone: normalize_digits(&self.phone),
            ..self.clone()
        }
    }

    /// Collects field-level violations. Expects an already normalized record.
    pub fn field_errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.id.is_nil() {
            errors.add("id", Rule::Presence, "must not be nil");
        }
        errors.require_present("name", &self.name);
        errors.require_present("street", &self.street);
        errors.require_present("city", &self.city);
        errors.require_inclusion("state", &self.state, SUPPORTED_STATES);
        errors.require_format("zip", &self.zip, &ZIP_RE);
        errors.require_format("phone", &self.phone, &PHONE_RE);
        errors
    }

    /// Validates field-level rules.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        self.field_errors().into_result()
    }

    /// Unicode lower-cased name used for case-insensitive uniqueness.
    pub fn name_key(&self) -> String {
        self.name.to_lowercase()
    }

    pub fn make_active(&mut self) {
        self.active = true;
    }

    pub fn make_inactive(&mut self) {
        self.active = false;
    }
}
