//! Employee domain model.
//!
//! # Responsibility
//! - Define the canonical employee record and its closed role set.
//! - Normalize raw phone/SSN input and derive display/age helpers.
//!
//! # Invariants
//! - `role` is stored as its integer code (1, 2 or 3).
//! - `phone` is ten digits and `ssn` nine digits once normalized.
//! - SSN uniqueness is checked by the repository, not here.

use crate::model::validation::{normalize_digits, Rule, ValidationErrors, PHONE_RE, SSN_RE};
use chrono::{Datelike, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier for an employee.
pub type EmployeeId = Uuid;

const ADULT_AGE_YEARS: u32 = 18;

/// Employee permission tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Base tier, queried as "regulars".
    #[default]
    Employee,
    Manager,
    Admin,
}

impl Role {
    /// Every role with its storage code, in code order.
    pub const ALL: [(Role, i64); 3] = [(Role::Employee, 1), (Role::Manager, 2), (Role::Admin, 3)];

    /// Integer code persisted in `employees.role`.
    pub fn as_db(self) -> i64 {
        match self {
            Self::Employee => 1,
            Self::Manager => 2,
            Self::Admin => 3,
        }
    }

    /// Parses a persisted role code. Unknown codes yield `None`.
    pub fn from_db(value: i64) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|(_, code)| *code == value)
            .map(|(role, _)| *role)
    }

    /// Display label (`employee|manager|admin`).
    pub fn label(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Manager => "manager",
            Self::Admin => "admin",
        }
    }

    pub fn is_employee(self) -> bool {
        self == Self::Employee
    }

    pub fn is_manager(self) -> bool {
        self == Self::Manager
    }

    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "employee" => Ok(Self::Employee),
            "manager" => Ok(Self::Manager),
            "admin" => Ok(Self::Admin),
            other => Err(format!("invalid employee role: {other}")),
        }
    }
}

/// Canonical employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    /// Ten digits once normalized.
    pub phone: String,
    /// Nine digits once normalized; unique across all employees.
    pub ssn: String,
    pub date_of_birth: NaiveDate,
    pub role: Role,
    pub active: bool,
}

impl Employee {
    /// Creates an active employee draft with role `Employee`.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
        ssn: impl Into<String>,
        date_of_birth: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: phone.into(),
            ssn: ssn.into(),
            date_of_birth,
            role: Role::default(),
            active: true,
        }
    }

    /// Builder-style role override.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Replaces the generated ID with a caller-provided one.
    ///
    /// # Errors
    /// - Returns a presence violation on `id` when `id` is nil.
    pub fn with_id(mut self, id: EmployeeId) -> Result<Self, ValidationErrors> {
        if id.is_nil() {
            let mut errors = ValidationErrors::new();
            errors.add("id", Rule::Presence, "must not be nil");
            return Err(errors);
        }
        self.id = id;
        Ok(self)
    }

    /// Returns a copy with formatting characters stripped from `phone` and `ssn`.
    pub fn normalized(&self) -> Self {
        Self {
            phone: normalize_digits(&self.phone),
            ssn: normalize_digits(&self.ssn),
            ..self.clone()
        }
    }

    /// Collects field-level violations. Expects an already normalized record.
    pub fn field_errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.id.is_nil() {
            errors.add("id", Rule::Presence, "must not be nil");
        }
        errors.require_present("first_name", &self.first_name);
        errors.require_present("last_name", &self.last_name);
        errors.require_format("phone", &self.phone, &PHONE_RE);
        errors.require_format("ssn", &self.ssn, &SSN_RE);
        errors
    }

    /// Validates field-level rules.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        self.field_errors().into_result()
    }

    /// `"{last_name}, {first_name}"`.
    pub fn name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }

    /// `"{first_name} {last_name}"`.
    pub fn proper_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns whether the employee turned 18 on or before `today`.
    pub fn is_over_18_on(&self, today: NaiveDate) -> bool {
        match today.checked_sub_months(Months::new(12 * ADULT_AGE_YEARS)) {
            Some(boundary) => self.date_of_birth <= boundary,
            None => false,
        }
    }

    /// `is_over_18_on` evaluated against the local calendar date.
    pub fn is_over_18(&self) -> bool {
        self.is_over_18_on(Local::now().date_naive())
    }

    /// Whole years of age on `today`; zero for future birth dates.
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        let dob = self.date_of_birth;
        if today <= dob {
            return 0;
        }
        let mut years = today.year() - dob.year();
        if (today.month(), today.day()) < (dob.month(), dob.day()) {
            years -= 1;
        }
        u32::try_from(years).unwrap_or(0)
    }

    pub fn make_active(&mut self) {
        self.active = true;
    }

    pub fn make_inactive(&mut self) {
        self.active = false;
    }
}
