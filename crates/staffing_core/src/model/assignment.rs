//! Assignment domain model.
//!
//! # Invariants
//! - An assignment links exactly one store and one employee.
//! - `end_date = None` marks the assignment as open (current).
//! - `end_date`, when set, is not earlier than `start_date`.

use crate::model::employee::EmployeeId;
use crate::model::store::StoreId;
use crate::model::validation::{Rule, ValidationErrors, MSG_BLANK, MSG_END_BEFORE_START};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for an assignment.
pub type AssignmentId = Uuid;

/// Employment of one employee at one store over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub store_id: StoreId,
    pub employee_id: EmployeeId,
    pub start_date: NaiveDate,
    /// `None` while the assignment is still current.
    pub end_date: Option<NaiveDate>,
}

impl Assignment {
    /// Creates an open assignment starting on `start_date`.
    pub fn new(store_id: StoreId, employee_id: EmployeeId, start_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            store_id,
            employee_id,
            start_date,
            end_date: None,
        }
    }

    /// Returns whether the assignment has no end date.
    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }

    /// Sets the end date, closing the assignment.
    pub fn close(&mut self, end_date: NaiveDate) {
        self.end_date = Some(end_date);
    }

    /// Collects field-level violations. Reference checks live in the repository.
    pub fn field_errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.id.is_nil() {
            errors.add("id", Rule::Presence, "must not be nil");
        }
        if self.store_id.is_nil() {
            errors.add("store_id", Rule::Presence, MSG_BLANK);
        }
        if self.employee_id.is_nil() {
            errors.add("employee_id", Rule::Presence, MSG_BLANK);
        }
        if let Some(end_date) = self.end_date {
            if end_date < self.start_date {
                errors.add("end_date", Rule::Ordering, MSG_END_BEFORE_START);
            }
        }
        errors
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        self.field_errors().into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::Assignment;
    use crate::model::validation::Rule;
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn end_before_start_is_rejected() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut assignment = Assignment::new(Uuid::new_v4(), Uuid::new_v4(), start);
        assert!(assignment.is_open());

        assignment.close(NaiveDate::from_ymd_opt(2024, 4, 30).unwrap());
        let errors = assignment.validate().unwrap_err();
        assert!(errors.has("end_date", Rule::Ordering));

        assignment.close(start);
        assert!(assignment.validate().is_ok());
        assert!(!assignment.is_open());
    }
}
