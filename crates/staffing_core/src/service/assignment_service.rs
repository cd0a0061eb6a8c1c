//! Assignment use-case service.
//!
//! # Responsibility
//! - Open and close assignments linking employees to stores.
//! - Provide scoped listing and deletion entry points.
//!
//! # Invariants
//! - Opening an assignment does not close the employee's other open ones.

use super::log_write;
use crate::model::assignment::{Assignment, AssignmentId};
use crate::model::employee::EmployeeId;
use crate::model::store::StoreId;
use crate::repo::assignment_repo::AssignmentRepository;
use crate::repo::scope::AssignmentScope;
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDate;
use log::info;

pub struct AssignmentService<R: AssignmentRepository> {
    repo: R,
}

impl<R: AssignmentRepository> AssignmentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an open assignment of `employee_id` at `store_id`.
    pub fn assign(
        &self,
        store_id: StoreId,
        employee_id: EmployeeId,
        start_date: NaiveDate,
    ) -> RepoResult<Assignment> {
        let assignment = Assignment::new(store_id, employee_id, start_date);
        self.create_assignment(&assignment)
    }

    pub fn create_assignment(&self, assignment: &Assignment) -> RepoResult<Assignment> {
        log_write(
            "assignment_create",
            "assignment",
            assignment.id,
            self.repo.create_assignment(assignment),
        )
    }

    pub fn update_assignment(&self, assignment: &Assignment) -> RepoResult<Assignment> {
        log_write(
            "assignment_update",
            "assignment",
            assignment.id,
            self.repo.update_assignment(assignment),
        )
    }

    /// Closes one assignment on `end_date`.
    ///
    /// # Errors
    /// - `NotFound` when the assignment does not exist.
    /// - `Validation` when `end_date` precedes the start date.
    pub fn end_assignment(&self, id: AssignmentId, end_date: NaiveDate) -> RepoResult<Assignment> {
        let mut assignment = self
            .repo
            .get_assignment(id)?
            .ok_or(RepoError::NotFound {
                entity: "assignment",
                id,
            })?;
        assignment.close(end_date);
        log_write(
            "assignment_end",
            "assignment",
            id,
            self.repo.update_assignment(&assignment),
        )
    }

    pub fn get_assignment(&self, id: AssignmentId) -> RepoResult<Option<Assignment>> {
        self.repo.get_assignment(id)
    }

    pub fn list_assignments(&self, scope: &AssignmentScope) -> RepoResult<Vec<Assignment>> {
        self.repo.list_assignments(scope)
    }

    pub fn delete_assignment(&self, id: AssignmentId) -> RepoResult<()> {
        log_write(
            "assignment_delete",
            "assignment",
            id,
            self.repo.delete_assignment(id),
        )
    }

    pub fn delete_all_assignments(&self) -> RepoResult<usize> {
        let removed = self.repo.delete_all_assignments()?;
        info!("event=assignment_delete_all module=service status=ok removed={removed}");
        Ok(removed)
    }
}
