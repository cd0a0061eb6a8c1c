//! Employee use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD, scope and relation entry points for employees.
//! - Apply activate/deactivate transitions durably.

use super::log_write;
use crate::model::assignment::Assignment;
use crate::model::employee::{Employee, EmployeeId};
use crate::model::store::Store;
use crate::model::validation::ValidationErrors;
use crate::repo::employee_repo::EmployeeRepository;
use crate::repo::scope::EmployeeScope;
use crate::repo::RepoResult;
use log::info;

/// Use-case service wrapper for employee records.
pub struct EmployeeService<R: EmployeeRepository> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and persists a new employee, returning its stored form.
    pub fn create_employee(&self, employee: &Employee) -> RepoResult<Employee> {
        log_write(
            "employee_create",
            "employee",
            employee.id,
            self.repo.create_employee(employee),
        )
    }

    pub fn update_employee(&self, employee: &Employee) -> RepoResult<Employee> {
        log_write(
            "employee_update",
            "employee",
            employee.id,
            self.repo.update_employee(employee),
        )
    }

    pub fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        self.repo.get_employee(id)
    }

    pub fn list_employees(&self, scope: &EmployeeScope) -> RepoResult<Vec<Employee>> {
        self.repo.list_employees(scope)
    }

    pub fn delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        log_write(
            "employee_delete",
            "employee",
            id,
            self.repo.delete_employee(id),
        )
    }

    pub fn delete_all_employees(&self) -> RepoResult<usize> {
        let removed = self.repo.delete_all_employees()?;
        info!("event=employee_delete_all module=service status=ok removed={removed}");
        Ok(removed)
    }

    pub fn validate_employee(&self, employee: &Employee) -> RepoResult<ValidationErrors> {
        self.repo.validate_employee(employee)
    }

    pub fn is_valid(&self, employee: &Employee) -> RepoResult<bool> {
        Ok(self.repo.validate_employee(employee)?.is_valid())
    }

    /// The open assignment for the employee, if any.
    pub fn current_assignment(&self, id: EmployeeId) -> RepoResult<Option<Assignment>> {
        self.repo.current_assignment(id)
    }

    /// Stores the employee was ever assigned to.
    pub fn stores(&self, id: EmployeeId) -> RepoResult<Vec<Store>> {
        self.repo.list_employee_stores(id)
    }

    pub fn make_active(&self, employee: &mut Employee) -> RepoResult<()> {
        let mut changed = employee.clone();
        changed.make_active();
        *employee = log_write(
            "employee_make_active",
            "employee",
            employee.id,
            self.repo.update_employee(&changed),
        )?;
        Ok(())
    }

    pub fn make_inactive(&self, employee: &mut Employee) -> RepoResult<()> {
        let mut changed = employee.clone();
        changed.make_inactive();
        *employee = log_write(
            "employee_make_inactive",
            "employee",
            employee.id,
            self.repo.update_employee(&changed),
        )?;
        Ok(())
    }
}
