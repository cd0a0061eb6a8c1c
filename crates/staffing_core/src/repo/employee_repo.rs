//! Employee repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and scoped listing over canonical `employees` storage.
//! - Derive current-assignment and all-time store relations.
//!
//! # Invariants
//! - Write paths normalize phone/SSN before validating them.
//! - SSN uniqueness compares normalized values and excludes the record itself.
//! - Role is persisted as its integer code; unknown codes are invalid data.
//! - Several open assignments may coexist; `current_assignment` picks the
//!   latest `start_date`, then the latest inserted.

use crate::model::assignment::Assignment;
use crate::model::employee::{Employee, EmployeeId, Role};
use crate::model::store::Store;
use crate::model::validation::{Rule, ValidationErrors, MSG_TAKEN};
use crate::repo::assignment_repo::{parse_assignment_row, ASSIGNMENT_SELECT_SQL};
use crate::repo::scope::EmployeeScope;
use crate::repo::store_repo::list_stores_for_employee;
use crate::repo::{
    bool_to_int, ensure_connection_ready, map_write_error, parse_flag_column, parse_uuid_column,
    RepoError, RepoResult, REQUIRED_SCHEMA,
};
use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};

pub(crate) const EMPLOYEE_SELECT_SQL: &str = "SELECT
    uuid,
    first_name,
    last_name,
    phone,
    ssn,
    date_of_birth,
    role,
    active
FROM employees";

/// Repository interface for employee records.
pub trait EmployeeRepository {
    /// Persists a new employee and returns its normalized stored form.
    fn create_employee(&self, employee: &Employee) -> RepoResult<Employee>;
    /// Replaces all fields of an existing employee.
    fn update_employee(&self, employee: &Employee) -> RepoResult<Employee>;
    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    fn list_employees(&self, scope: &EmployeeScope) -> RepoResult<Vec<Employee>>;
    /// Deletes one employee; their assignments are removed with them.
    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()>;
    /// Deletes every employee and returns how many were removed.
    fn delete_all_employees(&self) -> RepoResult<usize>;
    /// Runs the full write-path validation without writing.
    fn validate_employee(&self, employee: &Employee) -> RepoResult<ValidationErrors>;
    /// The employee's open assignment, if any.
    fn current_assignment(&self, id: EmployeeId) -> RepoResult<Option<Assignment>>;
    /// Stores the employee was ever assigned to.
    fn list_employee_stores(&self, id: EmployeeId) -> RepoResult<Vec<Store>>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_SCHEMA)?;
        Ok(Self { conn })
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn create_employee(&self, employee: &Employee) -> RepoResult<Employee> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let (candidate, errors) = screen_employee(&tx, employee)?;
        errors.into_result()?;

        tx.execute(
            "INSERT INTO employees (
                uuid,
                first_name,
                last_name,
                phone,
                ssn,
                date_of_birth,
                role,
                active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                candidate.id.to_string(),
                candidate.first_name.as_str(),
                candidate.last_name.as_str(),
                candidate.phone.as_str(),
                candidate.ssn.as_str(),
                candidate.date_of_birth,
                candidate.role.as_db(),
                bool_to_int(candidate.active),
            ],
        )
        .map_err(|err| map_write_error(err, "employees", "ssn"))?;
        tx.commit()?;

        Ok(candidate)
    }

    fn update_employee(&self, employee: &Employee) -> RepoResult<Employee> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let (candidate, errors) = screen_employee(&tx, employee)?;
        errors.into_result()?;

        let changed = tx
            .execute(
                "UPDATE employees
                 SET
                    first_name = ?1,
                    last_name = ?2,
                    phone = ?3,
                    ssn = ?4,
                    date_of_birth = ?5,
                    role = ?6,
                    active = ?7,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?8;",
                params![
                    candidate.first_name.as_str(),
                    candidate.last_name.as_str(),
                    candidate.phone.as_str(),
                    candidate.ssn.as_str(),
                    candidate.date_of_birth,
                    candidate.role.as_db(),
                    bool_to_int(candidate.active),
                    candidate.id.to_string(),
                ],
            )
            .map_err(|err| map_write_error(err, "employees", "ssn"))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "employee",
                id: candidate.id,
            });
        }
        tx.commit()?;

        Ok(candidate)
    }

    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }
        Ok(None)
    }

    fn list_employees(&self, scope: &EmployeeScope) -> RepoResult<Vec<Employee>> {
        let (sql, binds) = scope.to_sql(EMPLOYEE_SELECT_SQL);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }
        Ok(employees)
    }

    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "employee",
                id,
            });
        }
        Ok(())
    }

    fn delete_all_employees(&self) -> RepoResult<usize> {
        Ok(self.conn.execute("DELETE FROM employees;", [])?)
    }

    fn validate_employee(&self, employee: &Employee) -> RepoResult<ValidationErrors> {
        let (_, errors) = screen_employee(self.conn, employee)?;
        Ok(errors)
    }

    fn current_assignment(&self, id: EmployeeId) -> RepoResult<Option<Assignment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ASSIGNMENT_SELECT_SQL}
             WHERE employee_uuid = ?1
               AND end_date IS NULL
             ORDER BY start_date DESC, rowid DESC
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_assignment_row(row)?));
        }
        Ok(None)
    }

    fn list_employee_stores(&self, id: EmployeeId) -> RepoResult<Vec<Store>> {
        list_stores_for_employee(self.conn, id)
    }
}

/// Normalizes `employee` and collects every violation, including uniqueness.
fn screen_employee(
    conn: &Connection,
    employee: &Employee,
) -> RepoResult<(Employee, ValidationErrors)> {
    let candidate = employee.normalized();
    let mut errors = candidate.field_errors();
    if !errors.has("ssn", Rule::Presence)
        && !errors.has("ssn", Rule::Format)
        && ssn_taken(conn, &candidate.ssn, candidate.id)?
    {
        errors.add("ssn", Rule::Uniqueness, MSG_TAKEN);
    }
    Ok((candidate, errors))
}

fn ssn_taken(conn: &Connection, ssn: &str, exclude: EmployeeId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM employees
            WHERE ssn = ?1
              AND uuid <> ?2
        );",
        params![ssn, exclude.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let id = parse_uuid_column(row, "uuid")?;

    let role_code: i64 = row.get("role")?;
    let role = Role::from_db(role_code).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid role `{role_code}` in employees.role"))
    })?;

    let date_of_birth: NaiveDate = row.get("date_of_birth")?;

    let employee = Employee {
        id,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        phone: row.get("phone")?,
        ssn: row.get("ssn")?,
        date_of_birth,
        role,
        active: parse_flag_column(row, "active")?,
    };
    employee
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("employee {id}: {err}")))?;
    Ok(employee)
}
