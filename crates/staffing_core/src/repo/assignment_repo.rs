//! Assignment repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and scoped listing over canonical `assignments` storage.
//!
//! # Invariants
//! - Referenced store and employee must exist at write time.
//! - `end_date` is never earlier than `start_date`.
//! - Multiple open assignments per employee are not rejected here.

use crate::model::assignment::{Assignment, AssignmentId};
use crate::model::validation::{Rule, ValidationErrors, MSG_MISSING_REFERENCE};
use crate::repo::scope::AssignmentScope;
use crate::repo::{
    ensure_connection_ready, map_write_error, parse_uuid_column, row_exists, RepoError,
    RepoResult, REQUIRED_SCHEMA,
};
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};

pub(crate) const ASSIGNMENT_SELECT_SQL: &str = "SELECT
    uuid,
    store_uuid,
    employee_uuid,
    start_date,
    end_date
FROM assignments";

/// Repository interface for assignment records.
pub trait AssignmentRepository {
    fn create_assignment(&self, assignment: &Assignment) -> RepoResult<Assignment>;
    /// Replaces all fields of an existing assignment.
    fn update_assignment(&self, assignment: &Assignment) -> RepoResult<Assignment>;
    fn get_assignment(&self, id: AssignmentId) -> RepoResult<Option<Assignment>>;
    fn list_assignments(&self, scope: &AssignmentScope) -> RepoResult<Vec<Assignment>>;
    fn delete_assignment(&self, id: AssignmentId) -> RepoResult<()>;
    /// Deletes every assignment and returns how many were removed.
    fn delete_all_assignments(&self) -> RepoResult<usize>;
    /// Runs the full write-path validation without writing.
    fn validate_assignment(&self, assignment: &Assignment) -> RepoResult<ValidationErrors>;
}

/// SQLite-backed assignment repository.
pub struct SqliteAssignmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAssignmentRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_SCHEMA)?;
        Ok(Self { conn })
    }
}

impl AssignmentRepository for SqliteAssignmentRepository<'_> {
    fn create_assignment(&self, assignment: &Assignment) -> RepoResult<Assignment> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        screen_assignment(&tx, assignment)?.into_result()?;

        tx.execute(
            "INSERT INTO assignments (
                uuid,
                store_uuid,
                employee_uuid,
                start_date,
                end_date
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                assignment.id.to_string(),
                assignment.store_id.to_string(),
                assignment.employee_id.to_string(),
                assignment.start_date,
                assignment.end_date,
            ],
        )
        .map_err(|err| map_write_error(err, "assignments", "id"))?;
        tx.commit()?;

        Ok(assignment.clone())
    }

    fn update_assignment(&self, assignment: &Assignment) -> RepoResult<Assignment> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        screen_assignment(&tx, assignment)?.into_result()?;

        let changed = tx.execute(
            "UPDATE assignments
             SET
                store_uuid = ?1,
                employee_uuid = ?2,
                start_date = ?3,
                end_date = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?5;",
            params![
                assignment.store_id.to_string(),
                assignment.employee_id.to_string(),
                assignment.start_date,
                assignment.end_date,
                assignment.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "assignment",
                id: assignment.id,
            });
        }
        tx.commit()?;

        Ok(assignment.clone())
    }

    fn get_assignment(&self, id: AssignmentId) -> RepoResult<Option<Assignment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ASSIGNMENT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_assignment_row(row)?));
        }
        Ok(None)
    }

    fn list_assignments(&self, scope: &AssignmentScope) -> RepoResult<Vec<Assignment>> {
        let (sql, binds) = scope.to_sql(ASSIGNMENT_SELECT_SQL);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut assignments = Vec::new();
        while let Some(row) = rows.next()? {
            assignments.push(parse_assignment_row(row)?);
        }
        Ok(assignments)
    }

    fn delete_assignment(&self, id: AssignmentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM assignments WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "assignment",
                id,
            });
        }
        Ok(())
    }

    fn delete_all_assignments(&self) -> RepoResult<usize> {
        Ok(self.conn.execute("DELETE FROM assignments;", [])?)
    }

    fn validate_assignment(&self, assignment: &Assignment) -> RepoResult<ValidationErrors> {
        screen_assignment(self.conn, assignment)
    }
}

fn screen_assignment(conn: &Connection, assignment: &Assignment) -> RepoResult<ValidationErrors> {
    let mut errors = assignment.field_errors();
    if !errors.has("store_id", Rule::Presence)
        && !row_exists(conn, "stores", assignment.store_id)?
    {
        errors.add("store_id", Rule::Reference, MSG_MISSING_REFERENCE);
    }
    if !errors.has("employee_id", Rule::Presence)
        && !row_exists(conn, "employees", assignment.employee_id)?
    {
        errors.add("employee_id", Rule::Reference, MSG_MISSING_REFERENCE);
    }
    Ok(errors)
}

pub(crate) fn parse_assignment_row(row: &Row<'_>) -> RepoResult<Assignment> {
    let assignment = Assignment {
        id: parse_uuid_column(row, "uuid")?,
        store_id: parse_uuid_column(row, "store_uuid")?,
        employee_id: parse_uuid_column(row, "employee_uuid")?,
        start_date: row.get("start_date")?,
        end_date: row.get("end_date")?,
    };
    assignment
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("assignment {}: {err}", assignment.id)))?;
    Ok(assignment)
}
