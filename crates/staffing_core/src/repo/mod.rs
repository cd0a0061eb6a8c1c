//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per record type.
//! - Isolate SQLite query details from service orchestration.
//! - Run the normalize -> validate -> write pipeline on every write.
//!
//! # Invariants
//! - Writes never persist a record whose `ValidationErrors` is non-empty.
//! - Uniqueness pre-checks are advisory; unique indexes are the source of truth.
//! - Repository APIs return semantic errors (`NotFound`, `UniqueViolation`)
//!   in addition to DB transport errors.

pub mod assignment_repo;
pub mod employee_repo;
pub mod scope;
pub mod store_repo;

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::validation::ValidationErrors;
use rusqlite::{ffi, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Tables and columns every repository reads or joins through.
pub(crate) const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    (
        "stores",
        &[
            "uuid", "name", "street", "city", "state", "zip", "phone", "active", "name_key",
        ],
    ),
    (
        "employees",
        &[
            "uuid",
            "first_name",
            "last_name",
            "phone",
            "ssn",
            "date_of_birth",
            "role",
            "active",
        ],
    ),
    (
        "assignments",
        &["uuid", "store_uuid", "employee_uuid", "start_date", "end_date"],
    ),
];

/// Repository error shared by store, employee and assignment persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Candidate record failed validation; nothing was written.
    Validation(ValidationErrors),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target record does not exist.
    NotFound { entity: &'static str, id: Uuid },
    /// Unique index rejected a write the advisory check let through.
    UniqueViolation {
        table: &'static str,
        field: &'static str,
    },
    /// Persisted data cannot be converted into a valid record.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Returns validation details when this is a validation failure.
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Stable short code for structured log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::Db(_) => "db_error",
            Self::NotFound { .. } => "not_found",
            Self::UniqueViolation { .. } => "unique_violation",
            Self::InvalidData(_) => "invalid_data",
            Self::UninitializedConnection { .. } => "uninitialized_connection",
            Self::MissingRequiredTable(_) => "missing_table",
            Self::MissingRequiredColumn { .. } => "missing_column",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::UniqueViolation { table, field } => {
                write!(f, "unique constraint failed on `{table}.{field}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for RepoError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Maps constraint failures from an INSERT/UPDATE into semantic errors.
pub(crate) fn map_write_error(
    err: rusqlite::Error,
    table: &'static str,
    unique_field: &'static str,
) -> RepoError {
    if let rusqlite::Error::SqliteFailure(inner, _) = &err {
        match inner.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE => {
                return RepoError::UniqueViolation {
                    table,
                    field: unique_field,
                };
            }
            ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                return RepoError::UniqueViolation { table, field: "id" };
            }
            _ => {}
        }
    }
    err.into()
}

/// Verifies migration version and required table columns.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    required: &[(&'static str, &[&'static str])],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in required {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

pub(crate) fn parse_uuid_column(row: &Row<'_>, column: &'static str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{text}` in {column}")))
}

pub(crate) fn parse_flag_column(row: &Row<'_>, column: &'static str) -> RepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

/// Returns whether a row with `uuid` exists in `table`.
pub(crate) fn row_exists(conn: &Connection, table: &'static str, id: Uuid) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE uuid = ?1);"),
        [id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

#[cfg(test)]
mod tests {
    use super::{map_write_error, RepoError};
    use crate::db::open_db_in_memory;
    use rusqlite::Connection;

    fn insert_store(
        conn: &Connection,
        uuid: &str,
        name: &str,
        state: &str,
    ) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO stores (uuid, name, name_key, street, city, state, zip, phone)
             VALUES (?1, ?2, lower(?2), '1 Main St', 'Erie', ?3, '16501', '8145550100');",
            [uuid, name, state],
        )
    }

    #[test]
    fn unique_index_violation_maps_to_field() {
        let conn = open_db_in_memory().unwrap();
        insert_store(&conn, "a", "Harbor", "PA").unwrap();

        let err = insert_store(&conn, "b", "HARBOR", "PA").unwrap_err();
        assert!(matches!(
            map_write_error(err, "stores", "name"),
            RepoError::UniqueViolation {
                table: "stores",
                field: "name"
            }
        ));
    }

    #[test]
    fn primary_key_violation_maps_to_id() {
        let conn = open_db_in_memory().unwrap();
        insert_store(&conn, "a", "Harbor", "PA").unwrap();

        let err = insert_store(&conn, "a", "Lakeside", "PA").unwrap_err();
        assert!(matches!(
            map_write_error(err, "stores", "name"),
            RepoError::UniqueViolation {
                table: "stores",
                field: "id"
            }
        ));
    }

    #[test]
    fn other_constraint_failures_stay_db_errors() {
        let conn = open_db_in_memory().unwrap();

        let err = insert_store(&conn, "a", "Harbor", "NY").unwrap_err();
        let mapped = map_write_error(err, "stores", "name");
        assert_eq!(mapped.code(), "db_error");
    }
}
