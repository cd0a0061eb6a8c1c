//! Store repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and scoped listing over canonical `stores` storage.
//! - Resolve the all-time store -> employees relation through assignments.
//!
//! # Invariants
//! - Write paths normalize, then validate, then write; never the reverse.
//! - Name uniqueness compares `Store::name_key` and excludes the record itself.
//! - `name_key` is rewritten from `name` on every write.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::model::employee::{Employee, EmployeeId};
use crate::model::store::{Store, StoreId};
use crate::model::validation::{Rule, ValidationErrors, MSG_TAKEN};
use crate::repo::employee_repo::{parse_employee_row, EMPLOYEE_SELECT_SQL};
use crate::repo::scope::StoreScope;
use crate::repo::{
    bool_to_int, ensure_connection_ready, map_write_error, parse_flag_column, parse_uuid_column,
    RepoError, RepoResult, REQUIRED_SCHEMA,
};
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};

pub(crate) const STORE_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    street,
    city,
    state,
    zip,
    phone,
    active
FROM stores";

/// Repository interface for store records.
pub trait StoreRepository {
    /// Persists a new store and returns its normalized stored form.
    fn create_store(&self, store: &Store) -> RepoResult<Store>;
    /// Replaces all fields of an existing store.
    fn update_store(&self, store: &Store) -> RepoResult<Store>;
    fn get_store(&self, id: StoreId) -> RepoResult<Option<Store>>;
    fn list_stores(&self, scope: &StoreScope) -> RepoResult<Vec<Store>>;
    /// Deletes one store; its assignments are removed with it.
    fn delete_store(&self, id: StoreId) -> RepoResult<()>;
    /// Deletes every store and returns how many were removed.
    fn delete_all_stores(&self) -> RepoResult<usize>;
    /// Runs the full write-path validation without writing.
    fn validate_store(&self, store: &Store) -> RepoResult<ValidationErrors>;
    /// Employees who ever had an assignment at the store.
    fn list_store_employees(&self, id: StoreId) -> RepoResult<Vec<Employee>>;
}

/// SQLite-backed store repository.
pub struct SqliteStoreRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStoreRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_SCHEMA)?;
        Ok(Self { conn })
    }
}

impl StoreRepository for SqliteStoreRepository<'_> {
    fn create_store(&self, store: &Store) -> RepoResult<Store> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let (candidate, errors) = screen_store(&tx, store)?;
        errors.into_result()?;

        tx.execute(
            "INSERT INTO stores (
                uuid,
                name,
                name_key,
                street,
                city,
                state,
                zip,
                phone,
                active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                candidate.id.to_string(),
                candidate.name.as_str(),
                candidate.name_key(),
                candidate.street.as_str(),
                candidate.city.as_str(),
                candidate.state.as_str(),
                candidate.zip.as_str(),
                candidate.phone.as_str(),
                bool_to_int(candidate.active),
            ],
        )
        .map_err(|err| map_write_error(err, "stores", "name"))?;
        tx.commit()?;

        Ok(candidate)
    }

    fn update_store(&self, store: &Store) -> RepoResult<Store> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let (candidate, errors) = screen_store(&tx, store)?;
        errors.into_result()?;

        let changed = tx
            .execute(
                "UPDATE stores
                 SET
                    name = ?1,
                    name_key = ?2,
                    street = ?3,
                    city = ?4,
                    state = ?5,
                    zip = ?6,
                    phone = ?7,
                    active = ?8,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?9;",
                params![
                    candidate.name.as_str(),
                    candidate.name_key(),
                    candidate.street.as_str(),
                    candidate.city.as_str(),
                    candidate.state.as_str(),
                    candidate.zip.as_str(),
                    candidate.phone.as_str(),
                    bool_to_int(candidate.active),
                    candidate.id.to_string(),
                ],
            )
            .map_err(|err| map_write_error(err, "stores", "name"))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "store",
                id: candidate.id,
            });
        }
        tx.commit()?;

        Ok(candidate)
    }

    fn get_store(&self, id: StoreId) -> RepoResult<Option<Store>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STORE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_store_row(row)?));
        }
        Ok(None)
    }

    fn list_stores(&self, scope: &StoreScope) -> RepoResult<Vec<Store>> {
        let (sql, binds) = scope.to_sql(STORE_SELECT_SQL);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut stores = Vec::new();
        while let Some(row) = rows.next()? {
            stores.push(parse_store_row(row)?);
        }
        Ok(stores)
    }

    fn delete_store(&self, id: StoreId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM stores WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "store", id });
        }
        Ok(())
    }

    fn delete_all_stores(&self) -> RepoResult<usize> {
        Ok(self.conn.execute("DELETE FROM stores;", [])?)
    }

    fn validate_store(&self, store: &Store) -> RepoResult<ValidationErrors> {
        let (_, errors) = screen_store(self.conn, store)?;
        Ok(errors)
    }

    fn list_store_employees(&self, id: StoreId) -> RepoResult<Vec<Employee>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EMPLOYEE_SELECT_SQL}
             WHERE uuid IN (
                SELECT employee_uuid FROM assignments WHERE store_uuid = ?1
             )
             ORDER BY rowid ASC;"
        ))?;
        let mut rows = stmt.query([id.to_string()])?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }
        Ok(employees)
    }
}

/// Normalizes `store` and collects every violation, including uniqueness.
fn screen_store(conn: &Connection, store: &Store) -> RepoResult<(Store, ValidationErrors)> {
    let candidate = store.normalized();
    let mut errors = candidate.field_errors();
    if !errors.has("name", Rule::Presence)
        && name_taken(conn, &candidate.name_key(), candidate.id)?
    {
        errors.add("name", Rule::Uniqueness, MSG_TAKEN);
    }
    Ok((candidate, errors))
}

fn name_taken(conn: &Connection, name_key: &str, exclude: StoreId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM stores
            WHERE name_key = ?1
              AND uuid <> ?2
        );",
        params![name_key, exclude.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn parse_store_row(row: &Row<'_>) -> RepoResult<Store> {
    let store = Store {
        id: parse_uuid_column(row, "uuid")?,
        name: row.get("name")?,
        street: row.get("street")?,
        city: row.get("city")?,
        state: row.get("state")?,
        zip: row.get("zip")?,
        phone: row.get("phone")?,
        active: parse_flag_column(row, "active")?,
    };
    store
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("store {}: {err}", store.id)))?;
    Ok(store)
}

/// Stores the employee was ever assigned to, in insertion order.
pub(crate) fn list_stores_for_employee(
    conn: &Connection,
    employee_id: EmployeeId,
) -> RepoResult<Vec<Store>> {
    let mut stmt = conn.prepare(&format!(
        "{STORE_SELECT_SQL}
         WHERE uuid IN (
            SELECT store_uuid FROM assignments WHERE employee_uuid = ?1
         )
         ORDER BY rowid ASC;"
    ))?;
    let mut rows = stmt.query([employee_id.to_string()])?;
    let mut stores = Vec::new();
    while let Some(row) = rows.next()? {
        stores.push(parse_store_row(row)?);
    }
    Ok(stores)
}
