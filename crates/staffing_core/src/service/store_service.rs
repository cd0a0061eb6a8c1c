//! Store use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD, scope and relation entry points for stores.
//! - Apply activate/deactivate transitions durably.
//!
//! # Invariants
//! - `make_active`/`make_inactive` only touch the caller's record after the
//!   change is persisted.

use super::log_write;
use crate::model::employee::Employee;
use crate::model::store::{Store, StoreId};
use crate::model::validation::ValidationErrors;
use crate::repo::scope::StoreScope;
use crate::repo::store_repo::StoreRepository;
use crate::repo::RepoResult;
use log::info;

/// Use-case service wrapper for store records.
pub struct StoreService<R: StoreRepository> {
    repo: R,
}

impl<R: StoreRepository> StoreService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and persists a new store, returning its stored form.
    pub fn create_store(&self, store: &Store) -> RepoResult<Store> {
        log_write(
            "store_create",
            "store",
            store.id,
            self.repo.create_store(store),
        )
    }

    pub fn update_store(&self, store: &Store) -> RepoResult<Store> {
        log_write(
            "store_update",
            "store",
            store.id,
            self.repo.update_store(store),
        )
    }

    pub fn get_store(&self, id: StoreId) -> RepoResult<Option<Store>> {
        self.repo.get_store(id)
    }

    pub fn list_stores(&self, scope: &StoreScope) -> RepoResult<Vec<Store>> {
        self.repo.list_stores(scope)
    }

    pub fn delete_store(&self, id: StoreId) -> RepoResult<()> {
        log_write("store_delete", "store", id, self.repo.delete_store(id))
    }

    pub fn delete_all_stores(&self) -> RepoResult<usize> {
        let removed = self.repo.delete_all_stores()?;
        info!("event=store_delete_all module=service status=ok removed={removed}");
        Ok(removed)
    }

    /// Returns every violation `store` would hit on save. Nothing is written.
    pub fn validate_store(&self, store: &Store) -> RepoResult<ValidationErrors> {
        self.repo.validate_store(store)
    }

    /// Returns whether `store` would pass validation on save.
    pub fn is_valid(&self, store: &Store) -> RepoResult<bool> {
        Ok(self.repo.validate_store(store)?.is_valid())
    }

    /// Employees ever assigned to the store.
    pub fn employees(&self, id: StoreId) -> RepoResult<Vec<Employee>> {
        self.repo.list_store_employees(id)
    }

    /// Marks the store active and persists it.
    pub fn make_active(&self, store: &mut Store) -> RepoResult<()> {
        self.set_active(store, true)
    }

    /// Marks the store inactive and persists it.
    pub fn make_inactive(&self, store: &mut Store) -> RepoResult<()> {
        self.set_active(store, false)
    }

    fn set_active(&self, store: &mut Store, active: bool) -> RepoResult<()> {
        let mut changed = store.clone();
        if active {
            changed.make_active();
        } else {
            changed.make_inactive();
        }
        let event = if active {
            "store_make_active"
        } else {
            "store_make_inactive"
        };
        *store = log_write(event, "store", store.id, self.repo.update_store(&changed))?;
        Ok(())
    }
}
