//! Core domain logic for store staffing records.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{default_log_level, ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{active_logging, init_logging, LoggingError};
pub use model::assignment::{Assignment, AssignmentId};
pub use model::employee::{Employee, EmployeeId, Role};
pub use model::store::{Store, StoreId, SUPPORTED_STATES};
pub use model::validation::{Rule, ValidationError, ValidationErrors, Violation};
pub use repo::assignment_repo::{AssignmentRepository, SqliteAssignmentRepository};
pub use repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
pub use repo::scope::{
    AssignmentFilter, AssignmentOrder, AssignmentScope, EmployeeFilter, EmployeeOrder,
    EmployeeScope, Scope, StoreFilter, StoreOrder, StoreScope,
};
pub use repo::store_repo::{SqliteStoreRepository, StoreRepository};
pub use repo::{RepoError, RepoResult};
pub use service::assignment_service::AssignmentService;
pub use service::employee_service::EmployeeService;
pub use service::store_service::StoreService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
