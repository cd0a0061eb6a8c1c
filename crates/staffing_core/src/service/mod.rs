//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Own activate/deactivate transitions and assignment lifecycle.
//! - Emit metadata-only diagnostic events (ids, counts, error codes).
//!
//! # Invariants
//! - Services never bypass repository validation/persistence contracts.
//! - Log lines never contain names, phone numbers or SSNs.

pub mod assignment_service;
pub mod employee_service;
pub mod store_service;

use crate::repo::{RepoError, RepoResult};
use log::{info, warn};
use uuid::Uuid;

/// Logs the outcome of one write and passes the result through.
fn log_write<T>(
    event: &'static str,
    entity: &'static str,
    id: Uuid,
    result: RepoResult<T>,
) -> RepoResult<T> {
    match &result {
        Ok(_) => info!("event={event} module=service entity={entity} id={id} status=ok"),
        Err(RepoError::Validation(errors)) => warn!(
            "event={event} module=service entity={entity} id={id} status=rejected error_code=validation_failed fields={}",
            errors.fields().collect::<Vec<_>>().join(",")
        ),
        Err(err) => warn!(
            "event={event} module=service entity={entity} id={id} status=error error_code={}",
            err.code()
        ),
    }
    result
}
