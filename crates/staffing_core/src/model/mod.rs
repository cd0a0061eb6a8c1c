//! Domain model for stores, employees and assignments.
//!
//! # Responsibility
//! - Define canonical record shapes used by repositories and services.
//! - Own field normalization and field-level validation rules.
//!
//! # Invariants
//! - Every record is identified by a stable, non-nil UUID.
//! - Records are normalized before they are validated, never after.

pub mod assignment;
pub mod employee;
pub mod store;
pub mod validation;
