//! Domain model for the personal-management core.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep validation rules next to the records they protect.
//!
//! # Invariants
//! - Every domain object is identified by a stable `Uuid`.
//! - Deletion is represented by soft-delete tombstones, not hard delete.

pub mod category;
pub mod locked_resource;
pub mod note;
pub mod todo;
