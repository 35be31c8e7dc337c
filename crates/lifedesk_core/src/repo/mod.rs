//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes enforce model validation before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - Every returned list has a deterministic order with a uuid tiebreaker.

pub mod category_repo;
pub mod lock_repo;
pub mod note_repo;
pub mod todo_repo;
