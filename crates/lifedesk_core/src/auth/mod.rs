//! Authorization context and permission guards.
//!
//! # Responsibility
//! - Carry the requesting actor's roles as an explicit value, not ambient
//!   state.
//! - Answer "may the current actor see resource X of type T in module M?"
//!   against the lock registry.
//!
//! # Invariants
//! - Guards never mutate lock markers; permission checks are pure reads.

pub mod context;
pub mod guard;
