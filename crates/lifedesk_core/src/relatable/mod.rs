//! Relatable-entity providers and registry.
//!
//! # Responsibility
//! - Let todos relate to entities of other modules without a central
//!   per-module switch.
//! - Keep the provider set open for extension through registration.

pub mod note_provider;
pub mod registry;
