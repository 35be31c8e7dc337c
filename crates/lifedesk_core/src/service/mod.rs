//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep outer layers decoupled from storage details.

pub mod category_service;
pub mod lock_service;
pub mod note_service;
pub mod todo_service;
pub mod visibility;
