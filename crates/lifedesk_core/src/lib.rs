//! Core domain logic for LifeDesk personal management.
//! This crate is the single source of truth for business invariants.

pub mod auth;
pub mod db;
pub mod logging;
pub mod model;
pub mod modules;
pub mod relatable;
pub mod repo;
pub mod service;

pub use auth::context::{AuthContext, ROLE_SEE_LOCKED_RESOURCES};
pub use auth::guard::{LockRegistryGuard, ResourceGuard};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, CategoryId, CategoryValidationError};
pub use model::locked_resource::{LockedResource, ResourceKind};
pub use model::note::{Note, NoteId, NoteValidationError};
pub use model::todo::{Todo, TodoElement, TodoElementId, TodoId, TodoValidationError};
pub use modules::{parse_module_id, supported_module_strings, ModuleId, ModuleIdError};
pub use relatable::note_provider::NoteRelatableProvider;
pub use relatable::registry::{EntityData, RelatableError, RelatableProvider, RelatableRegistry};
pub use repo::category_repo::{
    CategoryRepoError, CategoryRepoResult, CategoryRepository, SqliteCategoryRepository,
};
pub use repo::lock_repo::{LockRepoError, LockRepoResult, LockRepository, SqliteLockRepository};
pub use repo::note_repo::{NoteRepoError, NoteRepoResult, NoteRepository, SqliteNoteRepository};
pub use repo::todo_repo::{SqliteTodoRepository, TodoRepoError, TodoRepoResult, TodoRepository};
pub use service::category_service::{CategoryService, CategoryServiceError};
pub use service::lock_service::{LockService, LockServiceError, LockState};
pub use service::note_service::{derive_preview_text, NoteService, NoteServiceError};
pub use service::todo_service::{TodoService, TodoServiceError};
pub use service::visibility::{VisibilityError, VisibilityService};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
