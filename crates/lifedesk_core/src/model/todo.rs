//! Todo domain model.
//!
//! # Responsibility
//! - Define the todo record with optional module relation.
//! - Define checklist elements belonging to one todo.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another todo.
//! - A module relation is only meaningful when both `module` and
//!   `related_entity_id` are set.

use crate::modules::ModuleId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for todos.
pub type TodoId = Uuid;

/// Stable identifier for todo checklist elements.
pub type TodoElementId = Uuid;

/// Todo record with optional relation to one entity of a registered module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Stable global ID.
    pub uuid: TodoId,
    /// User-facing name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Completion flag for the whole todo.
    pub completed: bool,
    /// Dashboard visibility flag.
    pub show_on_dashboard: bool,
    /// Related module, when this todo tracks another module's entity.
    pub module: Option<ModuleId>,
    /// Id of the related entity inside `module`.
    pub related_entity_id: Option<String>,
    /// Soft delete tombstone.
    pub is_deleted: bool,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

impl Todo {
    /// Creates a new active todo with a generated stable ID.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            completed: false,
            show_on_dashboard: false,
            module: None,
            related_entity_id: None,
            is_deleted: false,
            created_at: 0,
            updated_at: 0,
        }
    }

    /// Returns whether this todo should be considered active.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// Validates todo fields before persistence.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        if self.name.trim().is_empty() {
            return Err(TodoValidationError::BlankName);
        }
        if self.module.is_none() && self.related_entity_id.is_some() {
            return Err(TodoValidationError::RelationWithoutModule(self.uuid));
        }
        Ok(())
    }
}

/// Checklist row under one todo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoElement {
    /// Stable global ID.
    pub uuid: TodoElementId,
    /// Owning todo.
    pub todo_uuid: TodoId,
    /// User-facing label.
    pub name: String,
    /// Completion flag.
    pub is_done: bool,
    /// Stable order key within one todo.
    pub sort_order: i64,
}

/// Todo validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    /// Name is blank after trim.
    BlankName,
    /// Related entity id is set without a module.
    RelationWithoutModule(TodoId),
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "todo name must not be blank"),
            Self::RelationWithoutModule(id) => {
                write!(f, "todo relation requires a module: {id}")
            }
        }
    }
}

impl Error for TodoValidationError {}
