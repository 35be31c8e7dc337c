//! Todo use-case service.
//!
//! # Responsibility
//! - Provide todo CRUD, checklist, and module-relation APIs.
//! - Validate relation candidates through the relatable registry.
//!
//! # Invariants
//! - A relation targets an existing entity of a registered module.
//! - One entity carries at most one active todo relation.

use crate::model::todo::{Todo, TodoElement, TodoElementId, TodoId};
use crate::modules::ModuleId;
use crate::relatable::registry::{EntityData, RelatableError, RelatableRegistry};
use crate::repo::todo_repo::{TodoRepoError, TodoRepository};
use log::{info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from todo service operations.
#[derive(Debug)]
pub enum TodoServiceError {
    /// Name is blank after trim.
    InvalidName,
    /// Target todo does not exist.
    TodoNotFound(TodoId),
    /// Relation target does not exist in its module.
    RelatedEntityNotFound { module: ModuleId, entity_id: String },
    /// Relation target is already taken by another active todo.
    EntityAlreadyRelated { module: ModuleId, entity_id: String },
    /// Registry-level failure.
    Relatable(RelatableError),
    /// Repository-level failure.
    Repo(TodoRepoError),
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "todo name must not be blank"),
            Self::TodoNotFound(id) => write!(f, "todo not found: {id}"),
            Self::RelatedEntityNotFound { module, entity_id } => write!(
                f,
                "related entity not found: {entity_id} in module {}",
                module.as_str()
            ),
            Self::EntityAlreadyRelated { module, entity_id } => write!(
                f,
                "entity already related to another todo: {entity_id} in module {}",
                module.as_str()
            ),
            Self::Relatable(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Relatable(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TodoRepoError> for TodoServiceError {
    fn from(value: TodoRepoError) -> Self {
        match value {
            TodoRepoError::TodoNotFound(id) => Self::TodoNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<RelatableError> for TodoServiceError {
    fn from(value: RelatableError) -> Self {
        Self::Relatable(value)
    }
}

/// Todo service facade.
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    /// Creates service from repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one todo.
    pub fn create_todo(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Todo, TodoServiceError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TodoServiceError::InvalidName);
        }

        let todo = Todo::new(name.trim(), description);
        let id = self.repo.create_todo(&todo)?;
        self.repo
            .find_one_by_id(id)?
            .ok_or(TodoServiceError::TodoNotFound(id))
    }

    /// Updates one todo with full replacement semantics.
    pub fn update_todo(&self, todo: &Todo) -> Result<(), TodoServiceError> {
        self.repo.update_todo(todo).map_err(Into::into)
    }

    /// Gets one active todo by stable ID.
    pub fn find_one_by_id(&self, id: TodoId) -> Result<Option<Todo>, TodoServiceError> {
        self.repo.find_one_by_id(id).map_err(Into::into)
    }

    /// Lists todos by tombstone state.
    pub fn get_all(&self, deleted: bool) -> Result<Vec<Todo>, TodoServiceError> {
        self.repo.get_all(deleted).map_err(Into::into)
    }

    /// Lists active todos related to one module.
    pub fn get_for_module(&self, module: ModuleId) -> Result<Vec<Todo>, TodoServiceError> {
        self.repo.get_for_module(module).map_err(Into::into)
    }

    /// Lists todos grouped by their related module.
    ///
    /// Todos without a relation group under `None`.
    pub fn get_all_grouped_by_module(
        &self,
        deleted: bool,
    ) -> Result<BTreeMap<Option<ModuleId>, Vec<Todo>>, TodoServiceError> {
        let mut grouped: BTreeMap<Option<ModuleId>, Vec<Todo>> = BTreeMap::new();
        for todo in self.repo.get_all(deleted)? {
            grouped.entry(todo.module).or_default().push(todo);
        }
        Ok(grouped)
    }

    /// Soft-deletes one todo.
    pub fn soft_delete_todo(&self, id: TodoId) -> Result<(), TodoServiceError> {
        self.repo.soft_delete_todo(id).map_err(Into::into)
    }

    /// Appends one checklist element to a todo.
    pub fn add_element(
        &self,
        todo_id: TodoId,
        name: impl Into<String>,
    ) -> Result<TodoElement, TodoServiceError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TodoServiceError::InvalidName);
        }
        self.repo
            .add_element(todo_id, name.trim())
            .map_err(Into::into)
    }

    /// Sets the done flag on one checklist element.
    pub fn set_element_done(
        &self,
        element_id: TodoElementId,
        is_done: bool,
    ) -> Result<(), TodoServiceError> {
        self.repo
            .set_element_done(element_id, is_done)
            .map_err(Into::into)
    }

    /// Lists checklist elements of one todo.
    pub fn elements_for_todo(&self, todo_id: TodoId) -> Result<Vec<TodoElement>, TodoServiceError> {
        self.repo.elements_for_todo(todo_id).map_err(Into::into)
    }

    /// Returns whether every checklist element of the todo is done.
    ///
    /// Vacuously true for todos without elements.
    pub fn are_all_elements_done(&self, todo_id: TodoId) -> Result<bool, TodoServiceError> {
        self.repo.are_all_elements_done(todo_id).map_err(Into::into)
    }

    /// Relates one todo to an entity of a registered module.
    ///
    /// The candidate is validated through the registry provider, and the
    /// entity must not already carry another active todo relation.
    pub fn relate_todo(
        &self,
        todo_id: TodoId,
        module: ModuleId,
        entity_id: &str,
        registry: &RelatableRegistry<'_>,
    ) -> Result<(), TodoServiceError> {
        let mut todo = self
            .repo
            .find_one_by_id(todo_id)?
            .ok_or(TodoServiceError::TodoNotFound(todo_id))?;

        let provider = registry.get(module)?;
        if !provider.entity_exists(entity_id)? {
            warn!(
                "event=todo_relate module={} status=rejected todo={todo_id} entity_id={entity_id} reason=entity_not_found",
                module.as_str()
            );
            return Err(TodoServiceError::RelatedEntityNotFound {
                module,
                entity_id: entity_id.to_string(),
            });
        }

        if let Some(existing) = self.repo.find_by_module_and_entity(module, entity_id)? {
            if existing.uuid != todo_id {
                warn!(
                    "event=todo_relate module={} status=rejected todo={todo_id} entity_id={entity_id} reason=already_related",
                    module.as_str()
                );
                return Err(TodoServiceError::EntityAlreadyRelated {
                    module,
                    entity_id: entity_id.to_string(),
                });
            }
        }

        todo.module = Some(module);
        todo.related_entity_id = Some(entity_id.to_string());
        self.repo.update_todo(&todo)?;

        info!(
            "event=todo_relate module={} status=ok todo={todo_id} entity_id={entity_id}",
            module.as_str()
        );
        Ok(())
    }

    /// Lists relation candidates for every registered module.
    pub fn relatable_entities_by_module(
        &self,
        registry: &RelatableRegistry<'_>,
    ) -> Result<BTreeMap<ModuleId, Vec<EntityData>>, TodoServiceError> {
        registry.relatable_entities_by_module().map_err(Into::into)
    }
}
