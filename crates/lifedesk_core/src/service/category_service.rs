//! Category use-case service.
//!
//! # Responsibility
//! - Validate hierarchy invariants above the repository layer.
//! - Provide create, rename, list, and soft-delete operations.
//!
//! # Invariants
//! - Parent category must exist and be active when provided.
//! - Display names are trimmed before persistence.

use crate::model::category::{Category, CategoryId};
use crate::repo::category_repo::{CategoryRepoError, CategoryRepository};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from category service operations.
#[derive(Debug)]
pub enum CategoryServiceError {
    /// Name is blank after trim.
    InvalidName,
    /// Target category does not exist.
    CategoryNotFound(CategoryId),
    /// Parent category does not exist.
    ParentNotFound(CategoryId),
    /// Repository-level failure.
    Repo(CategoryRepoError),
}

impl Display for CategoryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "category name must not be blank"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::ParentNotFound(id) => write!(f, "parent category not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CategoryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CategoryRepoError> for CategoryServiceError {
    fn from(value: CategoryRepoError) -> Self {
        match value {
            CategoryRepoError::CategoryNotFound(id) => Self::CategoryNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Category service facade.
pub struct CategoryService<R: CategoryRepository> {
    repo: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    /// Creates service from repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one category under an optional parent.
    pub fn create_category(
        &self,
        parent_uuid: Option<CategoryId>,
        name: impl Into<String>,
        icon: Option<String>,
    ) -> Result<Category, CategoryServiceError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CategoryServiceError::InvalidName);
        }
        if let Some(parent_uuid) = parent_uuid {
            self.repo
                .get_category(parent_uuid, false)?
                .ok_or(CategoryServiceError::ParentNotFound(parent_uuid))?;
        }
        self.repo
            .create_category(parent_uuid, name.trim(), icon.as_deref())
            .map_err(Into::into)
    }

    /// Gets one category by stable ID.
    pub fn get_category(
        &self,
        uuid: CategoryId,
    ) -> Result<Option<Category>, CategoryServiceError> {
        self.repo.get_category(uuid, false).map_err(Into::into)
    }

    /// Lists active children under an optional parent.
    pub fn list_children(
        &self,
        parent_uuid: Option<CategoryId>,
    ) -> Result<Vec<Category>, CategoryServiceError> {
        if let Some(parent_uuid) = parent_uuid {
            self.repo
                .get_category(parent_uuid, false)?
                .ok_or(CategoryServiceError::ParentNotFound(parent_uuid))?;
        }
        self.repo.list_children(parent_uuid).map_err(Into::into)
    }

    /// Renames one category.
    pub fn rename_category(
        &self,
        uuid: CategoryId,
        name: impl Into<String>,
    ) -> Result<(), CategoryServiceError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CategoryServiceError::InvalidName);
        }
        self.repo
            .rename_category(uuid, name.trim())
            .map_err(Into::into)
    }

    /// Soft-deletes one category.
    pub fn soft_delete_category(&self, uuid: CategoryId) -> Result<(), CategoryServiceError> {
        self.repo.soft_delete_category(uuid).map_err(Into::into)
    }
}
