//! Note category domain model.
//!
//! # Responsibility
//! - Define the hierarchical category node grouping notes.
//! - Provide lifecycle helpers for soft-delete semantics.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another category.
//! - A category owns its parent link; children are looked up, not owned.
//! - A category must never be its own parent.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for category nodes.
pub type CategoryId = Uuid;

/// Hierarchical category node.
///
/// The node carries only the upward link. Child lookup is a repository
/// concern so one storage shape supports arbitrary tree depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable global ID used for linking and lock markers.
    pub uuid: CategoryId,
    /// Upward link. `None` means root-level category.
    pub parent_uuid: Option<CategoryId>,
    /// User-facing display name.
    pub name: String,
    /// Optional icon identifier for UI rendering.
    pub icon: Option<String>,
    /// Soft delete tombstone.
    pub is_deleted: bool,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

impl Category {
    /// Returns whether this category should be considered active.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

/// Category validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    /// Name is blank after trim.
    BlankName,
    /// Category points at itself as parent.
    SelfParent(CategoryId),
}

impl Display for CategoryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "category name must not be blank"),
            Self::SelfParent(id) => write!(f, "category must not be its own parent: {id}"),
        }
    }
}

impl Error for CategoryValidationError {}

/// Validates category input fields before persistence.
pub fn validate_category_input(
    uuid: CategoryId,
    parent_uuid: Option<CategoryId>,
    name: &str,
) -> Result<(), CategoryValidationError> {
    if name.trim().is_empty() {
        return Err(CategoryValidationError::BlankName);
    }
    if parent_uuid == Some(uuid) {
        return Err(CategoryValidationError::SelfParent(uuid));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_category_input, CategoryValidationError};
    use uuid::Uuid;

    #[test]
    fn rejects_blank_name() {
        let err = validate_category_input(Uuid::new_v4(), None, "   ")
            .expect_err("blank name must fail");
        assert_eq!(err, CategoryValidationError::BlankName);
    }

    #[test]
    fn rejects_self_parent() {
        let id = Uuid::new_v4();
        let err =
            validate_category_input(id, Some(id), "Home").expect_err("self parent must fail");
        assert_eq!(err, CategoryValidationError::SelfParent(id));
    }

    #[test]
    fn accepts_valid_input() {
        validate_category_input(Uuid::new_v4(), Some(Uuid::new_v4()), "Home")
            .expect("valid input must pass");
    }
}
