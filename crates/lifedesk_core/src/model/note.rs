//! Note domain model.
//!
//! # Responsibility
//! - Define the leaf note record attached to exactly one category.
//! - Provide lifecycle helpers for soft-delete semantics.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another note.
//! - Every note belongs to exactly one category.
//! - `preview_text` is a derived projection and never user-authored.

use crate::model::category::CategoryId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for notes.
pub type NoteId = Uuid;

/// Leaf note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Stable global ID used for linking and lock markers.
    pub uuid: NoteId,
    /// Owning category.
    pub category_uuid: CategoryId,
    /// User-facing title.
    pub title: String,
    /// Markdown body.
    pub body: String,
    /// Sanitized summary text derived from `body`.
    pub preview_text: Option<String>,
    /// Soft delete tombstone.
    pub is_deleted: bool,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

impl Note {
    /// Returns whether this note should be considered active.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// Validates note fields before persistence.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.title.trim().is_empty() {
            return Err(NoteValidationError::BlankTitle);
        }
        Ok(())
    }
}

/// Note validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Title is blank after trim.
    BlankTitle,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "note title must not be blank"),
        }
    }
}

impl Error for NoteValidationError {}
