//! Note use-case service.
//!
//! # Responsibility
//! - Provide note-specific create/update/get/list APIs.
//! - Derive the plain-text preview projection from markdown bodies.
//!
//! # Invariants
//! - `update_note` uses full content replacement semantics.
//! - `preview_text` is recomputed on every write; callers never set it.
//! - Writes require the target category to exist and be active.

use crate::model::category::CategoryId;
use crate::model::note::{Note, NoteId};
use crate::repo::category_repo::{CategoryRepoError, CategoryRepository};
use crate::repo::note_repo::{NoteRepoError, NoteRepoResult, NoteRepository};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\(([^)]+)\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\*_`#>~\-\[\]\(\)!]+"#).expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

const PREVIEW_MAX_CHARS: usize = 100;

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Title is blank after trim.
    InvalidTitle,
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Target category does not exist or is soft-deleted.
    CategoryNotFound(CategoryId),
    /// Persistence-layer failure.
    Repo(NoteRepoError),
    /// Category lookup failure.
    CategoryRepo(CategoryRepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle => write!(f, "note title must not be blank"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::CategoryRepo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::CategoryRepo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteRepoError> for NoteServiceError {
    fn from(value: NoteRepoError) -> Self {
        match value {
            NoteRepoError::NotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<CategoryRepoError> for NoteServiceError {
    fn from(value: CategoryRepoError) -> Self {
        match value {
            CategoryRepoError::CategoryNotFound(id) => Self::CategoryNotFound(id),
            other => Self::CategoryRepo(other),
        }
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<C: CategoryRepository, R: NoteRepository> {
    categories: C,
    repo: R,
}

impl<C: CategoryRepository, R: NoteRepository> NoteService<C, R> {
    /// Creates a service using the provided repository implementations.
    pub fn new(categories: C, repo: R) -> Self {
        Self { categories, repo }
    }

    /// Creates one note under a category from title and markdown body.
    ///
    /// The category must exist and be active.
    pub fn create_note(
        &self,
        category_uuid: CategoryId,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Note, NoteServiceError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(NoteServiceError::InvalidTitle);
        }
        self.ensure_category_active(category_uuid)?;
        let body = body.into();

        let note = Note {
            uuid: Uuid::new_v4(),
            category_uuid,
            title: title.trim().to_string(),
            preview_text: derive_preview_text(body.as_str()),
            body,
            is_deleted: false,
            created_at: 0,
            updated_at: 0,
        };

        let id = self.repo.create_note(&note)?;
        self.repo
            .get_note(id, false)?
            .ok_or(NoteServiceError::InconsistentState(
                "created note not found in read-back",
            ))
    }

    /// Replaces note title and body fully and recomputes the preview.
    pub fn update_note(
        &self,
        id: NoteId,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Note, NoteServiceError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(NoteServiceError::InvalidTitle);
        }
        let body = body.into();

        let mut note = self
            .repo
            .get_note(id, false)?
            .ok_or(NoteServiceError::NoteNotFound(id))?;
        self.ensure_category_active(note.category_uuid)?;
        note.title = title.trim().to_string();
        note.preview_text = derive_preview_text(body.as_str());
        note.body = body;
        self.repo.update_note(&note)?;

        self.repo
            .get_note(id, false)?
            .ok_or(NoteServiceError::InconsistentState(
                "updated note not found in read-back",
            ))
    }

    /// Gets one note by stable ID.
    pub fn get_note(&self, id: NoteId) -> NoteRepoResult<Option<Note>> {
        self.repo.get_note(id, false)
    }

    /// Lists active notes attached to any category in the set.
    pub fn notes_for_categories(&self, category_uuids: &[CategoryId]) -> NoteRepoResult<Vec<Note>> {
        self.repo.notes_for_categories(category_uuids)
    }

    /// Soft-deletes one note.
    pub fn soft_delete_note(&self, id: NoteId) -> Result<(), NoteServiceError> {
        self.repo.soft_delete_note(id).map_err(Into::into)
    }

    fn ensure_category_active(&self, category_uuid: CategoryId) -> Result<(), NoteServiceError> {
        self.categories
            .get_category(category_uuid, false)?
            .ok_or(NoteServiceError::CategoryNotFound(category_uuid))?;
        Ok(())
    }
}

/// Derives the sanitized preview text from a markdown body.
///
/// Rules: markdown images dropped, link labels kept, markdown symbols
/// removed, whitespace normalized, first 100 chars retained.
pub fn derive_preview_text(body: &str) -> Option<String> {
    let without_images = MARKDOWN_IMAGE_RE.replace_all(body, " ");
    let without_links = MARKDOWN_LINK_RE.replace_all(&without_images, "$1");
    let without_symbols = MARKDOWN_SYMBOL_RE.replace_all(&without_links, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_symbols, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(PREVIEW_MAX_CHARS).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::derive_preview_text;

    #[test]
    fn preview_keeps_link_labels_and_drops_images() {
        let text = derive_preview_text("see [docs](https://example.com) ![pic](a.png)")
            .expect("preview_text should exist");
        assert!(text.contains("docs"));
        assert!(!text.contains("a.png"));
    }

    #[test]
    fn preview_strips_markdown_symbols_and_limits_length() {
        let source = "# heading\n\n- **bold** `code` item";
        let text = derive_preview_text(source).expect("preview_text should exist");
        assert!(!text.contains('#'));
        assert!(!text.contains('*'));
        assert!(text.chars().count() <= 100);
    }

    #[test]
    fn preview_is_none_for_symbol_only_body() {
        assert_eq!(derive_preview_text("### --- ***"), None);
    }
}
