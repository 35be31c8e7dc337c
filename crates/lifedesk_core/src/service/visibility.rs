//! Permission-aware category-family visibility check.
//!
//! # Responsibility
//! - Decide whether a category or any transitive descendant exposes at
//!   least one note the requesting actor may see.
//! - Filter categories and notes through the permission guard before any
//!   note/children lookup.
//!
//! # Invariants
//! - Filtering builds new collections; working sets are never mutated
//!   while being iterated.
//! - A locked category removes its whole subtree from consideration:
//!   children are only reachable through ids that survive filtering.
//! - The walk terminates on the tree's finite depth; no level is visited
//!   twice.
//! - Repository errors propagate unchanged; no retry, no partial result.

use crate::auth::guard::ResourceGuard;
use crate::model::category::CategoryId;
use crate::model::locked_resource::ResourceKind;
use crate::model::note::Note;
use crate::modules::ModuleId;
use crate::repo::category_repo::{CategoryRepoError, CategoryRepository};
use crate::repo::lock_repo::LockRepoError;
use crate::repo::note_repo::{NoteRepoError, NoteRepository};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from visibility computations.
#[derive(Debug)]
pub enum VisibilityError {
    /// Category lookup failure.
    Category(CategoryRepoError),
    /// Note lookup failure.
    Note(NoteRepoError),
    /// Permission check failure.
    Lock(LockRepoError),
}

impl Display for VisibilityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Category(err) => write!(f, "{err}"),
            Self::Note(err) => write!(f, "{err}"),
            Self::Lock(err) => write!(f, "{err}"),
        }
    }
}

impl Error for VisibilityError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Category(err) => Some(err),
            Self::Note(err) => Some(err),
            Self::Lock(err) => Some(err),
        }
    }
}

impl From<CategoryRepoError> for VisibilityError {
    fn from(value: CategoryRepoError) -> Self {
        Self::Category(value)
    }
}

impl From<NoteRepoError> for VisibilityError {
    fn from(value: NoteRepoError) -> Self {
        Self::Note(value)
    }
}

impl From<LockRepoError> for VisibilityError {
    fn from(value: LockRepoError) -> Self {
        Self::Lock(value)
    }
}

/// Visibility service over category/note repositories and a permission
/// guard.
pub struct VisibilityService<'g, C: CategoryRepository, N: NoteRepository> {
    categories: C,
    notes: N,
    guard: &'g dyn ResourceGuard,
}

impl<'g, C: CategoryRepository, N: NoteRepository> VisibilityService<'g, C, N> {
    /// Creates a service from repository implementations and a guard.
    pub fn new(categories: C, notes: N, guard: &'g dyn ResourceGuard) -> Self {
        Self {
            categories,
            notes,
            guard,
        }
    }

    /// Returns whether the category family rooted at `start` exposes at
    /// least one note the actor may see.
    ///
    /// Walks the tree level by level:
    /// 1. keep only category ids the guard permits;
    /// 2. if any kept category has notes, fetch and filter them; any
    ///    survivor answers `true`;
    /// 3. otherwise descend into the immediate children of the kept set;
    ///    an empty next level answers `false`.
    pub fn has_category_family_visible_notes(
        &self,
        start: CategoryId,
    ) -> Result<bool, VisibilityError> {
        let mut working_set = vec![start];
        let mut depth = 0_u32;

        loop {
            let allowed = self.filter_allowed_categories(&working_set)?;
            if allowed.is_empty() {
                debug!(
                    "event=visibility_walk module=notes status=ok start={start} depth={depth} result=filtered_empty"
                );
                return Ok(false);
            }

            if self.categories.any_has_notes(&allowed)? {
                let visible = self.filter_allowed_notes(self.notes.notes_for_categories(&allowed)?)?;
                if !visible.is_empty() {
                    debug!(
                        "event=visibility_walk module=notes status=ok start={start} depth={depth} result=visible_note"
                    );
                    return Ok(true);
                }
            }

            let children = self.categories.children_ids(&allowed)?;
            if children.is_empty() {
                debug!(
                    "event=visibility_walk module=notes status=ok start={start} depth={depth} result=no_children"
                );
                return Ok(false);
            }

            working_set = children;
            depth += 1;
        }
    }

    /// Returns the notes in the given categories the actor may see.
    ///
    /// This is the filtered note fetch of the visibility walk, exposed for
    /// list views.
    pub fn visible_notes_for_categories(
        &self,
        category_uuids: &[CategoryId],
    ) -> Result<Vec<Note>, VisibilityError> {
        let allowed = self.filter_allowed_categories(category_uuids)?;
        self.filter_allowed_notes(self.notes.notes_for_categories(&allowed)?)
    }

    fn filter_allowed_categories(
        &self,
        category_uuids: &[CategoryId],
    ) -> Result<Vec<CategoryId>, VisibilityError> {
        let mut allowed = Vec::with_capacity(category_uuids.len());
        for uuid in category_uuids {
            if self.guard.is_allowed_to_see(
                &uuid.to_string(),
                ResourceKind::Entity,
                ModuleId::NotesCategory,
            )? {
                allowed.push(*uuid);
            }
        }
        Ok(allowed)
    }

    fn filter_allowed_notes(&self, notes: Vec<Note>) -> Result<Vec<Note>, VisibilityError> {
        let mut visible = Vec::with_capacity(notes.len());
        for note in notes {
            if self.guard.is_allowed_to_see(
                &note.uuid.to_string(),
                ResourceKind::Entity,
                ModuleId::Notes,
            )? {
                visible.push(note);
            }
        }
        Ok(visible)
    }
}
