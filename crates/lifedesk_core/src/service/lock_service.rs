//! Lock toggle use-case service.
//!
//! # Responsibility
//! - Toggle lock markers: insert when absent, remove when present.
//! - Validate the resource id before touching the registry.
//!
//! # Invariants
//! - Toggling is the only mutation path into the lock registry.
//! - A toggle returns the resulting lock state so callers need no
//!   follow-up query.

use crate::model::locked_resource::{LockedResource, ResourceKind};
use crate::modules::ModuleId;
use crate::repo::lock_repo::{LockRepoError, LockRepository};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from lock service operations.
#[derive(Debug)]
pub enum LockServiceError {
    /// Resource id is blank after trim.
    InvalidResourceId,
    /// Registry-level failure.
    Repo(LockRepoError),
}

impl Display for LockServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidResourceId => write!(f, "resource id must not be blank"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LockServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::InvalidResourceId => None,
        }
    }
}

impl From<LockRepoError> for LockServiceError {
    fn from(value: LockRepoError) -> Self {
        Self::Repo(value)
    }
}

/// Lock state after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Locked,
    Unlocked,
}

/// Lock service facade.
pub struct LockService<R: LockRepository> {
    repo: R,
}

impl<R: LockRepository> LockService<R> {
    /// Creates service from repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Toggles the lock marker for one resource triple.
    pub fn toggle_lock(
        &self,
        resource_id: &str,
        kind: ResourceKind,
        module: ModuleId,
    ) -> Result<LockState, LockServiceError> {
        let resource_id = resource_id.trim();
        if resource_id.is_empty() {
            return Err(LockServiceError::InvalidResourceId);
        }

        let state = if self.repo.is_locked(resource_id, kind, module)? {
            self.repo.remove_lock(resource_id, kind, module)?;
            LockState::Unlocked
        } else {
            self.repo.insert_lock(resource_id, kind, module)?;
            LockState::Locked
        };

        info!(
            "event=lock_toggle module={} status=ok resource_id={resource_id} kind={} state={:?}",
            module.as_str(),
            kind.as_str(),
            state
        );
        Ok(state)
    }

    /// Returns whether one resource triple is locked.
    pub fn is_locked(
        &self,
        resource_id: &str,
        kind: ResourceKind,
        module: ModuleId,
    ) -> Result<bool, LockServiceError> {
        self.repo
            .is_locked(resource_id.trim(), kind, module)
            .map_err(Into::into)
    }

    /// Lists all active lock markers.
    pub fn list_locks(&self) -> Result<Vec<LockedResource>, LockServiceError> {
        self.repo.list_locks().map_err(Into::into)
    }
}
