//! Permission guard over the lock registry.
//!
//! # Responsibility
//! - Decide whether the requesting actor may see one resource.
//! - Keep the decision a capability query, never a data mutation.
//!
//! # Invariants
//! - An actor holding the unlock role sees everything.
//! - Without the role, visibility means "no active lock marker exists".

use crate::auth::context::AuthContext;
use crate::model::locked_resource::ResourceKind;
use crate::modules::ModuleId;
use crate::repo::lock_repo::{LockRepoResult, LockRepository};

/// Permission service answering per-resource visibility questions.
pub trait ResourceGuard {
    /// Returns whether the actor may see the resource.
    fn is_allowed_to_see(
        &self,
        resource_id: &str,
        kind: ResourceKind,
        module: ModuleId,
    ) -> LockRepoResult<bool>;
}

/// Production guard backed by the lock marker registry.
pub struct LockRegistryGuard<'a, R: LockRepository> {
    locks: &'a R,
    context: &'a AuthContext,
}

impl<'a, R: LockRepository> LockRegistryGuard<'a, R> {
    pub fn new(locks: &'a R, context: &'a AuthContext) -> Self {
        Self { locks, context }
    }
}

impl<R: LockRepository> ResourceGuard for LockRegistryGuard<'_, R> {
    fn is_allowed_to_see(
        &self,
        resource_id: &str,
        kind: ResourceKind,
        module: ModuleId,
    ) -> LockRepoResult<bool> {
        if self.context.can_see_locked_resources() {
            return Ok(true);
        }
        Ok(!self.locks.is_locked(resource_id, kind, module)?)
    }
}
