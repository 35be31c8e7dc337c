//! Per-request authorization context.
//!
//! # Responsibility
//! - Hold the role set granted to the requesting actor.
//! - Provide grant/revoke/has-role operations with set semantics.
//!
//! # Invariants
//! - Granting an already-held role is a no-op (no duplication).
//! - Revoking an absent role is a no-op.
//! - The context is owned by the caller and scoped to one request.

use std::collections::BTreeSet;

/// Role unlocking resources protected by lock markers.
pub const ROLE_SEE_LOCKED_RESOURCES: &str =
    "ROLE_PERMISSION_TO_SEE_RESOURCES_WITH_RESTRICTED_ACCESS";

/// Explicit authorization context passed into permission-aware calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    roles: BTreeSet<String>,
}

impl AuthContext {
    /// Creates an empty context without any granted role.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context with the given roles pre-granted.
    pub fn with_roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut context = Self::new();
        context.grant_roles(roles);
        context
    }

    /// Grants roles to the actor. Already-held roles are skipped.
    pub fn grant_roles<I, S>(&mut self, roles: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for role in roles {
            self.roles.insert(role.into());
        }
    }

    /// Revokes roles from the actor. Absent roles are skipped.
    pub fn revoke_roles<'a, I>(&mut self, roles: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for role in roles {
            self.roles.remove(role);
        }
    }

    /// Returns whether the actor holds one role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Returns whether the actor may see lock-protected resources.
    pub fn can_see_locked_resources(&self) -> bool {
        self.has_role(ROLE_SEE_LOCKED_RESOURCES)
    }

    /// Returns all granted roles in sorted order.
    pub fn roles(&self) -> Vec<&str> {
        self.roles.iter().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthContext, ROLE_SEE_LOCKED_RESOURCES};

    #[test]
    fn grant_is_idempotent() {
        let mut context = AuthContext::new();
        context.grant_roles(["ROLE_USER", "ROLE_USER"]);
        context.grant_roles(["ROLE_USER"]);
        assert_eq!(context.roles(), vec!["ROLE_USER"]);
    }

    #[test]
    fn revoke_absent_role_is_noop() {
        let mut context = AuthContext::with_roles(["ROLE_USER"]);
        context.revoke_roles(["ROLE_ADMIN"]);
        assert!(context.has_role("ROLE_USER"));
    }

    #[test]
    fn revoke_removes_granted_role() {
        let mut context = AuthContext::with_roles(["ROLE_USER", ROLE_SEE_LOCKED_RESOURCES]);
        assert!(context.can_see_locked_resources());

        context.revoke_roles([ROLE_SEE_LOCKED_RESOURCES]);
        assert!(!context.can_see_locked_resources());
        assert!(context.has_role("ROLE_USER"));
    }

    #[test]
    fn empty_context_sees_nothing_locked() {
        assert!(!AuthContext::new().can_see_locked_resources());
    }
}
