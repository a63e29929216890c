//! Authorization
//!
//! - [`permissions`] - built-in role table and protected ids
//! - [`RoleAssignments`] - user id → role id lookup
//! - [`CurrentRole`] - the signed-in session's role and its permission checks

pub mod assignments;
pub mod permissions;

pub use assignments::RoleAssignments;
pub use permissions::{FALLBACK_ROLE_ID, PROTECTED_ROLE_IDS, default_roles, is_protected_role};

use crate::roles::RoleStore;
use shared::models::{Permission, Role, Section};

/// Role of the active session
///
/// Holds only the id; grants are looked up in the store on every check so
/// edits and deletions take effect immediately. A role id that no longer
/// exists is evaluated as the fallback role.
///
/// # Example
///
/// ```ignore
/// if office.current_role().has_permission(office.roles(), Section::Finance, Permission::View) {
///     // render the finance dashboard
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentRole {
    role_id: String,
    user_id: Option<u64>,
}

impl CurrentRole {
    pub fn new(role_id: impl Into<String>, user_id: Option<u64>) -> Self {
        Self {
            role_id: role_id.into(),
            user_id,
        }
    }

    /// Signed-out session
    pub fn anonymous() -> Self {
        Self::new(FALLBACK_ROLE_ID, None)
    }

    pub fn role_id(&self) -> &str {
        &self.role_id
    }

    pub fn user_id(&self) -> Option<u64> {
        self.user_id
    }

    /// The role the checks are evaluated against
    pub fn effective_role<'a>(&self, store: &'a RoleStore) -> Option<&'a Role> {
        store
            .role(&self.role_id)
            .or_else(|| store.role(FALLBACK_ROLE_ID))
    }

    pub fn has_permission(&self, store: &RoleStore, section: Section, permission: Permission) -> bool {
        store.has_permission(&self.role_id, section, permission)
    }

    /// Any of the given grants
    pub fn has_any_permission(&self, store: &RoleStore, grants: &[(Section, Permission)]) -> bool {
        grants
            .iter()
            .any(|(s, p)| self.has_permission(store, *s, *p))
    }

    /// All of the given grants
    pub fn has_all_permissions(&self, store: &RoleStore, grants: &[(Section, Permission)]) -> bool {
        grants
            .iter()
            .all(|(s, p)| self.has_permission(store, *s, *p))
    }
}

impl Default for CurrentRole {
    fn default() -> Self {
        Self::anonymous()
    }
}
