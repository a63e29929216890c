//! User → role assignment
//!
//! Stand-in for the identity service: a fixed lookup from numeric user id
//! to role id. Anything unmapped, and the signed-out state, resolve to the
//! fallback role.

use super::permissions::{FALLBACK_ROLE_ID, FLOOR_MANAGER, KITCHEN_MANAGER, MANAGER, OWNER};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignments {
    by_user: BTreeMap<u64, String>,
}

impl RoleAssignments {
    /// Built-in demo assignments: users 1-4 hold the managerial roles
    pub fn builtin() -> Self {
        Self::from_iter([
            (1, OWNER),
            (2, MANAGER),
            (3, KITCHEN_MANAGER),
            (4, FLOOR_MANAGER),
        ])
    }

    /// Parse `"1=owner,2=manager"`
    ///
    /// Malformed pairs are skipped with a warning.
    pub fn parse(raw: &str) -> Self {
        let mut by_user = BTreeMap::new();
        for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let parsed = pair
                .split_once('=')
                .and_then(|(user, role)| Some((user.trim().parse::<u64>().ok()?, role.trim())))
                .filter(|(_, role)| !role.is_empty());

            match parsed {
                Some((user_id, role_id)) => {
                    by_user.insert(user_id, role_id.to_string());
                }
                None => tracing::warn!(pair = %pair, "Skipping malformed role assignment"),
            }
        }
        Self { by_user }
    }

    /// Role id for `user_id`, or the fallback role
    pub fn resolve(&self, user_id: Option<u64>) -> &str {
        user_id
            .and_then(|id| self.by_user.get(&id))
            .map(String::as_str)
            .unwrap_or(FALLBACK_ROLE_ID)
    }

    pub fn assign(&mut self, user_id: u64, role_id: impl Into<String>) {
        self.by_user.insert(user_id, role_id.into());
    }

    pub fn len(&self) -> usize {
        self.by_user.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_user.is_empty()
    }
}

impl Default for RoleAssignments {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<S: Into<String>> FromIterator<(u64, S)> for RoleAssignments {
    fn from_iter<I: IntoIterator<Item = (u64, S)>>(iter: I) -> Self {
        Self {
            by_user: iter
                .into_iter()
                .map(|(user, role)| (user, role.into()))
                .collect(),
        }
    }
}
