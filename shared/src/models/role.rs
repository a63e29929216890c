//! Role Model

use super::permission::{Permission, Section};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Grants per section. A missing key means no grants for that section.
pub type SectionPermissions = BTreeMap<Section, Vec<Permission>>;

/// Role entity (RBAC)
///
/// The persisted blob keys roles by id, so `id` is not part of the
/// serialized form and is filled in by the store when loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub permissions: SectionPermissions,
}

impl Role {
    /// Whether this role grants `permission` within `section`
    pub fn grants(&self, section: Section, permission: Permission) -> bool {
        self.permissions
            .get(&section)
            .is_some_and(|list| list.contains(&permission))
    }

    /// Grants for one section (empty when the section is absent)
    pub fn permissions_for(&self, section: Section) -> &[Permission] {
        self.permissions
            .get(&section)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of (section, permission) grants
    pub fn grant_count(&self) -> usize {
        self.permissions.values().map(Vec::len).sum()
    }
}

/// Create role payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// `None` creates a role with no grants
    #[serde(default)]
    pub permissions: Option<SectionPermissions>,
}

/// Update role payload
///
/// `permissions` is merged per section: every section listed here replaces
/// the base role's list for that section, unlisted sections are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<SectionPermissions>,
}

impl RoleUpdate {
    /// Update only the given sections' grants
    pub fn permissions(permissions: SectionPermissions) -> Self {
        Self {
            permissions: Some(permissions),
            ..Default::default()
        }
    }
}

/// Remove repeated permissions, keeping the first occurrence
pub fn dedup_permissions(list: &mut Vec<Permission>) {
    let mut seen = Vec::with_capacity(list.len());
    list.retain(|p| {
        if seen.contains(p) {
            false
        } else {
            seen.push(*p);
            true
        }
    });
}

/// Apply [`dedup_permissions`] to every section
pub fn normalize_permissions(permissions: &mut SectionPermissions) {
    permissions.values_mut().for_each(dedup_permissions);
}

/// Add `permission` to the section if absent, remove it otherwise
///
/// Returns whether the permission is granted after the toggle. Removing the
/// last permission keeps an explicit empty list so that an override can
/// revoke a default role's grants for that section.
pub fn toggle_permission(
    permissions: &mut SectionPermissions,
    section: Section,
    permission: Permission,
) -> bool {
    let list = permissions.entry(section).or_default();
    if let Some(pos) = list.iter().position(|p| *p == permission) {
        list.remove(pos);
        false
    } else {
        list.push(permission);
        true
    }
}

/// Derive a role id from a user-entered display name
///
/// Lowercases, collapses every run of non-alphanumeric characters into a
/// single `_` and trims leading/trailing underscores: `"Head Chef"` becomes
/// `head_chef`, `"Café Lead"` becomes `café_lead`. Letters of any script
/// are kept. May return an empty string.
pub fn role_id_from_name(name: &str) -> String {
    let mut id = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            id.extend(ch.to_lowercase());
        } else if !id.is_empty() && !id.ends_with('_') {
            id.push('_');
        }
    }
    while id.ends_with('_') {
        id.pop();
    }
    id
}

/// Role ids are non-empty and made of lowercase alphanumerics and `_`
pub fn is_valid_role_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c == '_' || (c.is_alphanumeric() && !c.is_uppercase()))
}
