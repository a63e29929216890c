//! Per-section role merge
//!
//! Overrides of built-in roles and edits of custom roles are both expressed
//! as a [`RoleUpdate`] applied to a base role. Sections named in the update
//! replace the base's list for that section; everything else is kept.

use shared::models::{Role, RoleUpdate, SectionPermissions, dedup_permissions};

/// `{ ...base, ...overrides }` at the section level, with set semantics
/// enforced on the result
pub fn merge_permissions(
    base: &SectionPermissions,
    overrides: &SectionPermissions,
) -> SectionPermissions {
    let mut merged = base.clone();
    for (section, list) in overrides {
        let mut list = list.clone();
        dedup_permissions(&mut list);
        merged.insert(*section, list);
    }
    merged
}

/// Apply `update` on top of `base`, keeping the base's id
pub fn merge_role(base: &Role, update: &RoleUpdate) -> Role {
    let permissions = match &update.permissions {
        Some(overrides) => merge_permissions(&base.permissions, overrides),
        None => base.permissions.clone(),
    };

    Role {
        id: base.id.clone(),
        name: update.name.clone().unwrap_or_else(|| base.name.clone()),
        description: update
            .description
            .clone()
            .unwrap_or_else(|| base.description.clone()),
        permissions,
    }
}
