//! Built-in role definitions
//!
//! Five roles ship with every installation. They can be overridden per
//! section through a custom entry with the same id but never deleted.
//!
//! | Role | Scope |
//! |------|-------|
//! | `owner` | everything |
//! | `manager` | day-to-day running of the restaurant |
//! | `kitchen_manager` | inventory, menu and kitchen manuals |
//! | `floor_manager` | sales floor and front-of-house staff |
//! | `staff` | read access plus taking sales |

use shared::models::{Permission, Role, Section, SectionPermissions};
use std::collections::BTreeMap;

use Permission::{Approve, Create, Delete, Edit, View};

pub const OWNER: &str = "owner";
pub const MANAGER: &str = "manager";
pub const KITCHEN_MANAGER: &str = "kitchen_manager";
pub const FLOOR_MANAGER: &str = "floor_manager";
pub const STAFF: &str = "staff";

/// Role ids that can never be deleted
pub const PROTECTED_ROLE_IDS: [&str; 5] = [OWNER, MANAGER, KITCHEN_MANAGER, FLOOR_MANAGER, STAFF];

/// Role used when the current role is unknown or no one is signed in
pub const FALLBACK_ROLE_ID: &str = STAFF;

type Grants = &'static [(Section, &'static [Permission])];

const ALL_PERMISSIONS: &[Permission] = &Permission::ALL;

const OWNER_GRANTS: Grants = &[
    (Section::Settings, ALL_PERMISSIONS),
    (Section::Staff, ALL_PERMISSIONS),
    (Section::Inventory, ALL_PERMISSIONS),
    (Section::Sales, ALL_PERMISSIONS),
    (Section::Menu, ALL_PERMISSIONS),
    (Section::Finance, ALL_PERMISSIONS),
    (Section::Reports, ALL_PERMISSIONS),
    (Section::Marketing, ALL_PERMISSIONS),
    (Section::Manuals, ALL_PERMISSIONS),
];

const MANAGER_GRANTS: Grants = &[
    (Section::Settings, &[View, Edit]),
    (Section::Staff, &[View, Edit, Create, Approve]),
    (Section::Inventory, &[View, Edit, Create, Delete, Approve]),
    (Section::Sales, &[View, Edit, Create, Approve]),
    (Section::Menu, &[View, Edit, Create, Delete]),
    (Section::Finance, &[View, Approve]),
    (Section::Reports, &[View]),
    (Section::Marketing, &[View, Edit, Create]),
    (Section::Manuals, &[View, Edit, Create]),
];

const KITCHEN_MANAGER_GRANTS: Grants = &[
    (Section::Staff, &[View]),
    (Section::Inventory, &[View, Edit, Create, Approve]),
    (Section::Menu, &[View, Edit, Create]),
    (Section::Reports, &[View]),
    (Section::Manuals, &[View, Edit, Create]),
];

const FLOOR_MANAGER_GRANTS: Grants = &[
    (Section::Staff, &[View, Edit]),
    (Section::Sales, &[View, Edit, Create, Approve]),
    (Section::Menu, &[View]),
    (Section::Reports, &[View]),
    (Section::Marketing, &[View]),
    (Section::Manuals, &[View]),
];

const STAFF_GRANTS: Grants = &[
    (Section::Inventory, &[View]),
    (Section::Sales, &[View, Create]),
    (Section::Menu, &[View]),
    (Section::Manuals, &[View]),
];

fn build(id: &str, name: &str, description: &str, grants: Grants) -> Role {
    let permissions: SectionPermissions = grants
        .iter()
        .map(|(section, perms)| (*section, perms.to_vec()))
        .collect();

    Role {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        permissions,
    }
}

/// The built-in role table, keyed by role id
pub fn default_roles() -> BTreeMap<String, Role> {
    [
        build(
            OWNER,
            "Owner",
            "Full access to every part of the back-office",
            OWNER_GRANTS,
        ),
        build(
            MANAGER,
            "Manager",
            "Runs daily operations across kitchen, floor and office",
            MANAGER_GRANTS,
        ),
        build(
            KITCHEN_MANAGER,
            "Kitchen Manager",
            "Manages inventory, recipes and kitchen manuals",
            KITCHEN_MANAGER_GRANTS,
        ),
        build(
            FLOOR_MANAGER,
            "Floor Manager",
            "Manages the sales floor and front-of-house staff",
            FLOOR_MANAGER_GRANTS,
        ),
        build(
            STAFF,
            "Staff",
            "Takes sales and reads menus and manuals",
            STAFF_GRANTS,
        ),
    ]
    .into_iter()
    .map(|role| (role.id.clone(), role))
    .collect()
}

/// Whether `id` is one of the built-in roles
pub fn is_protected_role(id: &str) -> bool {
    PROTECTED_ROLE_IDS.contains(&id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_has_protected_ids() {
        let roles = default_roles();
        assert_eq!(roles.len(), PROTECTED_ROLE_IDS.len());
        for id in PROTECTED_ROLE_IDS {
            let role = &roles[id];
            assert_eq!(role.id, id);
            assert!(is_protected_role(id));
        }
        assert!(!is_protected_role("host"));
    }

    #[test]
    fn test_owner_has_every_grant() {
        let roles = default_roles();
        let owner = &roles[OWNER];
        for section in Section::ALL {
            for permission in Permission::ALL {
                assert!(owner.grants(section, permission));
            }
        }
    }

    #[test]
    fn test_admin_is_not_implied() {
        let roles = default_roles();
        let manager = &roles[MANAGER];
        assert!(manager.grants(Section::Settings, Edit));
        assert!(!manager.grants(Section::Settings, Permission::Admin));
    }

    #[test]
    fn test_staff_grants() {
        let roles = default_roles();
        let staff = &roles[STAFF];
        assert_eq!(staff.permissions_for(Section::Sales), &[View, Create]);
        assert!(staff.permissions_for(Section::Finance).is_empty());
        assert!(!staff.grants(Section::Settings, View));
    }

    #[test]
    fn test_default_grants_have_no_duplicates() {
        for role in default_roles().values() {
            for list in role.permissions.values() {
                let mut deduped = list.clone();
                shared::models::dedup_permissions(&mut deduped);
                assert_eq!(&deduped, list, "{}", role.id);
            }
        }
    }
}
