//! Permission registry
//!
//! The closed vocabulary every role is expressed in. A grant is always a
//! `(Section, Permission)` pair; there is no hierarchy between permissions
//! (`admin` does not imply `edit`) and no nesting between sections.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A discrete capability grantable within a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    View,
    Edit,
    Create,
    Delete,
    Approve,
    Admin,
}

impl Permission {
    /// Every permission, in display order
    pub const ALL: [Permission; 6] = [
        Permission::View,
        Permission::Edit,
        Permission::Create,
        Permission::Delete,
        Permission::Approve,
        Permission::Admin,
    ];

    /// Wire name (as stored in the persisted role blob)
    pub const fn as_str(&self) -> &'static str {
        match self {
            Permission::View => "view",
            Permission::Edit => "edit",
            Permission::Create => "create",
            Permission::Delete => "delete",
            Permission::Approve => "approve",
            Permission::Admin => "admin",
        }
    }

    /// Label for the permission matrix column header
    pub const fn label(&self) -> &'static str {
        match self {
            Permission::View => "View",
            Permission::Edit => "Edit",
            Permission::Create => "Create",
            Permission::Delete => "Delete",
            Permission::Approve => "Approve",
            Permission::Admin => "Admin",
        }
    }
}

/// A functional area of the back-office with independent access control
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Settings,
    Staff,
    Inventory,
    Sales,
    Menu,
    Finance,
    Reports,
    Marketing,
    Manuals,
}

impl Section {
    /// Every section, in display order
    pub const ALL: [Section; 9] = [
        Section::Settings,
        Section::Staff,
        Section::Inventory,
        Section::Sales,
        Section::Menu,
        Section::Finance,
        Section::Reports,
        Section::Marketing,
        Section::Manuals,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Section::Settings => "settings",
            Section::Staff => "staff",
            Section::Inventory => "inventory",
            Section::Sales => "sales",
            Section::Menu => "menu",
            Section::Finance => "finance",
            Section::Reports => "reports",
            Section::Marketing => "marketing",
            Section::Manuals => "manuals",
        }
    }

    /// Label for the permission matrix row header
    pub const fn label(&self) -> &'static str {
        match self {
            Section::Settings => "Settings",
            Section::Staff => "Staff Management",
            Section::Inventory => "Inventory",
            Section::Sales => "Sales",
            Section::Menu => "Menu & Recipes",
            Section::Finance => "Finance",
            Section::Reports => "Reports",
            Section::Marketing => "Marketing",
            Section::Manuals => "Manuals",
        }
    }
}

/// Unrecognized section or permission name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownName {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for Permission {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .ok_or(UnknownName {
                kind: "permission",
                value: s.to_string(),
            })
    }
}

impl FromStr for Section {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Section::ALL
            .into_iter()
            .find(|sec| sec.as_str() == name)
            .ok_or(UnknownName {
                kind: "section",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
