//! Role management
//!
//! - [`RoleStore`] - default + custom role tables, mutations, persistence
//! - [`merge_role`] - per-section merge used for overrides and updates
//! - [`RoleEditor`] - the single role edit session behind the role form
//! - [`RoleError`] - everything a role operation can reject

pub mod error;
pub mod merge;
pub mod session;
pub mod store;

pub use error::{RoleError, RoleResult};
pub use merge::{merge_permissions, merge_role};
pub use session::{EditBuffer, EditKind, RoleEditor, SessionOutcome};
pub use store::{CUSTOM_ROLES_KEY, RoleStore, RoleTable};
