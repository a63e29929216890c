//! Restaurant back-office - role and permission core
//!
//! # Architecture
//!
//! - **Roles** (`roles`): default + custom role tables, mutations, edit session
//! - **Auth** (`auth`): built-in grants, user assignments, the current role
//! - **Storage** (`storage`): key-value seam with redb and in-memory backends
//! - **Core** (`core`): configuration and the [`BackOffice`] context
//!
//! # Module layout
//!
//! ```text
//! backoffice/src/
//! ├── core/      # Config, BackOffice
//! ├── auth/      # default grants, assignments, CurrentRole
//! ├── roles/     # RoleStore, merge, RoleEditor, RoleError
//! ├── storage/   # KvStore, RedbStore, MemoryStore
//! └── utils/     # logger
//! ```

pub mod auth;
pub mod core;
pub mod roles;
pub mod storage;
pub mod utils;

pub use auth::{CurrentRole, RoleAssignments};
pub use core::{BackOffice, Config, StoreBackend};
pub use roles::{RoleEditor, RoleError, RoleResult, RoleStore};
pub use storage::{KvStore, MemoryStore, RedbStore, StorageError};

pub use shared::error::{AppError, AppResult, ErrorCode};
pub use shared::models::{Permission, Role, RoleCreate, RoleUpdate, Section};

pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

// Used by the exported macros
#[doc(hidden)]
pub use chrono as __chrono;
#[doc(hidden)]
pub use tracing as __tracing;

/// Audit record for a role mutation
///
/// Emitted at `info` with target `"audit"`, so it lands in `logs/audit/`
/// when file logging is enabled.
///
/// ```ignore
/// audit_log!("role_deleted", id);
/// audit_log!("role_updated", id, overriding = true);
/// ```
#[macro_export]
macro_rules! audit_log {
    ($action:expr, $role_id:expr) => {
        $crate::__tracing::info!(
            target: "audit",
            action = $action,
            role_id = %$role_id,
            timestamp = %$crate::__chrono::Local::now().to_rfc3339(),
            "Role audit"
        )
    };
    ($action:expr, $role_id:expr, $($fields:tt)+) => {
        $crate::__tracing::info!(
            target: "audit",
            action = $action,
            role_id = %$role_id,
            timestamp = %$crate::__chrono::Local::now().to_rfc3339(),
            $($fields)+,
            "Role audit"
        )
    };
}

/// Load `.env` from the current directory, if present
pub fn setup_environment() {
    match dotenv::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => eprintln!("Ignoring unreadable .env: {e}"),
    }
}
