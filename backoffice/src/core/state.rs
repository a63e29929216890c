use std::fs;
use std::sync::Arc;

use shared::error::{AppError, AppResult};
use shared::models::{Permission, Role, Section};

use crate::auth::{CurrentRole, RoleAssignments};
use crate::core::config::{Config, StoreBackend};
use crate::roles::{RoleEditor, RoleStore};
use crate::storage::{KvStore, MemoryStore, RedbStore, StorageError, StorageResult};

/// Back-office context - everything a screen needs, built once at startup
///
/// Screens borrow it (`&BackOffice` to render, `&mut BackOffice` from an
/// event handler); there are no global singletons.
///
/// | Field | Type | Purpose |
/// |-------|------|---------|
/// | config | Config | immutable settings |
/// | roles | RoleStore | default + custom role tables |
/// | assignments | RoleAssignments | user id → role id |
/// | editor | RoleEditor | the single role form session |
/// | current | CurrentRole | signed-in role |
///
/// # Example
///
/// ```ignore
/// let mut office = BackOffice::initialize(&config)?;
/// office.sign_in(2);
/// if office.has_permission(Section::Settings, Permission::Edit) {
///     // show the role editor
/// }
/// ```
pub struct BackOffice {
    config: Config,
    roles: RoleStore,
    assignments: RoleAssignments,
    editor: RoleEditor,
    current: CurrentRole,
}

impl BackOffice {
    /// Open the configured store and load roles
    ///
    /// Initialization order:
    /// 1. work directory (redb backend only)
    /// 2. key-value store
    /// 3. role store, assignments, session
    pub fn initialize(config: &Config) -> StorageResult<Self> {
        let kv: Arc<dyn KvStore> = match config.store_backend {
            StoreBackend::Redb => {
                fs::create_dir_all(&config.work_dir).map_err(|e| {
                    StorageError::Backend(format!(
                        "cannot create work dir {}: {e}",
                        config.work_dir
                    ))
                })?;
                let path = config.database_path();
                tracing::info!(path = %path.display(), "Opening redb store");
                Arc::new(RedbStore::open(path)?)
            }
            StoreBackend::Memory => {
                tracing::info!("Using in-memory store");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::with_store(config.clone(), kv))
    }

    /// Build the context over an already opened store
    pub fn with_store(config: Config, kv: Arc<dyn KvStore>) -> Self {
        let roles = RoleStore::load(kv);
        let assignments = config.role_assignments.clone();
        let mut office = Self {
            config,
            roles,
            assignments,
            editor: RoleEditor::new(),
            current: CurrentRole::anonymous(),
        };

        if let Some(user_id) = office.config.current_user_id {
            office.sign_in(user_id);
        }
        office
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn roles(&self) -> &RoleStore {
        &self.roles
    }

    /// Role mutations go through here
    pub fn roles_mut(&mut self) -> &mut RoleStore {
        &mut self.roles
    }

    pub fn assignments(&self) -> &RoleAssignments {
        &self.assignments
    }

    // ========== Session ==========

    /// Resolve `user_id` to a role and make it current
    pub fn sign_in(&mut self, user_id: u64) {
        let role_id = self.assignments.resolve(Some(user_id)).to_string();
        tracing::info!(
            target: "security",
            user_id,
            role_id = %role_id,
            "User signed in"
        );
        self.current = CurrentRole::new(role_id, Some(user_id));
    }

    pub fn sign_out(&mut self) {
        if let Some(user_id) = self.current.user_id() {
            tracing::info!(target: "security", user_id, "User signed out");
        }
        self.current = CurrentRole::anonymous();
    }

    pub fn current_role(&self) -> &CurrentRole {
        &self.current
    }

    /// Role the current session is evaluated as (after fallback)
    pub fn current_effective_role(&self) -> Option<&Role> {
        self.current.effective_role(&self.roles)
    }

    /// Permission check for the current session
    pub fn has_permission(&self, section: Section, permission: Permission) -> bool {
        self.current.has_permission(&self.roles, section, permission)
    }

    /// Gate for a screen or action; denials are logged to the security target
    pub fn require_permission(&self, section: Section, permission: Permission) -> AppResult<()> {
        if self.has_permission(section, permission) {
            return Ok(());
        }

        tracing::warn!(
            target: "security",
            user_id = ?self.current.user_id(),
            role_id = %self.current.role_id(),
            section = %section,
            permission = %permission,
            "Permission denied"
        );
        Err(AppError::permission_denied(format!(
            "Permission denied: {section}:{permission}"
        ))
        .with_detail("section", section.as_str())
        .with_detail("permission", permission.as_str()))
    }

    // ========== Role form ==========

    pub fn editor(&self) -> &RoleEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut RoleEditor {
        &mut self.editor
    }

    /// Open the role form for an existing role; failures land in `last_error`
    pub fn begin_role_edit(&mut self, role_id: &str) -> bool {
        let result = self.editor.begin_edit(&self.roles, role_id);
        self.roles.record(result)
    }

    /// Open the role form for a new role; failures land in `last_error`
    pub fn begin_new_role(&mut self) -> bool {
        let result = self.editor.begin_new();
        self.roles.record(result)
    }

    /// Save the role form; failures land in `last_error` and keep the form open
    pub fn save_role_edit(&mut self) -> bool {
        self.editor.save(&mut self.roles).is_ok()
    }

    /// Close the role form without saving
    pub fn cancel_role_edit(&mut self) -> bool {
        let result = self.editor.cancel();
        self.roles.record(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::permissions::{KITCHEN_MANAGER, OWNER, STAFF};
    use shared::error::ErrorCode;

    fn office() -> BackOffice {
        BackOffice::with_store(
            Config::with_work_dir("unused", StoreBackend::Memory),
            Arc::new(MemoryStore::new()),
        )
    }

    #[test]
    fn test_starts_signed_out_as_staff() {
        let office = office();
        assert_eq!(office.current_role().role_id(), STAFF);
        assert!(office.has_permission(Section::Sales, Permission::Create));
        assert!(!office.has_permission(Section::Settings, Permission::View));
    }

    #[test]
    fn test_sign_in_resolves_role() {
        let mut office = office();
        office.sign_in(1);
        assert_eq!(office.current_role().role_id(), OWNER);
        assert!(office.has_permission(Section::Finance, Permission::Admin));

        office.sign_in(3);
        assert_eq!(office.current_role().role_id(), KITCHEN_MANAGER);

        office.sign_in(1234);
        assert_eq!(office.current_role().role_id(), STAFF);

        office.sign_out();
        assert_eq!(office.current_role().user_id(), None);
    }

    #[test]
    fn test_require_permission() {
        let mut office = office();
        let err = office
            .require_permission(Section::Finance, Permission::View)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert_eq!(err.message, "Permission denied: finance:view");

        office.sign_in(2);
        assert!(office.require_permission(Section::Finance, Permission::View).is_ok());
        assert!(office.require_permission(Section::Finance, Permission::Edit).is_err());
    }

    #[test]
    fn test_save_without_open_form_records_error() {
        let mut office = office();
        assert!(!office.save_role_edit());
        assert_eq!(
            office.roles().last_error().unwrap().code,
            ErrorCode::NoActiveEditSession
        );
    }

    #[test]
    fn test_configured_user_signed_in_at_startup() {
        let mut config = Config::with_work_dir("unused", StoreBackend::Memory);
        config.current_user_id = Some(2);
        let office = BackOffice::with_store(config, Arc::new(MemoryStore::new()));
        assert_eq!(office.current_role().user_id(), Some(2));
        assert!(office.has_permission(Section::Settings, Permission::Edit));
    }

    #[test]
    fn test_role_form_through_context() {
        let mut office = office();
        assert!(office.begin_new_role());
        assert!(!office.begin_role_edit(STAFF));
        assert_eq!(
            office.roles().last_error().unwrap().code,
            ErrorCode::EditSessionActive
        );

        let editor = office.editor_mut();
        editor.set_name("Host").unwrap();
        editor.toggle(Section::Sales, Permission::View).unwrap();
        assert!(office.save_role_edit());
        assert!(!office.editor().is_editing());
        assert!(office.roles().contains("host"));

        assert!(!office.cancel_role_edit());
        assert_eq!(
            office.roles().last_error().unwrap().code,
            ErrorCode::NoActiveEditSession
        );
    }

    #[test]
    fn test_initialize_redb_in_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        let work_dir = dir.path().join("office");
        let config = Config::with_work_dir(work_dir.to_string_lossy(), StoreBackend::Redb);

        {
            let mut office = BackOffice::initialize(&config).unwrap();
            assert!(office.roles_mut().create_role(
                "host",
                shared::models::RoleCreate {
                    name: "Host".into(),
                    ..Default::default()
                },
            ));
        }

        assert!(config.database_path().exists());
        let office = BackOffice::initialize(&config).unwrap();
        assert_eq!(office.roles().role("host").unwrap().name, "Host");
    }
}
