//! Role edit session
//!
//! ```text
//! Idle ──begin_new / begin_edit──▶ Editing(New | Existing) ──save──▶ Saved ──▶ Idle
//!                                          │
//!                                          └──cancel──▶ Cancelled ──▶ Idle
//! ```
//!
//! All changes go to a transient [`EditBuffer`]; the role store is only
//! touched by `save`. A failed save keeps the session open so the form can
//! show the store's `last_error` next to the fields.

use super::error::{RoleError, RoleResult};
use super::store::RoleStore;
use shared::models::{
    Permission, RoleCreate, RoleUpdate, Section, SectionPermissions, role_id_from_name,
    toggle_permission,
};

/// What a session will write on save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditKind {
    /// Create a role whose id is derived from the buffer name
    New,
    /// Update (or override) the role with this id
    Existing(String),
}

/// In-progress role form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    pub name: String,
    pub description: String,
    pub permissions: SectionPermissions,
}

impl EditBuffer {
    pub fn grants(&self, section: Section, permission: Permission) -> bool {
        self.permissions
            .get(&section)
            .is_some_and(|list| list.contains(&permission))
    }
}

/// How a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Written to the store under this role id
    Saved(String),
    Cancelled,
}

#[derive(Debug, Default)]
enum EditState {
    #[default]
    Idle,
    Editing { kind: EditKind, buffer: EditBuffer },
}

/// Single active role edit buffer
#[derive(Debug, Default)]
pub struct RoleEditor {
    state: EditState,
}

impl RoleEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing { .. })
    }

    pub fn kind(&self) -> Option<&EditKind> {
        match &self.state {
            EditState::Editing { kind, .. } => Some(kind),
            EditState::Idle => None,
        }
    }

    pub fn buffer(&self) -> Option<&EditBuffer> {
        match &self.state {
            EditState::Editing { buffer, .. } => Some(buffer),
            EditState::Idle => None,
        }
    }

    /// Open an empty form for a new role
    pub fn begin_new(&mut self) -> RoleResult<()> {
        self.ensure_idle()?;
        self.state = EditState::Editing {
            kind: EditKind::New,
            buffer: EditBuffer::default(),
        };
        Ok(())
    }

    /// Open a form pre-filled with the effective role `id`
    pub fn begin_edit(&mut self, store: &RoleStore, id: &str) -> RoleResult<()> {
        self.ensure_idle()?;
        let role = store
            .role(id)
            .ok_or_else(|| RoleError::RoleNotFound(id.to_string()))?;

        self.state = EditState::Editing {
            kind: EditKind::Existing(id.to_string()),
            buffer: EditBuffer {
                name: role.name.clone(),
                description: role.description.clone(),
                permissions: role.permissions.clone(),
            },
        };
        Ok(())
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> RoleResult<()> {
        self.buffer_mut()?.name = name.into();
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> RoleResult<()> {
        self.buffer_mut()?.description = description.into();
        Ok(())
    }

    /// Flip one grant in the buffer; returns whether it is now granted
    pub fn toggle(&mut self, section: Section, permission: Permission) -> RoleResult<bool> {
        let buffer = self.buffer_mut()?;
        Ok(toggle_permission(&mut buffer.permissions, section, permission))
    }

    /// Write the buffer through the store's Create or Update
    ///
    /// On failure the session stays open and the reason is also recorded as
    /// the store's last error.
    pub fn save(&mut self, store: &mut RoleStore) -> RoleResult<SessionOutcome> {
        let EditState::Editing { kind, buffer } = &self.state else {
            let err = RoleError::NoActiveEditSession;
            store.fail(&err);
            return Err(err);
        };

        let (id, result) = match kind {
            EditKind::New => {
                let id = role_id_from_name(&buffer.name);
                let data = RoleCreate {
                    name: buffer.name.clone(),
                    description: buffer.description.clone(),
                    permissions: Some(buffer.permissions.clone()),
                };
                let result = store.try_create_role(&id, data);
                (id, result)
            }
            EditKind::Existing(id) => {
                let data = RoleUpdate {
                    name: Some(buffer.name.clone()),
                    description: Some(buffer.description.clone()),
                    permissions: Some(buffer.permissions.clone()),
                };
                let result = store.try_update_role(id, data);
                (id.clone(), result)
            }
        };

        match result {
            Ok(()) => {
                store.clear_error();
                self.state = EditState::Idle;
                tracing::debug!(role_id = %id, "Role edit saved");
                Ok(SessionOutcome::Saved(id))
            }
            Err(e) => {
                store.fail(&e);
                Err(e)
            }
        }
    }

    /// Discard the buffer without touching the store
    pub fn cancel(&mut self) -> RoleResult<SessionOutcome> {
        if !self.is_editing() {
            return Err(RoleError::NoActiveEditSession);
        }
        self.state = EditState::Idle;
        Ok(SessionOutcome::Cancelled)
    }

    fn ensure_idle(&self) -> RoleResult<()> {
        if self.is_editing() {
            Err(RoleError::EditSessionActive)
        } else {
            Ok(())
        }
    }

    fn buffer_mut(&mut self) -> RoleResult<&mut EditBuffer> {
        match &mut self.state {
            EditState::Editing { buffer, .. } => Ok(buffer),
            EditState::Idle => Err(RoleError::NoActiveEditSession),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::permissions::STAFF;
    use crate::storage::MemoryStore;
    use shared::error::ErrorCode;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn store() -> RoleStore {
        RoleStore::load(Arc::new(MemoryStore::new()))
    }

    /// Order is write order, so compare grants as sets
    fn grant_set(permissions: &SectionPermissions, section: Section) -> BTreeSet<Permission> {
        permissions
            .get(&section)
            .map(|list| list.iter().copied().collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_idle_editor_rejects_edits() {
        let mut editor = RoleEditor::new();
        let mut store = store();

        assert!(matches!(
            editor.toggle(Section::Menu, Permission::View),
            Err(RoleError::NoActiveEditSession)
        ));
        assert!(editor.set_name("x").is_err());
        assert!(editor.cancel().is_err());
        assert!(matches!(
            editor.save(&mut store),
            Err(RoleError::NoActiveEditSession)
        ));
        assert_eq!(
            store.last_error().unwrap().code,
            ErrorCode::NoActiveEditSession
        );
    }

    #[test]
    fn test_only_one_session_at_a_time() {
        let mut editor = RoleEditor::new();
        let store = store();

        editor.begin_new().unwrap();
        assert!(matches!(
            editor.begin_edit(&store, STAFF),
            Err(RoleError::EditSessionActive)
        ));
        assert_eq!(editor.kind(), Some(&EditKind::New));
    }

    #[test]
    fn test_new_role_saved_under_derived_id() {
        let mut editor = RoleEditor::new();
        let mut store = store();

        editor.begin_new().unwrap();
        editor.set_name("Head Chef").unwrap();
        editor.set_description("Runs the line").unwrap();
        assert!(editor.toggle(Section::Menu, Permission::Edit).unwrap());
        assert!(editor.toggle(Section::Inventory, Permission::View).unwrap());

        let outcome = editor.save(&mut store).unwrap();
        assert_eq!(outcome, SessionOutcome::Saved("head_chef".into()));
        assert!(!editor.is_editing());

        let role = store.role("head_chef").unwrap();
        assert_eq!(role.name, "Head Chef");
        assert!(store.has_permission("head_chef", Section::Menu, Permission::Edit));
        assert!(!store.has_permission("head_chef", Section::Menu, Permission::View));
    }

    #[test]
    fn test_non_ascii_name_saved() {
        let mut editor = RoleEditor::new();
        let mut store = store();

        editor.begin_new().unwrap();
        editor.set_name("ホールスタッフ").unwrap();
        editor.toggle(Section::Sales, Permission::View).unwrap();
        let outcome = editor.save(&mut store).unwrap();

        assert_eq!(outcome, SessionOutcome::Saved("ホールスタッフ".into()));
        assert!(store.last_error().is_none());
        assert!(store.has_permission("ホールスタッフ", Section::Sales, Permission::View));

        editor.begin_new().unwrap();
        editor.set_name("Café Lead").unwrap();
        editor.save(&mut store).unwrap();
        assert_eq!(store.role("café_lead").unwrap().name, "Café Lead");
    }

    #[test]
    fn test_failed_save_keeps_session_open() {
        let mut editor = RoleEditor::new();
        let mut store = store();

        editor.begin_new().unwrap();
        editor.set_name("Staff").unwrap();

        let err = editor.save(&mut store).unwrap_err();
        assert!(matches!(err, RoleError::DuplicateRoleId(_)));
        assert!(editor.is_editing());
        assert_eq!(
            store.last_error().unwrap().code,
            ErrorCode::DuplicateRoleId
        );

        editor.set_name("Staff Trainee").unwrap();
        editor.save(&mut store).unwrap();
        assert!(store.last_error().is_none());
        assert!(store.contains("staff_trainee"));
    }

    #[test]
    fn test_edit_existing_overrides_default() {
        let mut editor = RoleEditor::new();
        let mut store = store();

        editor.begin_edit(&store, STAFF).unwrap();
        // revoke every sales grant
        for permission in store.role(STAFF).unwrap().permissions_for(Section::Sales).to_vec() {
            assert!(!editor.toggle(Section::Sales, permission).unwrap());
        }
        editor.save(&mut store).unwrap();

        assert!(store.is_overridden(STAFF));
        assert!(!store.has_permission(STAFF, Section::Sales, Permission::View));
        assert!(store.has_permission(STAFF, Section::Menu, Permission::View));
    }

    #[test]
    fn test_toggle_twice_round_trips_buffer() {
        let mut editor = RoleEditor::new();
        let store = store();
        editor.begin_edit(&store, STAFF).unwrap();
        let original = editor.buffer().unwrap().clone();

        for section in Section::ALL {
            for permission in Permission::ALL {
                editor.toggle(section, permission).unwrap();
                editor.toggle(section, permission).unwrap();
                let buffer = editor.buffer().unwrap();
                assert_eq!(
                    grant_set(&buffer.permissions, section),
                    grant_set(&original.permissions, section),
                    "{section}/{permission}"
                );
            }
        }
    }

    #[test]
    fn test_cancel_discards_buffer() {
        let mut editor = RoleEditor::new();
        let mut store = store();

        editor.begin_edit(&store, STAFF).unwrap();
        editor.toggle(Section::Finance, Permission::View).unwrap();
        assert!(editor.buffer().unwrap().grants(Section::Finance, Permission::View));

        assert_eq!(editor.cancel().unwrap(), SessionOutcome::Cancelled);
        assert!(editor.buffer().is_none());
        assert!(!store.is_overridden(STAFF));
        assert!(!store.has_permission(STAFF, Section::Finance, Permission::View));

        // a new session may start after cancel
        editor.begin_new().unwrap();
        editor.set_name("Host").unwrap();
        assert!(editor.save(&mut store).is_ok());
    }

    #[test]
    fn test_begin_edit_unknown_role() {
        let mut editor = RoleEditor::new();
        let store = store();
        assert!(matches!(
            editor.begin_edit(&store, "ghost"),
            Err(RoleError::RoleNotFound(_))
        ));
        assert!(!editor.is_editing());
    }
}
