//! Role store
//!
//! Two-layer role table:
//!
//! - **defaults**: the five built-in roles, constant for the process lifetime
//! - **customs**: user-defined roles and overrides of built-in roles, loaded
//!   once from the [`KvStore`] and rewritten as a whole after every mutation
//!
//! The effective table is `{ ...defaults, ...customs }`; a custom entry with
//! a built-in id shadows the default (its grants were merged per section
//! when it was written, see [`merge_role`]).
//!
//! # Persisted layout
//!
//! ```text
//! customRoles -> { "<role id>": { "name", "description", "permissions": { "<section>": ["<permission>", ...] } } }
//! ```

use super::error::{RoleError, RoleResult};
use super::merge::merge_role;
use crate::auth::permissions::{FALLBACK_ROLE_ID, default_roles, is_protected_role};
use crate::storage::KvStore;
use shared::error::AppError;
use shared::models::{
    Permission, Role, RoleCreate, RoleUpdate, Section, is_valid_role_id, normalize_permissions,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Store key of the custom role blob
pub const CUSTOM_ROLES_KEY: &str = "customRoles";

pub type RoleTable = BTreeMap<String, Role>;

pub struct RoleStore {
    kv: Arc<dyn KvStore>,
    defaults: RoleTable,
    customs: RoleTable,
    last_error: Option<AppError>,
}

impl RoleStore {
    /// Load custom roles from `kv`
    ///
    /// Never fails: a missing blob, an unparsable blob or a failing read all
    /// start with an empty custom table. The latter two are logged only.
    pub fn load(kv: Arc<dyn KvStore>) -> Self {
        let customs = match read_customs(kv.as_ref()) {
            Ok(customs) => customs,
            Err(e @ RoleError::PersistedStateUnreadable(_)) => {
                tracing::warn!(error = %e, "Ignoring unreadable custom roles");
                RoleTable::new()
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read custom roles");
                RoleTable::new()
            }
        };

        let defaults = default_roles();
        tracing::info!(
            defaults = defaults.len(),
            customs = customs.len(),
            "Role store loaded"
        );

        Self {
            kv,
            defaults,
            customs,
            last_error: None,
        }
    }

    // ========== Reads ==========

    /// Effective role table, rebuilt on every call
    pub fn effective_roles(&self) -> RoleTable {
        let mut table = self.defaults.clone();
        table.extend(
            self.customs
                .iter()
                .map(|(id, role)| (id.clone(), role.clone())),
        );
        table
    }

    /// Effective role for `id`
    pub fn role(&self, id: &str) -> Option<&Role> {
        self.customs.get(id).or_else(|| self.defaults.get(id))
    }

    /// Number of entries in the effective table
    pub fn len(&self) -> usize {
        self.defaults.len()
            + self
                .customs
                .keys()
                .filter(|id| !self.defaults.contains_key(*id))
                .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn default_roles(&self) -> &RoleTable {
        &self.defaults
    }

    /// User-defined roles and overrides, as persisted
    pub fn custom_roles(&self) -> &RoleTable {
        &self.customs
    }

    pub fn contains(&self, id: &str) -> bool {
        self.role(id).is_some()
    }

    pub fn is_default_role(&self, id: &str) -> bool {
        self.defaults.contains_key(id)
    }

    /// A built-in role shadowed by a custom entry
    pub fn is_overridden(&self, id: &str) -> bool {
        self.is_default_role(id) && self.customs.contains_key(id)
    }

    /// Whether a delete affordance may be offered for `id`
    pub fn can_delete(&self, id: &str) -> bool {
        !is_protected_role(id) && self.customs.contains_key(id)
    }

    /// Authorization predicate
    ///
    /// Unknown role ids are evaluated as the fallback role. Missing sections
    /// and missing permissions both deny.
    pub fn has_permission(&self, role_id: &str, section: Section, permission: Permission) -> bool {
        self.role(role_id)
            .or_else(|| self.role(FALLBACK_ROLE_ID))
            .is_some_and(|role| role.grants(section, permission))
    }

    // ========== Mutations ==========

    /// Insert a new custom role
    pub fn try_create_role(&mut self, id: &str, data: RoleCreate) -> RoleResult<()> {
        if !is_valid_role_id(id) {
            return Err(RoleError::InvalidRoleId(id.to_string()));
        }
        if self.contains(id) {
            return Err(RoleError::DuplicateRoleId(id.to_string()));
        }

        let mut permissions = data.permissions.unwrap_or_default();
        normalize_permissions(&mut permissions);
        let role = Role {
            id: id.to_string(),
            name: data.name,
            description: data.description,
            permissions,
        };

        let mut next = self.customs.clone();
        next.insert(id.to_string(), role);
        self.commit(next)?;

        tracing::info!(role_id = %id, "Role created");
        crate::audit_log!("role_created", id);
        Ok(())
    }

    /// Merge `data` into a custom role, or override a built-in one
    ///
    /// Built-in ids always merge onto the built-in definition, so a new
    /// override replaces any earlier one.
    pub fn try_update_role(&mut self, id: &str, data: RoleUpdate) -> RoleResult<()> {
        let base = self
            .defaults
            .get(id)
            .or_else(|| self.customs.get(id))
            .ok_or_else(|| RoleError::RoleNotFound(id.to_string()))?;
        let overriding = self.is_default_role(id);
        let merged = merge_role(base, &data);

        let mut next = self.customs.clone();
        next.insert(id.to_string(), merged);
        self.commit(next)?;

        tracing::info!(role_id = %id, overriding, "Role updated");
        crate::audit_log!("role_updated", id, overriding = overriding);
        Ok(())
    }

    /// Remove a custom role. Built-in ids are refused, even when overridden.
    pub fn try_delete_role(&mut self, id: &str) -> RoleResult<()> {
        if is_protected_role(id) {
            return Err(RoleError::CannotDeleteDefaultRole(id.to_string()));
        }
        if !self.customs.contains_key(id) {
            return Err(RoleError::RoleNotFound(id.to_string()));
        }

        let mut next = self.customs.clone();
        next.remove(id);
        self.commit(next)?;

        tracing::info!(role_id = %id, "Role deleted");
        crate::audit_log!("role_deleted", id);
        Ok(())
    }

    /// [`try_create_role`](Self::try_create_role), recording failures in [`last_error`](Self::last_error)
    pub fn create_role(&mut self, id: &str, data: RoleCreate) -> bool {
        let result = self.try_create_role(id, data);
        self.record(result)
    }

    /// [`try_update_role`](Self::try_update_role), recording failures in [`last_error`](Self::last_error)
    pub fn update_role(&mut self, id: &str, data: RoleUpdate) -> bool {
        let result = self.try_update_role(id, data);
        self.record(result)
    }

    /// [`try_delete_role`](Self::try_delete_role), recording failures in [`last_error`](Self::last_error)
    pub fn delete_role(&mut self, id: &str) -> bool {
        let result = self.try_delete_role(id);
        self.record(result)
    }

    // ========== Last error ==========

    /// Failure of the most recent mutation, for a dismissible notice
    pub fn last_error(&self) -> Option<&AppError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub(crate) fn record<T>(&mut self, result: RoleResult<T>) -> bool {
        match result {
            Ok(_) => {
                self.last_error = None;
                true
            }
            Err(e) => {
                self.fail(&e);
                false
            }
        }
    }

    pub(crate) fn fail(&mut self, err: &RoleError) {
        tracing::warn!(error = %err, code = %err.code(), "Role mutation rejected");
        self.last_error = Some(AppError::from(err));
    }

    // ========== Persistence ==========

    /// Persist `next` as the whole custom table, then adopt it in memory
    fn commit(&mut self, next: RoleTable) -> RoleResult<()> {
        let blob = serde_json::to_vec(&next)?;
        self.kv.put(CUSTOM_ROLES_KEY, &blob)?;
        self.customs = next;
        Ok(())
    }
}

fn read_customs(kv: &dyn KvStore) -> RoleResult<RoleTable> {
    let Some(blob) = kv.get(CUSTOM_ROLES_KEY)? else {
        return Ok(RoleTable::new());
    };

    let mut customs: RoleTable =
        serde_json::from_slice(&blob).map_err(RoleError::PersistedStateUnreadable)?;
    for (id, role) in customs.iter_mut() {
        role.id = id.clone();
        normalize_permissions(&mut role.permissions);
    }
    Ok(customs)
}
