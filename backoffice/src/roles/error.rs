//! Role store errors

use crate::storage::StorageError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoleError {
    #[error("Role '{0}' already exists")]
    DuplicateRoleId(String),

    #[error("Role '{0}' not found")]
    RoleNotFound(String),

    #[error("Built-in role '{0}' cannot be deleted")]
    CannotDeleteDefaultRole(String),

    #[error("Invalid role id '{0}'")]
    InvalidRoleId(String),

    #[error("Another role is already being edited")]
    EditSessionActive,

    #[error("No role is being edited")]
    NoActiveEditSession,

    #[error("Stored roles could not be parsed: {0}")]
    PersistedStateUnreadable(#[source] serde_json::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type RoleResult<T> = Result<T, RoleError>;

impl RoleError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::DuplicateRoleId(_) => ErrorCode::DuplicateRoleId,
            Self::RoleNotFound(_) => ErrorCode::RoleNotFound,
            Self::CannotDeleteDefaultRole(_) => ErrorCode::CannotDeleteDefaultRole,
            Self::InvalidRoleId(_) => ErrorCode::InvalidRoleId,
            Self::EditSessionActive => ErrorCode::EditSessionActive,
            Self::NoActiveEditSession => ErrorCode::NoActiveEditSession,
            Self::PersistedStateUnreadable(_) => ErrorCode::PersistedStateUnreadable,
            Self::Serialization(_) => ErrorCode::InternalError,
            Self::Storage(_) => ErrorCode::StorageError,
        }
    }

    /// Role id the error refers to, if any
    pub fn role_id(&self) -> Option<&str> {
        match self {
            Self::DuplicateRoleId(id)
            | Self::RoleNotFound(id)
            | Self::CannotDeleteDefaultRole(id)
            | Self::InvalidRoleId(id) => Some(id),
            _ => None,
        }
    }
}

impl From<&RoleError> for AppError {
    fn from(err: &RoleError) -> Self {
        let app = AppError::with_message(err.code(), err.to_string());
        match err.role_id() {
            Some(id) => app.with_detail("role_id", id),
            None => app,
        }
    }
}

impl From<RoleError> for AppError {
    fn from(err: RoleError) -> Self {
        AppError::from(&err)
    }
}
