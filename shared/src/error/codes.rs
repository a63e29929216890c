//! Unified error codes for the back-office
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 2xxx: Permission and role errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the frontend can match
/// on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 21xx: Role ====================
    /// Role not found
    RoleNotFound = 2101,
    /// Role id already taken by a default or custom role
    DuplicateRoleId = 2102,
    /// Built-in roles cannot be deleted
    CannotDeleteDefaultRole = 2103,
    /// Role id is empty or malformed
    InvalidRoleId = 2104,
    /// A role edit session is already open
    EditSessionActive = 2105,
    /// No role edit session is open
    NoActiveEditSession = 2106,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Storage backend failure
    StorageError = 9002,
    /// Persisted state could not be parsed
    PersistedStateUnreadable = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",

            // Role
            ErrorCode::RoleNotFound => "Role not found",
            ErrorCode::DuplicateRoleId => "A role with this id already exists",
            ErrorCode::CannotDeleteDefaultRole => "Built-in roles cannot be deleted",
            ErrorCode::InvalidRoleId => "Role id is invalid",
            ErrorCode::EditSessionActive => "Another role is already being edited",
            ErrorCode::NoActiveEditSession => "No role is being edited",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::StorageError => "Storage error",
            ErrorCode::PersistedStateUnreadable => "Stored data could not be read",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),

            // Role
            2101 => Ok(ErrorCode::RoleNotFound),
            2102 => Ok(ErrorCode::DuplicateRoleId),
            2103 => Ok(ErrorCode::CannotDeleteDefaultRole),
            2104 => Ok(ErrorCode::InvalidRoleId),
            2105 => Ok(ErrorCode::EditSessionActive),
            2106 => Ok(ErrorCode::NoActiveEditSession),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StorageError),
            9003 => Ok(ErrorCode::PersistedStateUnreadable),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
