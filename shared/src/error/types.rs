//! Error types shown to back-office screens

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the error value handed to view components:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details (offending id, field, ...)
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Category derived from the code range
    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    // ==================== Convenience constructors ====================

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::RoleNotFound);
        assert_eq!(err.code, ErrorCode::RoleNotFound);
        assert_eq!(err.message, "Role not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::with_message(ErrorCode::DuplicateRoleId, "Role 'host' already exists")
            .with_detail("role_id", "host");

        let details = err.details.unwrap();
        assert_eq!(details.get("role_id").unwrap(), "host");
    }

    #[test]
    fn test_permission_denied_is_user_facing() {
        let err = AppError::permission_denied("finance:view");
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert_eq!(err.category(), ErrorCategory::Permission);
        assert!(err.category().is_user_facing());
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::with_message(ErrorCode::RoleNotFound, "Role 'bar' not found");
        assert_eq!(format!("{}", err), "Role 'bar' not found");
    }

    #[test]
    fn test_app_error_serialize_skips_empty_details() {
        let err = AppError::new(ErrorCode::CannotDeleteDefaultRole);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], 2103);
        assert!(json.get("details").is_none());
    }
}
