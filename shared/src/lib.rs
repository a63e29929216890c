//! Shared types for the restaurant back-office
//!
//! The permission vocabulary, the role model and the error types used by
//! the back-office core and every screen that consumes it.

pub mod error;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{Permission, Role, RoleCreate, RoleUpdate, Section, SectionPermissions};
