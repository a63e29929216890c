//! Data models
//!
//! Shared between the back-office core and the screens that render it.

pub mod permission;
pub mod role;

// Re-exports
pub use permission::*;
pub use role::*;
