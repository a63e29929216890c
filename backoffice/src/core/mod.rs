//! Core - configuration and the application context

pub mod config;
pub mod state;

pub use config::{Config, StoreBackend};
pub use state::BackOffice;
