//! Roleplay API
//!
//! Backend service for a tabletop roleplaying group finder. Users ask to join
//! groups run by a master, and the master accepts or rejects those requests.
//! This library provides the storage layer, the join request workflow and the
//! HTTP surface in front of it.

pub mod config;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod server;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{AppError, Result};

// Re-export main components for easy access
pub use database::{DatabaseService, MemoryStore};
pub use server::{AppState, router};
pub use services::{GroupRequestService, ServiceFactory};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
