//! Database module
//!
//! This module handles database connections, storage traits and their
//! PostgreSQL and in-memory implementations

pub mod connection;
pub mod memory;
pub mod repositories;
pub mod service;
pub mod store;

// Re-export commonly used database components
pub use connection::{DatabasePool, DatabaseConfig, create_pool, run_migrations, health_check};
pub use memory::MemoryStore;
pub use repositories::{UserRepository, GroupRepository, GroupRequestRepository};
pub use service::DatabaseService;
pub use store::{UserStore, GroupStore, GroupRequestStore};
