//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod group;
pub mod group_request;

// Re-export commonly used models
pub use user::{User, NewUser};
pub use group::{Group, NewGroup};
pub use group_request::{GroupRequest, GroupRequestStatus, GroupRequestView, GroupSummary, UserSummary};
