//! HTTP handlers module
//!
//! This module contains the axum handlers behind each route

pub mod extract;
pub mod group_requests;
pub mod health;
pub mod sessions;
pub mod users;
