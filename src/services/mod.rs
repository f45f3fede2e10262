//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod group_request;
pub mod user;

// Re-export commonly used services
pub use auth::{JwtService, Claims};
pub use group_request::GroupRequestService;
pub use user::UserService;

use std::sync::Arc;
use crate::config::settings::Settings;
use crate::database::store::{GroupRequestStore, UserStore};

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub group_request_service: GroupRequestService,
    pub user_service: UserService,
    pub jwt_service: JwtService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory over one backing store
    pub fn new<S>(settings: &Settings, store: Arc<S>) -> Self
    where
        S: GroupRequestStore + UserStore + 'static,
    {
        Self {
            group_request_service: GroupRequestService::new(store.clone()),
            user_service: UserService::new(store),
            jwt_service: JwtService::from_config(&settings.auth),
        }
    }
}
