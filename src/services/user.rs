//! User service implementation
//!
//! This service handles account creation, lookup and password login.
//! `register` takes an already hashed password.

use std::sync::Arc;
use tracing::{debug, info, warn};
use crate::database::store::UserStore;
use crate::services::auth::verify_password;
use crate::models::user::{User, NewUser};
use crate::utils::errors::{AppError, Result};

/// User service for managing user operations
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Register a new user
    ///
    /// Email is checked before username, so a request colliding on both
    /// reports the email.
    pub async fn register(&self, request: NewUser) -> Result<User> {
        debug!(username = %request.username, "Registering user");

        if self.store.find_user_by_email(&request.email).await?.is_some() {
            warn!(username = %request.username, "Registration refused: email already in use");
            return Err(AppError::Conflict("email already in use".to_string()));
        }

        if self.store.find_user_by_username(&request.username).await?.is_some() {
            warn!(username = %request.username, "Registration refused: username already in use");
            return Err(AppError::Conflict("username already in use".to_string()));
        }

        let user = self.store.insert_user(request).await?;
        info!(user_id = user.id, username = %user.username, "New user registered successfully");

        Ok(user)
    }

    /// Check an email and password pair
    ///
    /// Unknown email and wrong password fail the same way.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let user = self.store.find_user_by_email(email).await?;

        match user {
            Some(user) if verify_password(password, &user.password) => {
                info!(user_id = user.id, "User logged in");
                Ok(user)
            }
            _ => {
                warn!(email = %email, "Login refused");
                Err(AppError::Unauthorized("invalid credentials".to_string()))
            }
        }
    }

    /// Get user by ID
    pub async fn get_user_by_id(&self, user_id: i64) -> Result<User> {
        self.store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crate::database::memory::MemoryStore;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_and_fetch() {
        let service = UserService::new(Arc::new(MemoryStore::new()));

        let user = service.register(new_user("bilbo", "bilbo@shire.me")).await.unwrap();
        let fetched = service.get_user_by_id(user.id).await.unwrap();
        assert_eq!(fetched.username, "bilbo");
    }

    #[tokio::test]
    async fn test_email_conflict_reported_first() {
        let service = UserService::new(Arc::new(MemoryStore::new()));
        service.register(new_user("bilbo", "bilbo@shire.me")).await.unwrap();

        let err = service.register(new_user("bilbo", "bilbo@shire.me")).await.unwrap_err();
        assert_eq!(err.to_string(), "email already in use");

        let err = service.register(new_user("bilbo", "other@shire.me")).await.unwrap_err();
        assert_eq!(err.to_string(), "username already in use");
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let service = UserService::new(Arc::new(MemoryStore::new()));
        assert_matches!(service.get_user_by_id(7).await, Err(AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_authenticate_checks_password() {
        let service = UserService::new(Arc::new(MemoryStore::new()));
        let hash = crate::services::auth::hash_password("mithril").unwrap();
        let user = service
            .register(NewUser {
                username: "thorin".to_string(),
                email: "thorin@erebor.me".to_string(),
                password: hash,
            })
            .await
            .unwrap();

        let logged_in = service.authenticate("thorin@erebor.me", "mithril").await.unwrap();
        assert_eq!(logged_in.id, user.id);

        assert_matches!(
            service.authenticate("thorin@erebor.me", "gold").await,
            Err(AppError::Unauthorized(_))
        );
        assert_matches!(
            service.authenticate("smaug@erebor.me", "mithril").await,
            Err(AppError::Unauthorized(_))
        );
    }
}
