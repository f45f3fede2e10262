//! Test helpers module
//!
//! Fixture builders shared by the integration tests. Every test builds its
//! own users, groups and requests; nothing is shared between tests.

#![allow(dead_code)]

pub mod database_helper;

use std::sync::Arc;
use roleplay_api::config::Settings;
use roleplay_api::database::store::{GroupStore, UserStore};
use roleplay_api::models::{Group, NewGroup, NewUser, User};
use roleplay_api::server::AppState;
use roleplay_api::services::JwtService;
use roleplay_api::MemoryStore;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Settings suitable for tests
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.auth.jwt_secret = TEST_JWT_SECRET.to_string();
    settings
}

pub fn test_jwt() -> JwtService {
    JwtService::from_config(&test_settings().auth)
}

/// Create a user with a unique username and email
pub async fn create_user<S: UserStore + ?Sized>(store: &S, prefix: &str) -> User {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let username = format!("{}_{}", prefix, &suffix[..12]);

    store
        .insert_user(NewUser {
            email: format!("{}@example.com", username),
            username,
            password: "$argon2id$not-a-real-hash".to_string(),
        })
        .await
        .expect("Failed to create user")
}

/// Create a group run by `master`
pub async fn create_group<S: GroupStore + ?Sized>(store: &S, master: &User) -> Group {
    store
        .insert_group(NewGroup {
            name: format!("Campaign of {}", master.username),
            description: "test".to_string(),
            schedule: "test".to_string(),
            location: "test".to_string(),
            chronic: "test".to_string(),
            master: master.id,
        })
        .await
        .expect("Failed to create group")
}

/// A master, their group and a prospective player
pub struct Party {
    pub master: User,
    pub player: User,
    pub group: Group,
}

pub async fn create_party<S: UserStore + GroupStore + ?Sized>(store: &S) -> Party {
    let master = create_user(store, "master").await;
    let player = create_user(store, "player").await;
    let group = create_group(store, &master).await;

    Party { master, player, group }
}

/// Application state over a fresh in-memory store
pub fn memory_app() -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(&test_settings(), store.clone());
    (state, store)
}
