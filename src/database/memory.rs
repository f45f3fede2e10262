//! In-process storage
//!
//! `MemoryStore` keeps every table behind a single lock and enforces the same
//! constraints as the PostgreSQL schema: unique usernames and emails, one
//! request per (group, user) pair, one roster entry per (group, user) pair and
//! the foreign keys from requests to groups and users.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use crate::database::store::{UserStore, GroupStore, GroupRequestStore};
use crate::models::*;
use crate::utils::errors::{AppError, Result};

#[derive(Debug, Default)]
struct MemoryState {
    users: BTreeMap<i64, User>,
    groups: BTreeMap<i64, Group>,
    /// (group_id, user_id)
    players: BTreeSet<(i64, i64)>,
    requests: BTreeMap<i64, GroupRequest>,
    last_user_id: i64,
    last_group_id: i64,
    last_request_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let mut state = self.state.lock();

        if state.users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("email already in use".to_string()));
        }
        if state.users.values().any(|u| u.username == user.username) {
            return Err(AppError::Conflict("username already in use".to_string()));
        }

        state.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: state.last_user_id,
            username: user.username,
            email: user.email,
            password: user.password,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.state.lock().users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.state.lock().users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.state.lock().users.values().find(|u| u.username == username).cloned())
    }
}

#[async_trait]
impl GroupStore for MemoryStore {
    async fn insert_group(&self, group: NewGroup) -> Result<Group> {
        let mut state = self.state.lock();

        if !state.users.contains_key(&group.master) {
            return Err(AppError::NotFound("user not found".to_string()));
        }

        state.last_group_id += 1;
        let now = Utc::now();
        let group = Group {
            id: state.last_group_id,
            name: group.name,
            description: group.description,
            schedule: group.schedule,
            location: group.location,
            chronic: group.chronic,
            master: group.master,
            created_at: now,
            updated_at: now,
        };
        state.groups.insert(group.id, group.clone());

        Ok(group)
    }

    async fn find_group(&self, id: i64) -> Result<Option<Group>> {
        Ok(self.state.lock().groups.get(&id).cloned())
    }

    async fn is_player(&self, group_id: i64, user_id: i64) -> Result<bool> {
        Ok(self.state.lock().players.contains(&(group_id, user_id)))
    }

    async fn add_player(&self, group_id: i64, user_id: i64) -> Result<()> {
        let mut state = self.state.lock();
        state.check_player_insert(group_id, user_id)?;
        state.players.insert((group_id, user_id));
        Ok(())
    }

    async fn list_players(&self, group_id: i64) -> Result<Vec<User>> {
        let state = self.state.lock();
        let players = state
            .players
            .range((group_id, i64::MIN)..=(group_id, i64::MAX))
            .filter_map(|(_, user_id)| state.users.get(user_id).cloned())
            .collect();

        Ok(players)
    }
}

impl MemoryState {
    /// Constraint checks of a `groups_players` insert
    fn check_player_insert(&self, group_id: i64, user_id: i64) -> Result<()> {
        if !self.groups.contains_key(&group_id) {
            return Err(AppError::NotFound("group not found".to_string()));
        }
        if !self.users.contains_key(&user_id) {
            return Err(AppError::NotFound("user not found".to_string()));
        }
        if self.players.contains(&(group_id, user_id)) {
            return Err(AppError::InvalidState("user is already in the group".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl GroupRequestStore for MemoryStore {
    async fn find_request_by_id(&self, request_id: i64) -> Result<Option<GroupRequest>> {
        Ok(self.state.lock().requests.get(&request_id).cloned())
    }

    async fn find_request(&self, group_id: i64, request_id: i64) -> Result<Option<GroupRequest>> {
        Ok(self
            .state
            .lock()
            .requests
            .get(&request_id)
            .filter(|r| r.group_id == group_id)
            .cloned())
    }

    async fn find_request_for_pair(&self, group_id: i64, user_id: i64) -> Result<Option<GroupRequest>> {
        Ok(self
            .state
            .lock()
            .requests
            .values()
            .find(|r| r.group_id == group_id && r.user_id == user_id)
            .cloned())
    }

    async fn insert_pending_request(&self, group_id: i64, user_id: i64) -> Result<GroupRequest> {
        let mut state = self.state.lock();

        if state.players.contains(&(group_id, user_id)) {
            return Err(AppError::InvalidState("user is already in the group".to_string()));
        }
        if state.requests.values().any(|r| r.group_id == group_id && r.user_id == user_id) {
            return Err(AppError::Conflict("group request already exists".to_string()));
        }
        if !state.groups.contains_key(&group_id) {
            return Err(AppError::NotFound("group not found".to_string()));
        }
        if !state.users.contains_key(&user_id) {
            return Err(AppError::NotFound("user not found".to_string()));
        }

        state.last_request_id += 1;
        let now = Utc::now();
        let request = GroupRequest {
            id: state.last_request_id,
            group_id,
            user_id,
            status: GroupRequestStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        state.requests.insert(request.id, request.clone());

        Ok(request)
    }

    async fn accept_request(&self, request_id: i64) -> Result<GroupRequest> {
        let mut state = self.state.lock();

        let request = state
            .requests
            .get(&request_id)
            .filter(|r| r.is_pending())
            .cloned()
            .ok_or_else(|| AppError::InvalidState("group request is not pending".to_string()))?;

        // Validate the roster insert before touching anything so a failure
        // leaves the request pending.
        state.check_player_insert(request.group_id, request.user_id)?;

        let accepted = GroupRequest {
            status: GroupRequestStatus::Accepted,
            updated_at: Utc::now(),
            ..request
        };
        state.requests.insert(accepted.id, accepted.clone());
        state.players.insert((accepted.group_id, accepted.user_id));

        Ok(accepted)
    }

    async fn delete_pending_request(&self, request_id: i64) -> Result<()> {
        let mut state = self.state.lock();

        match state.requests.get(&request_id).map(GroupRequest::is_pending) {
            None => Err(AppError::NotFound("group request not found".to_string())),
            Some(false) => Err(AppError::InvalidState("group request is not pending".to_string())),
            Some(true) => {
                state.requests.remove(&request_id);
                Ok(())
            }
        }
    }

    async fn list_pending_by_master(&self, master_id: i64) -> Result<Vec<GroupRequestView>> {
        let state = self.state.lock();

        let views = state
            .requests
            .values()
            .filter(|r| r.is_pending())
            .filter_map(|r| {
                let group = state.groups.get(&r.group_id).filter(|g| g.master == master_id)?;
                let user = state.users.get(&r.user_id)?;
                Some(GroupRequestView {
                    id: r.id,
                    group_id: r.group_id,
                    user_id: r.user_id,
                    status: r.status,
                    group: GroupSummary {
                        name: group.name.clone(),
                        master: group.master,
                    },
                    user: UserSummary {
                        username: user.username.clone(),
                    },
                })
            })
            .collect();

        Ok(views)
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    async fn seed(store: &MemoryStore) -> (User, User, Group) {
        let master = store
            .insert_user(NewUser {
                username: "gm".to_string(),
                email: "gm@example.com".to_string(),
                password: "hash".to_string(),
            })
            .await
            .unwrap();
        let player = store
            .insert_user(NewUser {
                username: "rogue".to_string(),
                email: "rogue@example.com".to_string(),
                password: "hash".to_string(),
            })
            .await
            .unwrap();
        let group = store.insert_group(NewGroup::new("Tomb of Annihilation", master.id)).await.unwrap();
        (master, player, group)
    }

    #[tokio::test]
    async fn test_unique_user_fields() {
        let store = MemoryStore::new();
        seed(&store).await;

        let duplicate_email = NewUser {
            username: "other".to_string(),
            email: "gm@example.com".to_string(),
            password: "hash".to_string(),
        };
        assert_matches!(store.insert_user(duplicate_email).await, Err(AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_request_pair_is_unique() {
        let store = MemoryStore::new();
        let (_, player, group) = seed(&store).await;

        store.insert_pending_request(group.id, player.id).await.unwrap();
        assert_matches!(
            store.insert_pending_request(group.id, player.id).await,
            Err(AppError::Conflict(_))
        );
    }

    #[tokio::test]
    async fn test_request_for_unknown_group_is_not_found() {
        let store = MemoryStore::new();
        let (_, player, _) = seed(&store).await;

        assert_matches!(store.insert_pending_request(999, player.id).await, Err(AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_failed_roster_insert_keeps_request_pending() {
        let store = MemoryStore::new();
        let (_, player, group) = seed(&store).await;

        let request = store.insert_pending_request(group.id, player.id).await.unwrap();
        store.add_player(group.id, player.id).await.unwrap();

        assert_matches!(store.accept_request(request.id).await, Err(AppError::InvalidState(_)));
        let stored = store.find_request_by_id(request.id).await.unwrap().unwrap();
        assert_eq!(stored.status, GroupRequestStatus::Pending);
    }

    #[tokio::test]
    async fn test_players_listed_per_group() {
        let store = MemoryStore::new();
        let (master, player, group) = seed(&store).await;
        let other = store.insert_group(NewGroup::new("Out of the Abyss", master.id)).await.unwrap();

        store.add_player(group.id, player.id).await.unwrap();
        store.add_player(other.id, master.id).await.unwrap();

        let players = store.list_players(group.id).await.unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].id, player.id);
    }

    #[tokio::test]
    async fn test_delete_only_removes_pending_requests() {
        let store = MemoryStore::new();
        let (_, player, group) = seed(&store).await;

        let request = store.insert_pending_request(group.id, player.id).await.unwrap();
        store.accept_request(request.id).await.unwrap();

        assert_matches!(store.delete_pending_request(request.id).await, Err(AppError::InvalidState(_)));
        assert!(store.find_request_by_id(request.id).await.unwrap().is_some());
        assert_matches!(store.delete_pending_request(request.id + 1).await, Err(AppError::NotFound(_)));
    }
}
