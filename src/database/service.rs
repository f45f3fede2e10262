//! Database service layer
//!
//! This module provides the PostgreSQL implementation of the storage traits
//! on top of the repositories

use async_trait::async_trait;
use crate::database::{DatabasePool, UserRepository, GroupRepository, GroupRequestRepository};
use crate::database::store::{UserStore, GroupStore, GroupRequestStore};
use crate::models::*;
use crate::utils::errors::Result;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub groups: GroupRepository,
    pub requests: GroupRequestRepository,
    pool: DatabasePool,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            groups: GroupRepository::new(pool.clone()),
            requests: GroupRequestRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for DatabaseService {
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        self.users.create(user).await
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.users.find_by_id(id).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.users.find_by_email(email).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.users.find_by_username(username).await
    }
}

#[async_trait]
impl GroupStore for DatabaseService {
    async fn insert_group(&self, group: NewGroup) -> Result<Group> {
        self.groups.create(group).await
    }

    async fn find_group(&self, id: i64) -> Result<Option<Group>> {
        self.groups.find_by_id(id).await
    }

    async fn is_player(&self, group_id: i64, user_id: i64) -> Result<bool> {
        self.groups.is_player(group_id, user_id).await
    }

    async fn add_player(&self, group_id: i64, user_id: i64) -> Result<()> {
        self.groups.add_player(group_id, user_id).await
    }

    async fn list_players(&self, group_id: i64) -> Result<Vec<User>> {
        self.groups.get_players(group_id).await
    }
}

#[async_trait]
impl GroupRequestStore for DatabaseService {
    async fn find_request_by_id(&self, request_id: i64) -> Result<Option<GroupRequest>> {
        self.requests.find_by_id(request_id).await
    }

    async fn find_request(&self, group_id: i64, request_id: i64) -> Result<Option<GroupRequest>> {
        self.requests.find_in_group(group_id, request_id).await
    }

    async fn find_request_for_pair(&self, group_id: i64, user_id: i64) -> Result<Option<GroupRequest>> {
        self.requests.find_by_pair(group_id, user_id).await
    }

    async fn insert_pending_request(&self, group_id: i64, user_id: i64) -> Result<GroupRequest> {
        self.requests.create_pending(group_id, user_id).await
    }

    async fn accept_request(&self, request_id: i64) -> Result<GroupRequest> {
        self.requests.accept(request_id).await
    }

    async fn delete_pending_request(&self, request_id: i64) -> Result<()> {
        self.requests.delete_pending(request_id).await
    }

    async fn list_pending_by_master(&self, master_id: i64) -> Result<Vec<GroupRequestView>> {
        self.requests.list_pending_by_master(master_id).await
    }

    async fn health_check(&self) -> Result<()> {
        crate::database::connection::health_check(&self.pool).await
    }
}
