//! Storage traits
//!
//! The workflow and account services talk to storage only through these
//! traits. `DatabaseService` implements them over PostgreSQL and
//! `MemoryStore` implements them in-process with the same constraint
//! semantics.

use async_trait::async_trait;
use crate::models::{Group, GroupRequest, GroupRequestView, NewGroup, NewUser, User};
use crate::utils::errors::Result;

/// Accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user; duplicate username or email surfaces as `Conflict`
    async fn insert_user(&self, user: NewUser) -> Result<User>;

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
}

/// Groups and their player rosters
#[async_trait]
pub trait GroupStore: Send + Sync {
    async fn insert_group(&self, group: NewGroup) -> Result<Group>;

    async fn find_group(&self, id: i64) -> Result<Option<Group>>;

    /// Whether `user_id` is on the roster of `group_id`
    async fn is_player(&self, group_id: i64, user_id: i64) -> Result<bool>;

    /// Attach a user to a roster; an existing entry surfaces as `InvalidState`
    async fn add_player(&self, group_id: i64, user_id: i64) -> Result<()>;

    /// Roster of a group ordered by user id
    async fn list_players(&self, group_id: i64) -> Result<Vec<User>>;
}

/// Join requests
#[async_trait]
pub trait GroupRequestStore: GroupStore {
    async fn find_request_by_id(&self, request_id: i64) -> Result<Option<GroupRequest>>;

    /// Request with `request_id` that also belongs to `group_id`
    async fn find_request(&self, group_id: i64, request_id: i64) -> Result<Option<GroupRequest>>;

    /// Any request for the pair, whatever its status
    async fn find_request_for_pair(&self, group_id: i64, user_id: i64) -> Result<Option<GroupRequest>>;

    /// Insert a `PENDING` request.
    ///
    /// Fails with `Conflict` when a request for the pair exists, `InvalidState`
    /// when the user is already a player and `NotFound` when the group or the
    /// user does not exist. The roster check and the insert are one step.
    async fn insert_pending_request(&self, group_id: i64, user_id: i64) -> Result<GroupRequest>;

    /// Mark a pending request `ACCEPTED` and attach its user to the roster.
    ///
    /// Both changes are applied or neither is. Fails with `InvalidState` when
    /// the request is no longer pending or the user is already a player.
    async fn accept_request(&self, request_id: i64) -> Result<GroupRequest>;

    /// Hard-delete a request that is still pending.
    ///
    /// The status check and the delete are one step. Fails with `NotFound`
    /// when the request is gone and `InvalidState` when it was accepted.
    async fn delete_pending_request(&self, request_id: i64) -> Result<()>;

    /// Pending requests on groups owned by `master_id`, in creation order
    async fn list_pending_by_master(&self, master_id: i64) -> Result<Vec<GroupRequestView>>;

    /// Check that the backing storage is reachable
    async fn health_check(&self) -> Result<()>;
}
