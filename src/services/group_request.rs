//! Group request service implementation
//!
//! This service owns the join request workflow. A user asks to join a group,
//! which creates a `PENDING` request; the group's master then either accepts
//! it, which marks it `ACCEPTED` and puts the user on the roster, or rejects
//! it, which deletes it. It also serves the master's dashboard listing.

use std::sync::Arc;
use tracing::{debug, info};
use crate::database::store::GroupRequestStore;
use crate::models::group::Group;
use crate::models::group_request::{GroupRequest, GroupRequestStatus, GroupRequestView};
use crate::models::user::User;
use crate::utils::errors::{AppError, Result};
use crate::utils::logging::{log_refused_action, log_request_transition};

/// Group request service for the join workflow and the master dashboard
#[derive(Clone)]
pub struct GroupRequestService {
    store: Arc<dyn GroupRequestStore>,
}

impl GroupRequestService {
    /// Create a new GroupRequestService instance
    pub fn new(store: Arc<dyn GroupRequestStore>) -> Self {
        Self { store }
    }

    /// Ask to join a group on behalf of `user_id`
    ///
    /// An existing request for the pair, whatever its status, is a conflict.
    /// A user already on the roster cannot ask again.
    pub async fn create(&self, group_id: i64, user_id: i64) -> Result<GroupRequest> {
        debug!(group_id = group_id, user_id = user_id, "Creating group request");

        if self.store.find_request_for_pair(group_id, user_id).await?.is_some() {
            log_refused_action(group_id, user_id, "create", "request already exists");
            return Err(AppError::Conflict("group request already exists".to_string()));
        }

        if self.store.is_player(group_id, user_id).await? {
            log_refused_action(group_id, user_id, "create", "already a player");
            return Err(AppError::InvalidState("user is already in the group".to_string()));
        }

        let request = self.store.insert_pending_request(group_id, user_id).await?;
        log_request_transition(request.id, group_id, user_id, "created");

        Ok(request)
    }

    /// Accept a pending request and put its user on the roster
    pub async fn accept(&self, group_id: i64, request_id: i64, acting_user_id: i64) -> Result<GroupRequest> {
        debug!(group_id = group_id, request_id = request_id, acting_user_id = acting_user_id, "Accepting group request");

        let request = self.find_in_group(group_id, request_id).await?;
        self.ensure_master(group_id, acting_user_id, "accept").await?;

        if !request.status.can_transition_to(GroupRequestStatus::Accepted) {
            log_refused_action(group_id, acting_user_id, "accept", "request not pending");
            return Err(AppError::InvalidState("group request is not pending".to_string()));
        }

        let accepted = self.store.accept_request(request.id).await?;
        log_request_transition(accepted.id, group_id, accepted.user_id, "accepted");

        Ok(accepted)
    }

    /// Reject a pending request by deleting it
    pub async fn reject(&self, group_id: i64, request_id: i64, acting_user_id: i64) -> Result<()> {
        debug!(group_id = group_id, request_id = request_id, acting_user_id = acting_user_id, "Rejecting group request");

        let request = self.find_in_group(group_id, request_id).await?;
        self.ensure_master(group_id, acting_user_id, "reject").await?;

        if !request.is_pending() {
            log_refused_action(group_id, acting_user_id, "reject", "request not pending");
            return Err(AppError::InvalidState("group request is not pending".to_string()));
        }

        // The lookup above may be stale by now; the store re-checks the status.
        if let Err(e) = self.store.delete_pending_request(request.id).await {
            log_refused_action(group_id, acting_user_id, "reject", &e.to_string());
            return Err(e);
        }
        log_request_transition(request.id, group_id, request.user_id, "rejected");

        Ok(())
    }

    /// Pending requests on every group `master_id` runs
    ///
    /// The master is required; there is no unfiltered listing.
    pub async fn list_pending_by_master(&self, master_id: Option<i64>) -> Result<Vec<GroupRequestView>> {
        let master_id = master_id
            .ok_or_else(|| AppError::BadInput("master query should be provided".to_string()))?;

        let requests = self.store.list_pending_by_master(master_id).await?;
        info!(master_id = master_id, count = requests.len(), "Listed pending group requests");

        Ok(requests)
    }

    /// Get a request by ID
    pub async fn get(&self, request_id: i64) -> Result<GroupRequest> {
        self.store
            .find_request_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::NotFound("group request not found".to_string()))
    }

    /// Current roster of a group
    pub async fn players(&self, group_id: i64) -> Result<Vec<User>> {
        self.store.list_players(group_id).await
    }

    async fn find_in_group(&self, group_id: i64, request_id: i64) -> Result<GroupRequest> {
        self.store
            .find_request(group_id, request_id)
            .await?
            .ok_or_else(|| AppError::NotFound("group request not found".to_string()))
    }

    async fn ensure_master(&self, group_id: i64, acting_user_id: i64, action: &str) -> Result<Group> {
        let group = self
            .store
            .find_group(group_id)
            .await?
            .ok_or_else(|| AppError::NotFound("group not found".to_string()))?;

        if group.master != acting_user_id {
            log_refused_action(group_id, acting_user_id, action, "not the group master");
            return Err(AppError::Forbidden(format!(
                "only the group master can {} requests",
                action
            )));
        }

        Ok(group)
    }
}
