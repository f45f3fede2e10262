//! Group request model
//!
//! A group request records a user's intent to join a group. It starts out
//! `PENDING` and is either accepted by the group's master or deleted.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroupRequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl GroupRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupRequestStatus::Pending => "PENDING",
            GroupRequestStatus::Accepted => "ACCEPTED",
            GroupRequestStatus::Rejected => "REJECTED",
        }
    }

    /// Whether the request may move to `next`
    pub fn can_transition_to(&self, next: GroupRequestStatus) -> bool {
        matches!(
            (self, next),
            (GroupRequestStatus::Pending, GroupRequestStatus::Accepted)
        )
    }
}

impl fmt::Display for GroupRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for GroupRequestStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "PENDING" => Ok(GroupRequestStatus::Pending),
            "ACCEPTED" => Ok(GroupRequestStatus::Accepted),
            "REJECTED" => Ok(GroupRequestStatus::Rejected),
            other => Err(format!("unknown group request status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GroupRequest {
    pub id: i64,
    pub group_id: i64,
    pub user_id: i64,
    #[sqlx(try_from = "String")]
    pub status: GroupRequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GroupRequest {
    pub fn is_pending(&self) -> bool {
        self.status == GroupRequestStatus::Pending
    }
}

/// Group fields exposed on the master's dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub name: String,
    pub master: i64,
}

/// User fields exposed on the master's dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub username: String,
}

/// Pending request joined with the minimal group and requester projection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRequestView {
    pub id: i64,
    pub group_id: i64,
    pub user_id: i64,
    pub status: GroupRequestStatus,
    pub group: GroupSummary,
    pub user: UserSummary,
}

/// Flat row produced by the dashboard join query
#[derive(Debug, Clone, FromRow)]
pub struct GroupRequestViewRow {
    pub id: i64,
    pub group_id: i64,
    pub user_id: i64,
    #[sqlx(try_from = "String")]
    pub status: GroupRequestStatus,
    pub group_name: String,
    pub group_master: i64,
    pub username: String,
}

impl From<GroupRequestViewRow> for GroupRequestView {
    fn from(row: GroupRequestViewRow) -> Self {
        Self {
            id: row.id,
            group_id: row.group_id,
            user_id: row.user_id,
            status: row.status,
            group: GroupSummary {
                name: row.group_name,
                master: row.group_master,
            },
            user: UserSummary {
                username: row.username,
            },
        }
    }
}
