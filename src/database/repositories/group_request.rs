//! Group request repository implementation

use sqlx::PgPool;
use chrono::Utc;
use std::time::Instant;
use crate::database::repositories::group::insert_player;
use crate::database::repositories::map_constraint_violation;
use crate::models::group_request::{GroupRequest, GroupRequestStatus, GroupRequestView, GroupRequestViewRow};
use crate::utils::errors::AppError;
use crate::utils::logging::log_database_operation;

const REQUEST_COLUMNS: &str = "id, group_id, user_id, status, created_at, updated_at";

#[derive(Clone)]
#[derive(Debug)]
pub struct GroupRequestRepository {
    pool: PgPool,
}

impl GroupRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find request by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<GroupRequest>, AppError> {
        let request = sqlx::query_as::<_, GroupRequest>(&format!(
            "SELECT {} FROM groups_requests WHERE id = $1",
            REQUEST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Find request by ID scoped to a group
    pub async fn find_in_group(&self, group_id: i64, id: i64) -> Result<Option<GroupRequest>, AppError> {
        let request = sqlx::query_as::<_, GroupRequest>(&format!(
            "SELECT {} FROM groups_requests WHERE id = $1 AND group_id = $2",
            REQUEST_COLUMNS
        ))
        .bind(id)
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Find request for a (group, user) pair regardless of status
    pub async fn find_by_pair(&self, group_id: i64, user_id: i64) -> Result<Option<GroupRequest>, AppError> {
        let request = sqlx::query_as::<_, GroupRequest>(&format!(
            "SELECT {} FROM groups_requests WHERE group_id = $1 AND user_id = $2",
            REQUEST_COLUMNS
        ))
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Create a pending request unless the user is already on the roster
    pub async fn create_pending(&self, group_id: i64, user_id: i64) -> Result<GroupRequest, AppError> {
        let now = Utc::now();
        let request = sqlx::query_as::<_, GroupRequest>(&format!(
            r#"
            INSERT INTO groups_requests (group_id, user_id, status, created_at, updated_at)
            SELECT $1, $2, $3, $4, $4
            WHERE NOT EXISTS (
                SELECT 1 FROM groups_players WHERE group_id = $1 AND user_id = $2
            )
            RETURNING {}
            "#,
            REQUEST_COLUMNS
        ))
        .bind(group_id)
        .bind(user_id)
        .bind(GroupRequestStatus::Pending.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_constraint_violation)?;

        request.ok_or_else(|| AppError::InvalidState("user is already in the group".to_string()))
    }

    /// Accept a pending request and attach its user to the roster in one transaction
    pub async fn accept(&self, id: i64) -> Result<GroupRequest, AppError> {
        let started = Instant::now();
        let mut tx = self.pool.begin().await?;

        let accepted = sqlx::query_as::<_, GroupRequest>(&format!(
            r#"
            UPDATE groups_requests
            SET status = $2, updated_at = $3
            WHERE id = $1 AND status = $4
            RETURNING {}
            "#,
            REQUEST_COLUMNS
        ))
        .bind(id)
        .bind(GroupRequestStatus::Accepted.as_str())
        .bind(Utc::now())
        .bind(GroupRequestStatus::Pending.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        // Dropping `tx` on any early return rolls the status change back.
        let accepted = accepted
            .ok_or_else(|| AppError::InvalidState("group request is not pending".to_string()))?;

        if let Err(e) = insert_player(&mut *tx, accepted.group_id, accepted.user_id).await {
            log_database_operation("accept", "groups_requests", started.elapsed().as_millis() as u64, false);
            return Err(e);
        }

        tx.commit().await?;
        log_database_operation("accept", "groups_requests", started.elapsed().as_millis() as u64, true);

        Ok(accepted)
    }

    /// Delete a request only while it is still pending
    pub async fn delete_pending(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM groups_requests WHERE id = $1 AND status = $2")
            .bind(id)
            .bind(GroupRequestStatus::Pending.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // Nothing removed: tell a vanished row from one that moved on.
        match self.find_by_id(id).await? {
            None => Err(AppError::NotFound("group request not found".to_string())),
            Some(_) => Err(AppError::InvalidState("group request is not pending".to_string())),
        }
    }

    /// Pending requests on groups owned by a master, joined with group and requester
    pub async fn list_pending_by_master(&self, master_id: i64) -> Result<Vec<GroupRequestView>, AppError> {
        let rows = sqlx::query_as::<_, GroupRequestViewRow>(
            r#"
            SELECT gr.id, gr.group_id, gr.user_id, gr.status,
                   g.name AS group_name, g.master AS group_master,
                   u.username
            FROM groups_requests gr
            INNER JOIN groups g ON g.id = gr.group_id
            INNER JOIN users u ON u.id = gr.user_id
            WHERE gr.status = $1 AND g.master = $2
            ORDER BY gr.created_at ASC, gr.id ASC
            "#
        )
        .bind(GroupRequestStatus::Pending.as_str())
        .bind(master_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(GroupRequestView::from).collect())
    }
}
