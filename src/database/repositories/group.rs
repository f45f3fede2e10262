//! Group repository implementation

use sqlx::{PgConnection, PgPool};
use chrono::Utc;
use crate::database::repositories::map_constraint_violation;
use crate::models::group::{Group, NewGroup};
use crate::models::user::User;
use crate::utils::errors::AppError;

#[derive(Clone)]
#[derive(Debug)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new group
    pub async fn create(&self, request: NewGroup) -> Result<Group, AppError> {
        let now = Utc::now();
        let group = sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO groups (name, description, schedule, location, chronic, master, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, description, schedule, location, chronic, master, created_at, updated_at
            "#
        )
        .bind(request.name)
        .bind(request.description)
        .bind(request.schedule)
        .bind(request.location)
        .bind(request.chronic)
        .bind(request.master)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_constraint_violation)?;

        Ok(group)
    }

    /// Find group by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Group>, AppError> {
        let group = sqlx::query_as::<_, Group>(
            "SELECT id, name, description, schedule, location, chronic, master, created_at, updated_at FROM groups WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    /// Add a player to a group roster
    pub async fn add_player(&self, group_id: i64, user_id: i64) -> Result<(), AppError> {
        let mut conn = self.pool.acquire().await?;
        insert_player(&mut *conn, group_id, user_id).await
    }

    /// Check if user is on the group roster
    pub async fn is_player(&self, group_id: i64, user_id: i64) -> Result<bool, AppError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM groups_players WHERE group_id = $1 AND user_id = $2"
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// Get the users on a group roster
    pub async fn get_players(&self, group_id: i64) -> Result<Vec<User>, AppError> {
        let players = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.username, u.email, u.password, u.created_at, u.updated_at
            FROM users u
            INNER JOIN groups_players gp ON u.id = gp.user_id
            WHERE gp.group_id = $1
            ORDER BY u.id ASC
            "#
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(players)
    }
}

/// Roster insert usable on a plain connection or inside a transaction
pub(crate) async fn insert_player(conn: &mut PgConnection, group_id: i64, user_id: i64) -> Result<(), AppError> {
    sqlx::query("INSERT INTO groups_players (group_id, user_id) VALUES ($1, $2)")
        .bind(group_id)
        .bind(user_id)
        .execute(conn)
        .await
        .map_err(map_constraint_violation)?;

    Ok(())
}
