//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod user;
pub mod group;
pub mod group_request;

// Re-export repositories
pub use user::UserRepository;
pub use group::GroupRepository;
pub use group_request::GroupRequestRepository;

use crate::utils::errors::AppError;

/// Named constraints from the initial migration
pub(crate) mod constraints {
    pub const USERS_USERNAME_KEY: &str = "users_username_key";
    pub const USERS_EMAIL_KEY: &str = "users_email_key";
    pub const GROUPS_MASTER_FKEY: &str = "groups_master_fkey";
    pub const GROUPS_PLAYERS_PKEY: &str = "groups_players_pkey";
    pub const GROUPS_PLAYERS_GROUP_FKEY: &str = "groups_players_group_id_fkey";
    pub const GROUPS_PLAYERS_USER_FKEY: &str = "groups_players_user_id_fkey";
    pub const GROUPS_REQUESTS_PAIR_KEY: &str = "groups_requests_group_user_key";
    pub const GROUPS_REQUESTS_GROUP_FKEY: &str = "groups_requests_group_id_fkey";
    pub const GROUPS_REQUESTS_USER_FKEY: &str = "groups_requests_user_id_fkey";
}

/// Translate a violated constraint into the matching domain error.
///
/// Errors that are not constraint violations, or that hit a constraint
/// without a domain meaning, are passed through as `AppError::Database`.
pub(crate) fn map_constraint_violation(err: sqlx::Error) -> AppError {
    let constraint = match &err {
        sqlx::Error::Database(db_err) => db_err.constraint().map(str::to_owned),
        _ => None,
    };

    match constraint.as_deref() {
        Some(constraints::USERS_EMAIL_KEY) => AppError::Conflict("email already in use".to_string()),
        Some(constraints::USERS_USERNAME_KEY) => AppError::Conflict("username already in use".to_string()),
        Some(constraints::GROUPS_REQUESTS_PAIR_KEY) => {
            AppError::Conflict("group request already exists".to_string())
        }
        Some(constraints::GROUPS_PLAYERS_PKEY) => {
            AppError::InvalidState("user is already in the group".to_string())
        }
        Some(constraints::GROUPS_REQUESTS_GROUP_FKEY | constraints::GROUPS_PLAYERS_GROUP_FKEY) => {
            AppError::NotFound("group not found".to_string())
        }
        Some(
            constraints::GROUPS_MASTER_FKEY
            | constraints::GROUPS_REQUESTS_USER_FKEY
            | constraints::GROUPS_PLAYERS_USER_FKEY,
        ) => {
            AppError::NotFound("user not found".to_string())
        }
        _ => AppError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_non_constraint_errors_pass_through() {
        assert_matches!(map_constraint_violation(sqlx::Error::RowNotFound), AppError::Database(_));
        assert_matches!(map_constraint_violation(sqlx::Error::PoolTimedOut), AppError::Database(_));
    }
}
