//! User handlers
//!
//! Routes:
//! - `POST /users` registers an account

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use crate::handlers::extract::JsonBody;
use crate::models::NewUser;
use crate::server::AppState;
use crate::services::auth::hash_password;
use crate::utils::errors::{AppError, Result};

const MIN_PASSWORD_LEN: usize = 4;

#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl CreateUser {
    fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(AppError::BadInput("username is required".to_string()));
        }

        let valid_email = self
            .email
            .split_once('@')
            .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
            .unwrap_or(false);
        if !valid_email {
            return Err(AppError::BadInput("email is not valid".to_string()));
        }

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::BadInput(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        Ok(())
    }
}

/// POST /users
pub async fn store(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateUser>,
) -> Result<(StatusCode, Json<Value>)> {
    payload.validate()?;

    let user = state
        .services
        .user_service
        .register(NewUser {
            username: payload.username.trim().to_string(),
            email: payload.email.trim().to_string(),
            password: hash_password(&payload.password)?,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn payload(username: &str, email: &str, password: &str) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_validate_user_payload() {
        assert!(payload("gimli", "gimli@moria.me", "axes").validate().is_ok());
        assert_matches!(payload(" ", "gimli@moria.me", "axes").validate(), Err(AppError::BadInput(_)));
        assert_matches!(payload("gimli", "gimli", "axes").validate(), Err(AppError::BadInput(_)));
        assert_matches!(payload("gimli", "@moria.me", "axes").validate(), Err(AppError::BadInput(_)));
        assert_matches!(payload("gimli", "gimli@moria.me", "axe").validate(), Err(AppError::BadInput(_)));
    }
}
