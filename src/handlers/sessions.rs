//! Session handlers
//!
//! Routes:
//! - `POST /sessions` exchanges an email and password for a bearer token

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use crate::handlers::extract::JsonBody;
use crate::server::AppState;
use crate::utils::errors::Result;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// POST /sessions
pub async fn store(
    State(state): State<AppState>,
    JsonBody(credentials): JsonBody<Credentials>,
) -> Result<(StatusCode, Json<Value>)> {
    let user = state
        .services
        .user_service
        .authenticate(credentials.email.trim(), &credentials.password)
        .await?;
    let token = state.services.jwt_service.issue(user.id)?;

    Ok((StatusCode::CREATED, Json(json!({ "user": user, "token": token }))))
}
