//! Group request handlers
//!
//! Routes:
//! - `GET    /groups/:group_id/requests?master=<id>` lists a master's pending requests
//! - `POST   /groups/:group_id/requests` asks to join as the caller
//! - `POST   /groups/:group_id/requests/:request_id/accept` accepts (master only)
//! - `DELETE /groups/:group_id/requests/:request_id` rejects (master only)

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use crate::handlers::extract::Path;
use crate::middleware::auth::CurrentUser;
use crate::server::AppState;
use crate::utils::errors::{AppError, Result};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub master: Option<String>,
}

/// Parse the `master` query value; blank counts as missing
fn parse_master(raw: Option<&str>) -> Result<Option<i64>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::BadInput("master query should be provided".to_string())),
    }
}

/// GET /groups/:group_id/requests
///
/// The path group does not narrow the listing; it covers every group the
/// master runs.
pub async fn index(
    State(state): State<AppState>,
    Path(_group_id): Path<i64>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>> {
    let master = parse_master(params.master.as_deref())?;
    let group_requests = state.services.group_request_service.list_pending_by_master(master).await?;

    Ok(Json(json!({ "groupRequests": group_requests })))
}

/// POST /groups/:group_id/requests
pub async fn store(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
    user: CurrentUser,
) -> Result<(StatusCode, Json<Value>)> {
    let group_request = state.services.group_request_service.create(group_id, user.id).await?;

    Ok((StatusCode::CREATED, Json(json!({ "groupRequest": group_request }))))
}

/// POST /groups/:group_id/requests/:request_id/accept
pub async fn accept(
    State(state): State<AppState>,
    Path((group_id, request_id)): Path<(i64, i64)>,
    user: CurrentUser,
) -> Result<Json<Value>> {
    let group_request = state
        .services
        .group_request_service
        .accept(group_id, request_id, user.id)
        .await?;

    Ok(Json(json!({ "groupRequest": group_request })))
}

/// DELETE /groups/:group_id/requests/:request_id
pub async fn destroy(
    State(state): State<AppState>,
    Path((group_id, request_id)): Path<(i64, i64)>,
    user: CurrentUser,
) -> Result<Json<Value>> {
    state
        .services
        .group_request_service
        .reject(group_id, request_id, user.id)
        .await?;

    Ok(Json(json!({})))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_master() {
        assert_eq!(parse_master(None).unwrap(), None);
        assert_eq!(parse_master(Some("")).unwrap(), None);
        assert_eq!(parse_master(Some(" 12 ")).unwrap(), Some(12));
        assert_matches!(parse_master(Some("abc")), Err(AppError::BadInput(_)));
    }
}
