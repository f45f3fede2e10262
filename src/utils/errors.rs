//! Error handling for the roleplay API
//!
//! This module defines the main error type used throughout the application,
//! its mapping onto HTTP responses, and a unified error handling strategy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Main error type for the roleplay API
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Credential hashing error: {0}")]
    Credentials(String),

    /// A required input (query parameter, path segment) is missing or malformed
    #[error("{0}")]
    BadInput(String),

    /// The write would duplicate an existing record
    #[error("{0}")]
    Conflict(String),

    /// The record exists but is not in a state that allows the operation
    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Authentication error: {0}")]
    Unauthorized(String),
}

/// Result type alias for roleplay API operations
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// HTTP status this error surfaces as
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidState(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Config(_)
            | AppError::Io(_)
            | AppError::Credentials(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code carried in the response body
    pub fn code(&self) -> &'static str {
        match self {
            AppError::BadInput(_)
            | AppError::Conflict(_)
            | AppError::InvalidState(_)
            | AppError::NotFound(_) => "BAD_REQUEST",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            _ => "INTERNAL_ERROR",
        }
    }

    /// Check if the error was caused by the caller rather than by infrastructure
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Database(_) => ErrorSeverity::Critical,
            AppError::Migration(_) => ErrorSeverity::Critical,
            AppError::Config(_) => ErrorSeverity::Critical,
            AppError::Io(_) => ErrorSeverity::Error,
            AppError::Credentials(_) => ErrorSeverity::Error,
            AppError::Forbidden(_) => ErrorSeverity::Warning,
            AppError::Unauthorized(_) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Info,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// JSON body returned for every failed call
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub status: u16,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            tracing::error!(error = %self, severity = %self.severity(), "Request failed");
            "internal server error".to_string()
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
            self.to_string()
        };

        let body = ErrorBody {
            code: self.code(),
            status: status.as_u16(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_expected_status() {
        assert_eq!(AppError::BadInput("x".into()).status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(AppError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::InvalidState("x".into()).status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::Unauthorized("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Config("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_domain_errors_share_bad_request_code() {
        assert_eq!(AppError::Conflict("x".into()).code(), "BAD_REQUEST");
        assert_eq!(AppError::NotFound("x".into()).code(), "BAD_REQUEST");
        assert_eq!(AppError::Forbidden("x".into()).code(), "FORBIDDEN");
        assert_eq!(AppError::Database(sqlx::Error::RowNotFound).code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_message_is_plain_for_domain_errors() {
        let err = AppError::Conflict("group request already exists".into());
        assert_eq!(err.to_string(), "group request already exists");
        assert!(err.is_client_error());
        assert_eq!(err.severity(), ErrorSeverity::Info);
    }

    #[tokio::test]
    async fn test_internal_errors_hide_details() {
        let response = AppError::Config("secret path".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert_eq!(body["status"], 500);
        assert_eq!(body["message"], "internal server error");
    }
}
