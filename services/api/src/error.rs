//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the API service
///
/// This is the only type that crosses the handler boundary; the
/// `IntoResponse` implementation below is the sole translation point from
/// internal failures to HTTP status codes.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Unique-constraint violation (duplicate title or user name)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Referenced entity absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input violates a field invariant
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing, invalid, or unresolvable credential
    #[error("Unauthorized")]
    Unauthorized,

    /// Template source missing or malformed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Storage backend unreachable
    #[error("Database unavailable")]
    ServiceUnavailable,

    /// Infrastructure-level database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl From<sqlx::Error> for ApiError {
    /// Map storage errors onto the API taxonomy without leaking raw
    /// database details past the boundary.
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::RowNotFound = err {
            return ApiError::NotFound("record not found".to_string());
        }

        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return ApiError::Conflict("a record with this unique value already exists".to_string());
            }
            if db_err.is_foreign_key_violation() {
                return ApiError::NotFound("referenced user does not exist".to_string());
            }
            if db_err.is_check_violation() {
                return ApiError::Validation("value violates a field invariant".to_string());
            }
        }

        ApiError::Database(common::error::DatabaseError::Query(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(
            self,
            ApiError::Configuration(_) | ApiError::Database(_) | ApiError::InternalServerError
        ) {
            tracing::error!("Request failed: {}", self);
        }

        let (status, error_message) = match self {
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::Configuration(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
            ),
            ApiError::ServiceUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Database unavailable".to_string(),
            ),
            ApiError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
