//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::jwt::TokenError;

/// Custom error type for the API service
///
/// Every variant is recovered at the route boundary and translated into a
/// JSON body with an `error` message.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// Duplicate username or email
    #[error("{0}")]
    Conflict(String),

    /// Unknown user or wrong password; one message for both
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing token on a protected route, or a token whose user no longer
    /// exists
    #[error("Unauthorized")]
    Unauthorized,

    /// Failed token verification; expired and invalid collapse to the same
    /// response so the client cannot tell which check failed
    #[error("Invalid or expired token")]
    Token(#[from] TokenError),

    /// Rate limit exceeded
    #[error("Too many requests, please try again later")]
    Throttled,

    /// Missing resource
    #[error("{0}")]
    NotFound(String),

    /// The database could not be reached
    #[error("Database not available")]
    DatabaseUnavailable,

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                ApiError::DatabaseUnavailable
            }
            other => ApiError::Database(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InvalidCredentials | ApiError::Unauthorized | ApiError::Token(_) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Throttled => StatusCode::TOO_MANY_REQUESTS,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DatabaseUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Database(_) | ApiError::InternalServerError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if let ApiError::Database(e) = &self {
            error!("Database error: {}", e);
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
