//! Error types for the HTTP API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use orchestrator::TurnError;

/// Errors surfaced by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid credential.
    #[error("unauthorized")]
    Unauthorized,

    /// The wallet balance does not cover the requested action.
    #[error("insufficient credits: required {required}, balance {balance}")]
    InsufficientCredits { required: i64, balance: i64 },

    /// Unknown resource. The string is the client-visible error code.
    #[error("not found: {0}")]
    NotFound(&'static str),

    /// Malformed or rejected request. The string is the client-visible code.
    #[error("bad request: {0}")]
    BadRequest(&'static str),

    /// The caller does not own the referenced resource.
    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] database::DatabaseError),

    /// A remote provider failed.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<TurnError> for ApiError {
    fn from(err: TurnError) -> Self {
        match err {
            TurnError::Unauthorized => ApiError::Unauthorized,
            TurnError::InsufficientFunds { required, balance } => {
                ApiError::InsufficientCredits { required, balance }
            }
            TurnError::CharacterNotFound(_) => ApiError::NotFound("character not found"),
            TurnError::Upstream(msg) => ApiError::Upstream(msg),
            TurnError::Database(err) => ApiError::Database(err),
            TurnError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<chat_core::GatewayError> for ApiError {
    fn from(err: chat_core::GatewayError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({ "error": "unauthorized" }),
            ),
            ApiError::InsufficientCredits { required, balance } => (
                StatusCode::PAYMENT_REQUIRED,
                serde_json::json!({
                    "error": "insufficient_credits",
                    "required": required,
                    "balance": balance,
                }),
            ),
            ApiError::NotFound(code) => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "error": code }),
            ),
            ApiError::BadRequest(code) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": code }),
            ),
            ApiError::Forbidden(code) => (
                StatusCode::FORBIDDEN,
                serde_json::json!({ "error": code }),
            ),
            ApiError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": "db_error" }),
                )
            }
            ApiError::Upstream(msg) => {
                tracing::error!("Upstream error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": "upstream_error" }),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": "internal_error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_error_status_mapping() {
        let resp = ApiError::from(TurnError::Unauthorized).into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = ApiError::from(TurnError::InsufficientFunds {
            required: 10,
            balance: 5,
        })
        .into_response();
        assert_eq!(resp.status(), StatusCode::PAYMENT_REQUIRED);

        let resp =
            ApiError::from(TurnError::CharacterNotFound("x".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = ApiError::from(TurnError::Upstream("timeout".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
