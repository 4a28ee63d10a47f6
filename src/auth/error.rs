use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

/// Error types for authentication and authorization
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing access token")]
    MissingToken,

    #[error("Invalid access token")]
    InvalidToken,

    #[error("Access token expired")]
    ExpiredToken,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Identity provider error: {0}")]
    ProviderError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("User not found")]
    UserNotFound,
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::ExpiredToken => {
                tracing::warn!("Authentication failed: {}", self);
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }
            AuthError::Forbidden(msg) => {
                tracing::warn!("Authorization failed: {}", msg);
                (StatusCode::FORBIDDEN, msg)
            }
            AuthError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            AuthError::ProviderError(msg) => {
                tracing::error!("Identity provider error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Identity provider request failed".to_string(),
                )
            }
            AuthError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthError::UserNotFound => (StatusCode::NOT_FOUND, "User not found".to_string()),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
