use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

/// Error types for cart operations
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cart item not found")]
    NotFound,

    #[error("Product not found")]
    ProductNotFound,

    #[error("Insufficient stock")]
    InsufficientStock,

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<sqlx::Error> for CartError {
    fn from(err: sqlx::Error) -> Self {
        CartError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for CartError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            CartError::DatabaseError(msg) => {
                tracing::error!("Cart database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            CartError::NotFound => (StatusCode::NOT_FOUND, "Cart item not found".to_string()),
            CartError::ProductNotFound => {
                (StatusCode::NOT_FOUND, "Product not found".to_string())
            }
            CartError::InsufficientStock => {
                (StatusCode::BAD_REQUEST, "Insufficient stock".to_string())
            }
            CartError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
