use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::auth::AuthError;
use crate::error::ApiError;
use crate::payment::PaymentError;

/// Error types for order operations
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Order not found")]
    NotFound,

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Insufficient stock for product: {0}")]
    InsufficientStock(String),

    #[error("Order already processed: {0}")]
    AlreadyProcessed(String),

    #[error("Payment already completed")]
    PaymentAlreadyCompleted,

    #[error("Payment gateway error: {0}")]
    Payment(#[from] PaymentError),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl From<AuthError> for OrderError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Forbidden(msg) => OrderError::Forbidden(msg),
            _ => OrderError::Unauthorized,
        }
    }
}

impl From<ApiError> for OrderError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Validation(msg) => OrderError::ValidationError(msg),
            ApiError::NotFound { resource } => OrderError::ProductNotFound(resource),
            ApiError::Database(e) => OrderError::DatabaseError(e),
            other => OrderError::ValidationError(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for OrderError {
    fn from(err: validator::ValidationErrors) -> Self {
        OrderError::ValidationError(err.to_string())
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            OrderError::ValidationError(msg) => {
                tracing::debug!("Order validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            OrderError::NotFound => (StatusCode::NOT_FOUND, "Order not found".to_string()),
            OrderError::ProductNotFound(id) => {
                tracing::debug!("Checkout referenced unknown product: {}", id);
                (StatusCode::NOT_FOUND, format!("Product not found: {}", id))
            }
            OrderError::InsufficientStock(id) => {
                tracing::debug!("Insufficient stock for product: {}", id);
                (
                    StatusCode::BAD_REQUEST,
                    format!("Insufficient stock for product: {}", id),
                )
            }
            OrderError::AlreadyProcessed(msg) => {
                tracing::warn!("Order conflict: {}", msg);
                (StatusCode::CONFLICT, msg.clone())
            }
            OrderError::PaymentAlreadyCompleted => (
                StatusCode::BAD_REQUEST,
                "Payment already completed".to_string(),
            ),
            OrderError::Payment(e) => {
                tracing::error!("Payment gateway error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Payment gateway request failed".to_string(),
                )
            }
            OrderError::DatabaseError(e) => {
                tracing::error!("Database error in order operation: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            OrderError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            OrderError::Forbidden(msg) => {
                tracing::warn!("Forbidden order operation: {}", msg);
                (StatusCode::FORBIDDEN, msg.clone())
            }
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
