use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::coupons::engine::CouponRejection;

/// Error types for coupon operations
#[derive(Debug, thiserror::Error)]
pub enum CouponError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Coupon not found")]
    NotFound,

    #[error("Coupon code already in use")]
    DuplicateCode,

    #[error("{0}")]
    Rejected(CouponRejection),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<sqlx::Error> for CouponError {
    fn from(err: sqlx::Error) -> Self {
        CouponError::DatabaseError(err.to_string())
    }
}

impl From<crate::auth::AuthError> for CouponError {
    fn from(err: crate::auth::AuthError) -> Self {
        use crate::auth::AuthError;
        match err {
            AuthError::Forbidden(msg) => CouponError::Forbidden(msg),
            AuthError::DatabaseError(msg) => CouponError::DatabaseError(msg),
            _ => CouponError::Unauthorized,
        }
    }
}

impl IntoResponse for CouponError {
    fn into_response(self) -> Response {
        // The apply endpoint reports rejections under "message" so storefront
        // clients can show them verbatim
        let (status, body) = match self {
            CouponError::DatabaseError(msg) => {
                tracing::error!("Coupon database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "A database error occurred" }),
                )
            }
            CouponError::NotFound => (
                StatusCode::NOT_FOUND,
                json!({ "message": "Coupon not found" }),
            ),
            CouponError::DuplicateCode => (
                StatusCode::CONFLICT,
                json!({ "error": "Coupon code already in use" }),
            ),
            CouponError::Rejected(rejection) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": rejection.to_string() }),
            ),
            CouponError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Unauthorized" }),
            ),
            CouponError::Forbidden(msg) => {
                tracing::warn!("Forbidden coupon operation: {}", msg);
                (StatusCode::FORBIDDEN, json!({ "error": msg }))
            }
            CouponError::ValidationError(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
        };

        (status, Json(body)).into_response()
    }
}
