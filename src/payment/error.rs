use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

/// Error types for payment gateway calls
///
/// Gateway failures abort the operation and surface to the client for a
/// manual retry; no automatic retries are attempted.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Payment gateway request failed: {0}")]
    Transport(String),

    #[error("Payment gateway returned status {status}: {body}")]
    Gateway { status: u16, body: String },

    #[error("Unexpected payment gateway response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        PaymentError::Transport(err.to_string())
    }
}

impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        tracing::error!("Payment gateway error: {}", self);
        let body = Json(json!({ "error": "Payment gateway request failed" }));
        (StatusCode::BAD_GATEWAY, body).into_response()
    }
}
