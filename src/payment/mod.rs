// Client for the hosted payment gateway
// Constructed once at startup and injected through AppState; handlers never
// read gateway credentials themselves

pub mod client;
pub mod error;
pub mod models;

pub use client::PaymentClient;
pub use error::PaymentError;
pub use models::{GatewayTransaction, PaymentDetail, PaymentMethod};
