use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payment methods offered by the gateway
pub type PaymentMethod = String;

/// Payment details returned when a gateway transaction is created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDetail {
    pub order_id: String,
    pub payment_method: String,
    /// QR payload or virtual-account number, depending on the method
    pub payment_number: String,
    #[serde(default)]
    pub fee: i64,
    pub total_payment: i64,
    pub expired_at: Option<DateTime<Utc>>,
}

/// A transaction's state as reported by the gateway's detail endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayTransaction {
    pub order_id: String,
    pub amount: i64,
    pub status: String,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl GatewayTransaction {
    /// Whether the gateway considers this transaction paid
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateTransactionRequest<'a> {
    pub project: &'a str,
    pub order_id: &'a str,
    pub amount: i64,
    pub payment_method: &'a str,
    pub api_key: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SimulatePaymentRequest<'a> {
    pub project: &'a str,
    pub order_id: &'a str,
    pub amount: i64,
    pub api_key: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransactionDetailResponse {
    pub transaction: GatewayTransaction,
}
