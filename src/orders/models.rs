use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Order status lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Expired,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Failed => "failed",
            OrderStatus::Expired => "expired",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "processing" => Some(OrderStatus::Processing),
            "completed" => Some(OrderStatus::Completed),
            "failed" => Some(OrderStatus::Failed),
            "expired" => Some(OrderStatus::Expired),
            _ => None,
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Order aggregate row
///
/// Owns the status; lines are immutable after checkout.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
    pub id: String,
    pub user_id: Uuid,
    pub status: OrderStatus,
    /// Order total in the smallest currency unit
    pub amount: i64,
    pub payment_method: Option<String>,
    pub payment_number: Option<String>,
    pub fee: i64,
    pub total_payment: i64,
    pub expired_at: Option<DateTime<Utc>>,
    pub processing_started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Admin who completed the order, when the admin path did
    pub processed_by: Option<Uuid>,
    /// Guard flag: set exactly once when stock is decremented on completion
    #[serde(skip_serializing)]
    pub stock_reduced: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single immutable line of an order
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderLine {
    pub id: i64,
    pub order_id: String,
    pub product_id: String,
    pub quantity: i32,
    /// Effective unit price at checkout time
    pub unit_price: i64,
    /// quantity * unit_price
    pub amount: i64,
    pub note: Option<String>,
}

/// Order line joined with its product for aggregation views
#[derive(Debug, Clone, FromRow)]
pub struct OrderLineWithProduct {
    pub order_id: String,
    pub product_id: String,
    pub product_name: Option<String>,
    pub product_images: Option<Vec<String>>,
    pub quantity: i32,
    pub unit_price: i64,
    pub amount: i64,
    pub note: Option<String>,
}

/// Line data computed at checkout, before persistence
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderLine {
    pub product_id: String,
    pub quantity: i32,
    pub unit_price: i64,
    pub amount: i64,
    pub note: Option<String>,
}

/// One requested line of a checkout (shared by single and cart checkout)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckoutLine {
    #[validate(length(min = 1, message = "Product id is required"))]
    pub product_id: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    pub note: Option<String>,
}

fn default_quantity() -> i32 {
    1
}

fn default_payment_method() -> String {
    "qris".to_string()
}

#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[validate(length(min = 1, message = "Product id is required"))]
    pub product_id: String,
    pub order_id: String,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutCartRequest {
    pub order_id: String,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
    #[validate(length(min = 1, message = "Cart is empty"))]
    pub cart_items: Vec<CheckoutLine>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order_id: String,
    pub amount: i64,
    pub fee: i64,
    pub total_payment: i64,
    pub payment_method: String,
    pub payment_number: String,
    pub expired_at: Option<DateTime<Utc>>,
}

/// Gateway webhook payload
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub order_id: String,
    #[serde(default)]
    pub amount: i64,
    pub status: String,
    #[serde(default)]
    pub payment_method: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckPaymentRequest {
    pub order_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SimulatePaymentBody {
    pub order_id: String,
    pub amount: i64,
}

/// Status snapshot returned by check-payment and transaction lookup
#[derive(Debug, Serialize)]
pub struct OrderStatusResponse {
    pub order_id: String,
    pub status: OrderStatus,
    pub amount: i64,
    pub payment_method: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Pending-payment details for the payment page
#[derive(Debug, Serialize)]
pub struct PaymentInfoResponse {
    pub order_id: String,
    pub status: OrderStatus,
    pub amount: i64,
    pub fee: i64,
    pub total_payment: i64,
    pub payment_method: Option<String>,
    pub payment_number: Option<String>,
    pub expired_at: Option<DateTime<Utc>>,
}

/// An order with its lines, for listing views
#[derive(Debug, Serialize)]
pub struct OrderSummary {
    pub order_id: String,
    pub status: OrderStatus,
    pub amount: i64,
    pub payment_method: Option<String>,
    pub processing_started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderLineView>,
}

#[derive(Debug, Serialize)]
pub struct OrderLineView {
    pub product_id: String,
    pub product_name: Option<String>,
    pub product_images: Vec<String>,
    pub quantity: i32,
    pub unit_price: i64,
    pub amount: i64,
    pub note: Option<String>,
}

impl From<OrderLineWithProduct> for OrderLineView {
    fn from(line: OrderLineWithProduct) -> Self {
        Self {
            product_id: line.product_id,
            product_name: line.product_name,
            product_images: line.product_images.unwrap_or_default(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            amount: line.amount,
            note: line.note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_round_trip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Completed,
            OrderStatus::Failed,
            OrderStatus::Expired,
        ] {
            assert_eq!(OrderStatus::from_str(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_order_status_unknown() {
        assert_eq!(OrderStatus::from_str("refunded"), None);
    }

    #[test]
    fn test_checkout_request_defaults() {
        let req: CheckoutRequest = serde_json::from_str(
            r#"{"product_id": "PROD_1", "order_id": "ORDER_12345"}"#,
        )
        .unwrap();
        assert_eq!(req.quantity, 1);
        assert_eq!(req.payment_method, "qris");
    }

    #[test]
    fn test_checkout_cart_request_rejects_empty_cart() {
        let req: CheckoutCartRequest = serde_json::from_str(
            r#"{"order_id": "ORDER_12345", "cart_items": []}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_checkout_cart_request_accepts_lines() {
        let req: CheckoutCartRequest = serde_json::from_str(
            r#"{
                "order_id": "ORDER_12345",
                "cart_items": [{"product_id": "PROD_1", "quantity": 2}]
            }"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.cart_items.len(), 1);
    }
}
