use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::catalog::models::Product;

/// Domain model representing a cart row
///
/// One row per (user, product): adding an already-present product increments
/// the quantity instead of duplicating the row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CartItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: String,
    pub quantity: i32,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Cart item joined with its product snapshot, as returned to clients
#[derive(Debug, Serialize)]
pub struct CartItemView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: String,
    pub quantity: i32,
    pub note: Option<String>,
    pub product: Option<Product>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for adding an item to the cart
#[derive(Debug, Deserialize, Validate)]
pub struct AddCartItem {
    pub user_id: Uuid,
    #[validate(length(min = 1, message = "product_id is required"))]
    pub product_id: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

/// Request DTO for changing a cart item's quantity
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCartQuantity {
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

/// Request DTO for setting a cart item's note
#[derive(Debug, Deserialize)]
pub struct UpdateCartNote {
    pub note: Option<String>,
}
