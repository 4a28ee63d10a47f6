use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Coupon discount type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Fixed => "fixed",
        }
    }
}

impl std::fmt::Display for DiscountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Domain model representing a coupon
///
/// Codes are unique case-insensitively and stored upper-case.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Coupon {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub min_purchase: i64,
    pub max_discount: Option<i64>,
    pub usage_limit: Option<i32>,
    pub usage_count: i32,
    pub valid_from: DateTime<Utc>,
    pub valid_until: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for creating a coupon
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCoupon {
    #[validate(length(min = 1, message = "Coupon code is required"))]
    pub code: String,
    #[validate(length(min = 1, message = "Coupon name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    #[validate(range(min = 1, message = "Discount value must be greater than 0"))]
    pub discount_value: i64,
    #[validate(range(min = 0, message = "Minimum purchase cannot be negative"))]
    #[serde(default)]
    pub min_purchase: i64,
    pub max_discount: Option<i64>,
    pub usage_limit: Option<i32>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
}

/// Request DTO for updating a coupon
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCoupon {
    #[validate(length(min = 1, message = "Coupon name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub discount_type: Option<DiscountType>,
    #[validate(range(min = 1, message = "Discount value must be greater than 0"))]
    pub discount_value: Option<i64>,
    #[validate(range(min = 0, message = "Minimum purchase cannot be negative"))]
    pub min_purchase: Option<i64>,
    pub max_discount: Option<i64>,
    pub usage_limit: Option<i32>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
}

/// Request DTO for applying a coupon at checkout
#[derive(Debug, Deserialize, Validate)]
pub struct ApplyCoupon {
    #[validate(length(min = 1, message = "Coupon code is required"))]
    pub code: String,
    #[validate(range(min = 1, message = "total_amount must be positive"))]
    pub total_amount: i64,
    /// Accepted for auditing; not part of validation
    pub user_id: Option<Uuid>,
}
