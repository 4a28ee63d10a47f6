use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Domain model representing a product in the database
///
/// Prices are integers in the smallest currency unit; discounts are expressed
/// as a percentage with an optional end date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub price: i64,
    pub description: String,
    pub detail_description: Option<String>,
    pub images: Vec<String>,
    pub stock: i32,
    pub discount_percentage: Option<i32>,
    pub discount_end_date: Option<DateTime<Utc>>,
    pub faqs: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reduced product shape for listings
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub price: i64,
    pub stock: i32,
}

/// Request DTO for creating a product
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub name: String,
    /// Generated from the name when omitted
    pub slug: Option<String>,
    #[validate(custom = "crate::validation::validate_positive_price")]
    pub price: i64,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub detail_description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    #[serde(default)]
    pub stock: i32,
    #[validate(custom = "crate::validation::validate_discount_percentage")]
    pub discount_percentage: Option<i32>,
    pub discount_end_date: Option<DateTime<Utc>>,
    pub faqs: Option<serde_json::Value>,
}

/// Request DTO for partially updating a product
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProduct {
    #[validate(length(min = 1, message = "Product name cannot be empty"))]
    pub name: Option<String>,
    pub slug: Option<String>,
    #[validate(custom = "crate::validation::validate_positive_price")]
    pub price: Option<i64>,
    pub description: Option<String>,
    pub detail_description: Option<String>,
    pub images: Option<Vec<String>>,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i32>,
    #[validate(custom = "crate::validation::validate_discount_percentage")]
    pub discount_percentage: Option<i32>,
    pub discount_end_date: Option<DateTime<Utc>>,
    pub faqs: Option<serde_json::Value>,
}

/// Derive a URL-safe slug from a product name
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Kopi Arabika Premium"), "kopi-arabika-premium");
    }

    #[test]
    fn test_slugify_collapses_symbols() {
        assert_eq!(slugify("Bundle: 2x Mug + Sticker!"), "bundle-2x-mug-sticker");
    }

    #[test]
    fn test_slugify_trims_trailing_separator() {
        assert_eq!(slugify("Sale!!!"), "sale");
    }
}
