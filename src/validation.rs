// Validation utilities module
// Custom validation functions for domain-specific rules, used with the
// validator derive and called directly from service code

use regex::Regex;
use std::sync::OnceLock;
use validator::ValidationError;

fn order_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_-]{5,100}$").unwrap())
}

/// Validates an order identifier: 5-100 alphanumeric, underscore or dash
pub fn validate_order_id(order_id: &str) -> Result<(), ValidationError> {
    if order_id_regex().is_match(order_id) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_order_id"))
    }
}

/// Validates that a price is a positive amount in the smallest currency unit
pub fn validate_positive_price(price: i64) -> Result<(), ValidationError> {
    // Upper bound rejects obviously corrupt amounts
    if price <= 0 || price > 100_000_000 {
        Err(ValidationError::new("price_out_of_range"))
    } else {
        Ok(())
    }
}

/// Validates that a discount percentage is within 0..=100
pub fn validate_discount_percentage(percentage: i32) -> Result<(), ValidationError> {
    if (0..=100).contains(&percentage) {
        Ok(())
    } else {
        Err(ValidationError::new("discount_percentage_out_of_range"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_accepts_safe_chars() {
        assert!(validate_order_id("ORDER_2024-abc123").is_ok());
        assert!(validate_order_id("abcde").is_ok());
    }

    #[test]
    fn test_order_id_rejects_short_and_unsafe() {
        assert!(validate_order_id("abcd").is_err());
        assert!(validate_order_id("order id with spaces").is_err());
        assert!(validate_order_id("order;drop").is_err());
        assert!(validate_order_id(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_positive_price_bounds() {
        assert!(validate_positive_price(1).is_ok());
        assert!(validate_positive_price(100_000_000).is_ok());
        assert!(validate_positive_price(0).is_err());
        assert!(validate_positive_price(-5).is_err());
        assert!(validate_positive_price(100_000_001).is_err());
    }

    #[test]
    fn test_discount_percentage_bounds() {
        assert!(validate_discount_percentage(0).is_ok());
        assert!(validate_discount_percentage(100).is_ok());
        assert!(validate_discount_percentage(101).is_err());
        assert!(validate_discount_percentage(-1).is_err());
    }
}
