// Pure pricing rules over a product snapshot and the current time
// No hidden state: every function takes `now` explicitly

use chrono::{DateTime, Utc};

use crate::catalog::models::Product;

/// Whether the product currently has an active percentage discount
pub fn is_discount_active(product: &Product, now: DateTime<Utc>) -> bool {
    let percentage = match product.discount_percentage {
        Some(p) if p > 0 => p,
        _ => return false,
    };
    debug_assert!(percentage <= 100);

    match product.discount_end_date {
        Some(end_date) => now <= end_date,
        None => true,
    }
}

/// Effective price: the list price reduced by the discount percentage while
/// the discount window is open, otherwise the list price unchanged
pub fn discounted_price(product: &Product, now: DateTime<Utc>) -> i64 {
    if !is_discount_active(product, now) {
        return product.price;
    }

    let percentage = product.discount_percentage.unwrap_or(0) as i64;
    let discount = product.price * percentage / 100;
    product.price - discount
}

/// Absolute amount taken off the list price right now
pub fn discount_amount(product: &Product, now: DateTime<Utc>) -> i64 {
    product.price - discounted_price(product, now)
}

/// Whether the product has at least `quantity` units in stock
pub fn is_in_stock(product: &Product, quantity: i32) -> bool {
    product.stock >= quantity
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn product(price: i64, percentage: Option<i32>, end_in_hours: Option<i64>) -> Product {
        let now = Utc::now();
        Product {
            id: "PROD_TEST".to_string(),
            name: "Test".to_string(),
            slug: "test".to_string(),
            price,
            description: "desc".to_string(),
            detail_description: None,
            images: vec![],
            stock: 5,
            discount_percentage: percentage,
            discount_end_date: end_in_hours.map(|h| now + Duration::hours(h)),
            faqs: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_no_discount_returns_list_price() {
        let p = product(100_000, None, None);
        assert_eq!(discounted_price(&p, Utc::now()), 100_000);
        assert!(!is_discount_active(&p, Utc::now()));
    }

    #[test]
    fn test_zero_percentage_is_not_a_discount() {
        let p = product(100_000, Some(0), None);
        assert_eq!(discounted_price(&p, Utc::now()), 100_000);
        assert!(!is_discount_active(&p, Utc::now()));
    }

    #[test]
    fn test_active_discount_reduces_price() {
        let p = product(100_000, Some(25), Some(24));
        assert_eq!(discounted_price(&p, Utc::now()), 75_000);
        assert_eq!(discount_amount(&p, Utc::now()), 25_000);
    }

    #[test]
    fn test_expired_discount_restores_list_price() {
        let p = product(100_000, Some(25), Some(-1));
        assert_eq!(discounted_price(&p, Utc::now()), 100_000);
        assert!(!is_discount_active(&p, Utc::now()));
    }

    #[test]
    fn test_open_ended_discount_is_active() {
        let p = product(80_000, Some(10), None);
        assert!(is_discount_active(&p, Utc::now()));
        assert_eq!(discounted_price(&p, Utc::now()), 72_000);
    }

    #[test]
    fn test_is_in_stock() {
        let p = product(1_000, None, None);
        assert!(is_in_stock(&p, 5));
        assert!(!is_in_stock(&p, 6));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn product(price: i64, percentage: i32) -> Product {
        let now = Utc::now();
        Product {
            id: "PROD_PROP".to_string(),
            name: "Prop".to_string(),
            slug: "prop".to_string(),
            price,
            description: "desc".to_string(),
            detail_description: None,
            images: vec![],
            stock: 1,
            discount_percentage: if percentage == 0 { None } else { Some(percentage) },
            discount_end_date: None,
            faqs: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Effective price is always within [0, price] and equals the list price
    /// exactly when no discount is active
    #[test]
    fn prop_effective_price_bounds() {
        proptest!(|(price in 1i64..=100_000_000, percentage in 0i32..=100)| {
            let now = Utc::now();
            let p = product(price, percentage);
            let effective = discounted_price(&p, now);

            prop_assert!(effective >= 0);
            prop_assert!(effective <= price);
            if !is_discount_active(&p, now) {
                prop_assert_eq!(effective, price);
            }
        });
    }

    /// Discount amount plus effective price always reconstructs the list price
    #[test]
    fn prop_discount_amount_is_complement() {
        proptest!(|(price in 1i64..=100_000_000, percentage in 0i32..=100)| {
            let now = Utc::now();
            let p = product(price, percentage);
            prop_assert_eq!(
                discount_amount(&p, now) + discounted_price(&p, now),
                price
            );
        });
    }
}
