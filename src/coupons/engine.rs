// Coupon validation and discount calculation
// Pure functions over a coupon snapshot, a purchase total and the current time

use chrono::{DateTime, Utc};

use crate::coupons::models::{Coupon, DiscountType};

/// Reasons a coupon cannot be applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CouponRejection {
    Inactive,
    NotYetValid,
    Expired,
    MinPurchaseNotMet(i64),
    UsageLimitReached,
}

impl std::fmt::Display for CouponRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CouponRejection::Inactive => write!(f, "Coupon is not active"),
            CouponRejection::NotYetValid => write!(f, "Coupon is not yet valid"),
            CouponRejection::Expired => write!(f, "Coupon has expired"),
            CouponRejection::MinPurchaseNotMet(min) => {
                write!(f, "Minimum purchase of {} required", min)
            }
            CouponRejection::UsageLimitReached => {
                write!(f, "Coupon has reached its usage limit")
            }
        }
    }
}

/// Check whether a coupon can be applied to a purchase of `total_amount`
///
/// Checks run in order: active flag, validity window, minimum purchase,
/// usage limit. The first failure wins.
pub fn validate(
    coupon: &Coupon,
    total_amount: i64,
    now: DateTime<Utc>,
) -> Result<(), CouponRejection> {
    if !coupon.is_active {
        return Err(CouponRejection::Inactive);
    }

    if now < coupon.valid_from {
        return Err(CouponRejection::NotYetValid);
    }

    if let Some(valid_until) = coupon.valid_until {
        if now > valid_until {
            return Err(CouponRejection::Expired);
        }
    }

    if total_amount < coupon.min_purchase {
        return Err(CouponRejection::MinPurchaseNotMet(coupon.min_purchase));
    }

    if let Some(limit) = coupon.usage_limit {
        if coupon.usage_count >= limit {
            return Err(CouponRejection::UsageLimitReached);
        }
    }

    Ok(())
}

/// Discount amount for a purchase of `total_amount`
///
/// Fixed coupons discount their value, capped at the total. Percentage
/// coupons discount `floor(total * value / 100)`, capped by `max_discount`
/// when present. The result is always within `0..=total_amount`.
pub fn calculate_discount(coupon: &Coupon, total_amount: i64) -> i64 {
    let discount = match coupon.discount_type {
        DiscountType::Fixed => coupon.discount_value.min(total_amount),
        DiscountType::Percentage => {
            let mut discount = total_amount * coupon.discount_value / 100;
            if let Some(max) = coupon.max_discount {
                discount = discount.min(max);
            }
            discount
        }
    };

    discount.clamp(0, total_amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn coupon(discount_type: DiscountType, value: i64) -> Coupon {
        let now = Utc::now();
        Coupon {
            id: Uuid::new_v4(),
            code: "TEST".to_string(),
            name: "Test coupon".to_string(),
            description: None,
            discount_type,
            discount_value: value,
            min_purchase: 0,
            max_discount: None,
            usage_limit: None,
            usage_count: 0,
            valid_from: now - Duration::days(1),
            valid_until: None,
            is_active: true,
            created_at: now,
        }
    }

    #[test]
    fn test_save10_scenario() {
        // SAVE10: percentage 10, min purchase 50_000, no cap
        let mut c = coupon(DiscountType::Percentage, 10);
        c.code = "SAVE10".to_string();
        c.min_purchase = 50_000;

        assert!(validate(&c, 100_000, Utc::now()).is_ok());
        let discount = calculate_discount(&c, 100_000);
        assert_eq!(discount, 10_000);
        assert_eq!(100_000 - discount, 90_000);
    }

    #[test]
    fn test_flat20k_scenario() {
        // FLAT20K: fixed 20_000 applied to a 15_000 purchase caps at the total
        let mut c = coupon(DiscountType::Fixed, 20_000);
        c.code = "FLAT20K".to_string();

        let discount = calculate_discount(&c, 15_000);
        assert_eq!(discount, 15_000);
        assert_eq!(15_000 - discount, 0);
    }

    #[test]
    fn test_percentage_respects_max_discount() {
        let mut c = coupon(DiscountType::Percentage, 50);
        c.max_discount = Some(30_000);

        assert_eq!(calculate_discount(&c, 100_000), 30_000);
        assert_eq!(calculate_discount(&c, 40_000), 20_000);
    }

    #[test]
    fn test_percentage_floors() {
        let c = coupon(DiscountType::Percentage, 3);
        // 3% of 999 = 29.97, floored
        assert_eq!(calculate_discount(&c, 999), 29);
    }

    #[test]
    fn test_inactive_rejected() {
        let mut c = coupon(DiscountType::Fixed, 1_000);
        c.is_active = false;
        assert_eq!(
            validate(&c, 10_000, Utc::now()),
            Err(CouponRejection::Inactive)
        );
    }

    #[test]
    fn test_not_yet_valid_rejected() {
        let mut c = coupon(DiscountType::Fixed, 1_000);
        c.valid_from = Utc::now() + Duration::days(1);
        assert_eq!(
            validate(&c, 10_000, Utc::now()),
            Err(CouponRejection::NotYetValid)
        );
    }

    #[test]
    fn test_expired_rejected() {
        let mut c = coupon(DiscountType::Fixed, 1_000);
        c.valid_until = Some(Utc::now() - Duration::hours(1));
        assert_eq!(
            validate(&c, 10_000, Utc::now()),
            Err(CouponRejection::Expired)
        );
    }

    #[test]
    fn test_min_purchase_rejected() {
        let mut c = coupon(DiscountType::Fixed, 1_000);
        c.min_purchase = 50_000;
        assert_eq!(
            validate(&c, 49_999, Utc::now()),
            Err(CouponRejection::MinPurchaseNotMet(50_000))
        );
        assert!(validate(&c, 50_000, Utc::now()).is_ok());
    }

    #[test]
    fn test_usage_limit_rejected() {
        let mut c = coupon(DiscountType::Fixed, 1_000);
        c.usage_limit = Some(100);
        c.usage_count = 100;
        assert_eq!(
            validate(&c, 10_000, Utc::now()),
            Err(CouponRejection::UsageLimitReached)
        );

        c.usage_count = 99;
        assert!(validate(&c, 10_000, Utc::now()).is_ok());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn coupon(
        discount_type: DiscountType,
        value: i64,
        max_discount: Option<i64>,
    ) -> Coupon {
        let now = Utc::now();
        Coupon {
            id: Uuid::new_v4(),
            code: "PROP".to_string(),
            name: "Prop coupon".to_string(),
            description: None,
            discount_type,
            discount_value: value,
            min_purchase: 0,
            max_discount,
            usage_limit: None,
            usage_count: 0,
            valid_from: now - Duration::days(1),
            valid_until: None,
            is_active: true,
            created_at: now,
        }
    }

    /// The discount never exceeds the purchase total and is never negative
    #[test]
    fn prop_discount_within_bounds() {
        proptest!(|(
            total in 1i64..=100_000_000,
            value in 1i64..=1_000_000,
            fixed in proptest::bool::ANY
        )| {
            let discount_type = if fixed {
                DiscountType::Fixed
            } else {
                DiscountType::Percentage
            };
            let value = if fixed { value } else { value % 100 + 1 };
            let c = coupon(discount_type, value, None);

            let discount = calculate_discount(&c, total);
            prop_assert!(discount >= 0);
            prop_assert!(discount <= total);
        });
    }

    /// Percentage coupons never exceed their max_discount cap
    #[test]
    fn prop_percentage_respects_cap() {
        proptest!(|(
            total in 1i64..=100_000_000,
            value in 1i64..=100,
            cap in 1i64..=10_000_000
        )| {
            let c = coupon(DiscountType::Percentage, value, Some(cap));
            let discount = calculate_discount(&c, total);
            prop_assert!(discount <= cap);
            prop_assert!(discount <= total);
        });
    }
}
