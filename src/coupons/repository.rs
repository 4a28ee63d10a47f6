use sqlx::PgPool;
use uuid::Uuid;

use crate::coupons::error::CouponError;
use crate::coupons::models::{Coupon, CreateCoupon, UpdateCoupon};

const COUPON_COLUMNS: &str = "id, code, name, description, discount_type, discount_value, \
     min_purchase, max_discount, usage_limit, usage_count, valid_from, valid_until, \
     is_active, created_at";

/// Repository for coupon rows
#[derive(Clone)]
pub struct CouponsRepository {
    pool: PgPool,
}

impl CouponsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Coupon>, CouponError> {
        let coupons = sqlx::query_as::<_, Coupon>(&format!(
            "SELECT {} FROM coupons ORDER BY created_at DESC",
            COUPON_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(coupons)
    }

    /// Lookup by code; codes are stored upper-case
    pub async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, CouponError> {
        let coupon = sqlx::query_as::<_, Coupon>(&format!(
            "SELECT {} FROM coupons WHERE code = $1",
            COUPON_COLUMNS
        ))
        .bind(code.to_uppercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(coupon)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Coupon>, CouponError> {
        let coupon = sqlx::query_as::<_, Coupon>(&format!(
            "SELECT {} FROM coupons WHERE id = $1",
            COUPON_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(coupon)
    }

    pub async fn create(&self, request: CreateCoupon) -> Result<Coupon, CouponError> {
        let coupon = sqlx::query_as::<_, Coupon>(&format!(
            r#"
            INSERT INTO coupons
                (code, name, description, discount_type, discount_value, min_purchase,
                 max_discount, usage_limit, valid_from, valid_until)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, NOW()), $10)
            RETURNING {}
            "#,
            COUPON_COLUMNS
        ))
        .bind(request.code.trim().to_uppercase())
        .bind(request.name.trim())
        .bind(request.description.as_deref())
        .bind(request.discount_type)
        .bind(request.discount_value)
        .bind(request.min_purchase)
        .bind(request.max_discount)
        .bind(request.usage_limit)
        .bind(request.valid_from)
        .bind(request.valid_until)
        .fetch_one(&self.pool)
        .await?;

        Ok(coupon)
    }

    /// Partial update inside a transaction, like the products repository
    pub async fn update(&self, id: Uuid, changes: UpdateCoupon) -> Result<Coupon, CouponError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, Coupon>(&format!(
            "SELECT {} FROM coupons WHERE id = $1",
            COUPON_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CouponError::NotFound)?;

        let updated = sqlx::query_as::<_, Coupon>(&format!(
            r#"
            UPDATE coupons
            SET name = $1,
                description = $2,
                discount_type = $3,
                discount_value = $4,
                min_purchase = $5,
                max_discount = $6,
                usage_limit = $7,
                valid_from = $8,
                valid_until = $9
            WHERE id = $10
            RETURNING {}
            "#,
            COUPON_COLUMNS
        ))
        .bind(changes.name.unwrap_or(existing.name))
        .bind(changes.description.or(existing.description))
        .bind(changes.discount_type.unwrap_or(existing.discount_type))
        .bind(changes.discount_value.unwrap_or(existing.discount_value))
        .bind(changes.min_purchase.unwrap_or(existing.min_purchase))
        .bind(changes.max_discount.or(existing.max_discount))
        .bind(changes.usage_limit.or(existing.usage_limit))
        .bind(changes.valid_from.unwrap_or(existing.valid_from))
        .bind(changes.valid_until.or(existing.valid_until))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, CouponError> {
        let result = sqlx::query("DELETE FROM coupons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Flip the active flag
    pub async fn toggle_active(&self, id: Uuid) -> Result<Coupon, CouponError> {
        let coupon = sqlx::query_as::<_, Coupon>(&format!(
            r#"
            UPDATE coupons
            SET is_active = NOT is_active
            WHERE id = $1
            RETURNING {}
            "#,
            COUPON_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CouponError::NotFound)?;

        Ok(coupon)
    }

    /// Count a redemption against the usage limit. The increment is
    /// conditional on the limit in one UPDATE, so concurrent redemptions
    /// race on the row and the loser gets `false`.
    pub async fn record_usage(&self, code: &str) -> Result<bool, CouponError> {
        let result = sqlx::query(
            "UPDATE coupons SET usage_count = usage_count + 1 \
             WHERE code = $1 AND (usage_limit IS NULL OR usage_count < usage_limit)",
        )
        .bind(code.to_uppercase())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
