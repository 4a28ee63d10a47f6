// HTTP handlers for coupon endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{AuthUser, Role};
use crate::coupons::engine::{self, CouponRejection};
use crate::coupons::error::CouponError;
use crate::coupons::models::{ApplyCoupon, Coupon, CreateCoupon, DiscountType, UpdateCoupon};
use crate::coupons::repository::CouponsRepository;

/// Response for a successfully applied coupon
#[derive(Debug, Serialize)]
pub struct ApplyCouponResponse {
    pub coupon: Coupon,
    pub discount_amount: i64,
    pub final_amount: i64,
    pub message: String,
}

/// Handler for POST /api/coupons/apply
/// Validates a coupon against a purchase total and returns the discount
pub async fn apply_coupon_handler(
    State(state): State<crate::AppState>,
    Json(payload): Json<ApplyCoupon>,
) -> Result<Json<ApplyCouponResponse>, CouponError> {
    payload
        .validate()
        .map_err(|e| CouponError::ValidationError(e.to_string()))?;

    let repo = CouponsRepository::new(state.db.clone());
    let coupon = repo
        .find_by_code(&payload.code)
        .await?
        .ok_or(CouponError::NotFound)?;

    engine::validate(&coupon, payload.total_amount, Utc::now())
        .map_err(CouponError::Rejected)?;

    let discount_amount = engine::calculate_discount(&coupon, payload.total_amount);
    let final_amount = payload.total_amount - discount_amount;

    // The conditional increment is the authoritative limit check; a
    // concurrent redemption can exhaust the limit after the validation above
    if !repo.record_usage(&coupon.code).await? {
        return Err(CouponError::Rejected(CouponRejection::UsageLimitReached));
    }

    tracing::debug!(
        "Coupon {} applied: total={}, discount={}",
        coupon.code,
        payload.total_amount,
        discount_amount
    );

    Ok(Json(ApplyCouponResponse {
        coupon,
        discount_amount,
        final_amount,
        message: "Coupon applied".to_string(),
    }))
}

/// Handler for GET /api/admin/coupons
pub async fn list_coupons_handler(
    State(state): State<crate::AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Coupon>>, CouponError> {
    user.require_role(&[Role::Superadmin])?;

    let coupons = CouponsRepository::new(state.db.clone()).list().await?;
    Ok(Json(coupons))
}

/// Handler for POST /api/admin/coupons
pub async fn create_coupon_handler(
    State(state): State<crate::AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCoupon>,
) -> Result<(StatusCode, Json<Coupon>), CouponError> {
    user.require_role(&[Role::Superadmin])?;

    payload
        .validate()
        .map_err(|e| CouponError::ValidationError(e.to_string()))?;

    if payload.discount_type == DiscountType::Percentage && payload.discount_value > 100 {
        return Err(CouponError::ValidationError(
            "Percentage discount cannot exceed 100".to_string(),
        ));
    }

    let repo = CouponsRepository::new(state.db.clone());

    if repo.find_by_code(&payload.code).await?.is_some() {
        return Err(CouponError::DuplicateCode);
    }

    let coupon = repo.create(payload).await?;

    tracing::info!("Created coupon {}", coupon.code);
    Ok((StatusCode::CREATED, Json(coupon)))
}

/// Handler for PUT /api/admin/coupons/{id}
pub async fn update_coupon_handler(
    State(state): State<crate::AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCoupon>,
) -> Result<Json<Coupon>, CouponError> {
    user.require_role(&[Role::Superadmin])?;

    payload
        .validate()
        .map_err(|e| CouponError::ValidationError(e.to_string()))?;

    let coupon = CouponsRepository::new(state.db.clone())
        .update(id, payload)
        .await?;

    Ok(Json(coupon))
}

/// Handler for DELETE /api/admin/coupons/{id}
pub async fn delete_coupon_handler(
    State(state): State<crate::AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, CouponError> {
    user.require_role(&[Role::Superadmin])?;

    if !CouponsRepository::new(state.db.clone()).delete(id).await? {
        return Err(CouponError::NotFound);
    }

    Ok(Json(json!({ "success": true })))
}

/// Handler for PUT /api/admin/coupons/{id}/toggle
pub async fn toggle_coupon_handler(
    State(state): State<crate::AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Coupon>, CouponError> {
    user.require_role(&[Role::Superadmin])?;

    let coupon = CouponsRepository::new(state.db.clone())
        .toggle_active(id)
        .await?;

    tracing::info!(
        "Coupon {} is now {}",
        coupon.code,
        if coupon.is_active { "active" } else { "inactive" }
    );
    Ok(Json(coupon))
}
