// HTTP handlers for checkout, webhook and order lifecycle endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::json;
use validator::Validate;

use crate::auth::{AuthUser, Role};
use crate::orders::models::{
    CheckPaymentRequest, CheckoutCartRequest, CheckoutLine, CheckoutRequest, CheckoutResponse,
    OrderStatusResponse, OrderSummary, PaymentInfoResponse, SimulatePaymentBody, WebhookPayload,
};
use crate::orders::service::{CompletionOutcome, OrderService};
use crate::orders::OrderError;

fn order_service(state: &crate::AppState) -> OrderService {
    OrderService::new(
        crate::orders::OrdersRepository::new(state.db.clone()),
        crate::catalog::ProductsRepository::new(state.db.clone()),
        state.payment.clone(),
    )
}

/// Handler for POST /api/checkout
/// Single-product checkout
pub async fn checkout_handler(
    State(state): State<crate::AppState>,
    user: AuthUser,
    Json(payload): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, OrderError> {
    payload.validate()?;

    let lines = vec![CheckoutLine {
        product_id: payload.product_id,
        quantity: payload.quantity,
        note: payload.note,
    }];

    let response = order_service(&state)
        .checkout(user.id, &payload.order_id, &payload.payment_method, &lines)
        .await?;

    Ok(Json(response))
}

/// Handler for POST /api/checkout-cart
/// Multi-line checkout from the client's cart snapshot
pub async fn checkout_cart_handler(
    State(state): State<crate::AppState>,
    user: AuthUser,
    Json(payload): Json<CheckoutCartRequest>,
) -> Result<Json<CheckoutResponse>, OrderError> {
    payload.validate()?;

    let response = order_service(&state)
        .checkout(
            user.id,
            &payload.order_id,
            &payload.payment_method,
            &payload.cart_items,
        )
        .await?;

    Ok(Json(response))
}

/// Handler for POST /api/webhook
///
/// Always acknowledges with `{"received": true}`. The gateway retries on
/// non-200 responses, so internal failures are logged and swallowed.
pub async fn webhook_handler(
    State(state): State<crate::AppState>,
    Json(payload): Json<WebhookPayload>,
) -> Json<serde_json::Value> {
    if let Err(e) = order_service(&state).handle_webhook(&payload).await {
        tracing::error!(
            "Webhook processing failed for order {}: {}",
            payload.order_id,
            e
        );
    }

    Json(json!({ "received": true }))
}

/// Handler for POST /api/check-payment
/// Polls the gateway and completes the order when it is paid
pub async fn check_payment_handler(
    State(state): State<crate::AppState>,
    Json(payload): Json<CheckPaymentRequest>,
) -> Result<Json<OrderStatusResponse>, OrderError> {
    let response = order_service(&state).check_payment(&payload.order_id).await?;
    Ok(Json(response))
}

/// Handler for GET /api/transaction/{order_id}
pub async fn transaction_status_handler(
    State(state): State<crate::AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderStatusResponse>, OrderError> {
    let response = order_service(&state).transaction_status(&order_id).await?;
    Ok(Json(response))
}

/// Handler for GET /api/payment-info/{order_id}
/// 400 once the payment has completed
pub async fn payment_info_handler(
    State(state): State<crate::AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<PaymentInfoResponse>, OrderError> {
    let response = order_service(&state).payment_info(&order_id).await?;
    Ok(Json(response))
}

/// Handler for POST /api/simulate-payment
/// Sandbox-only helper; a no-op in production mode
pub async fn simulate_payment_handler(
    State(state): State<crate::AppState>,
    Json(payload): Json<SimulatePaymentBody>,
) -> Result<Json<serde_json::Value>, OrderError> {
    order_service(&state)
        .simulate_payment(&payload.order_id, payload.amount)
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// Handler for GET /api/my-orders
pub async fn my_orders_handler(
    State(state): State<crate::AppState>,
    user: AuthUser,
) -> Result<Json<Vec<OrderSummary>>, OrderError> {
    let orders = order_service(&state).orders_for_user(user.id).await?;
    Ok(Json(orders))
}

/// Handler for GET /api/admin/transactions
pub async fn admin_transactions_handler(
    State(state): State<crate::AppState>,
    user: AuthUser,
) -> Result<Json<Vec<OrderSummary>>, OrderError> {
    user.require_role(&[Role::Admin, Role::Superadmin])?;

    let orders = order_service(&state).all_orders().await?;
    Ok(Json(orders))
}

/// Handler for GET /api/admin/orders-processing
/// Fulfillment queue, oldest first
pub async fn admin_processing_orders_handler(
    State(state): State<crate::AppState>,
    user: AuthUser,
) -> Result<Json<Vec<OrderSummary>>, OrderError> {
    user.require_role(&[Role::Admin, Role::Superadmin])?;

    let orders = order_service(&state).processing_orders().await?;
    Ok(Json(orders))
}

/// Handler for POST /api/admin/orders/{order_id}/complete
pub async fn admin_complete_order_handler(
    State(state): State<crate::AppState>,
    user: AuthUser,
    Path(order_id): Path<String>,
) -> Result<Json<serde_json::Value>, OrderError> {
    user.require_role(&[Role::Admin, Role::Superadmin])?;

    match order_service(&state)
        .complete_order(&order_id, Some(user.id))
        .await?
    {
        CompletionOutcome::Completed | CompletionOutcome::AlreadyCompleted => {
            Ok(Json(json!({ "success": true, "order_id": order_id })))
        }
        CompletionOutcome::NotReady(status) => Err(OrderError::AlreadyProcessed(format!(
            "Order {} is {} and cannot be completed",
            order_id, status
        ))),
    }
}
