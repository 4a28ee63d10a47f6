// HTTP handlers for cart endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::cart::models::{AddCartItem, CartItem, CartItemView, UpdateCartNote, UpdateCartQuantity};
use crate::cart::service::CartService;
use crate::cart::CartError;

fn cart_service(state: &crate::AppState) -> CartService {
    CartService::new(
        crate::cart::CartRepository::new(state.db.clone()),
        crate::catalog::ProductsRepository::new(state.db.clone()),
    )
}

/// Query parameters identifying the cart owner
#[derive(Debug, Deserialize)]
pub struct CartOwnerQuery {
    pub user_id: Uuid,
}

/// Handler for GET /api/cart?user_id=
pub async fn list_cart_handler(
    State(state): State<crate::AppState>,
    Query(query): Query<CartOwnerQuery>,
) -> Result<Json<Vec<CartItemView>>, CartError> {
    let items = cart_service(&state).list(query.user_id).await?;
    Ok(Json(items))
}

/// Handler for POST /api/cart
/// Adds a product to the cart, merging with an existing row
pub async fn add_cart_item_handler(
    State(state): State<crate::AppState>,
    Json(payload): Json<AddCartItem>,
) -> Result<Json<CartItem>, CartError> {
    payload
        .validate()
        .map_err(|e| CartError::ValidationError(e.to_string()))?;

    let item = cart_service(&state)
        .add_item(payload.user_id, &payload.product_id, payload.quantity)
        .await?;

    tracing::debug!(
        "Cart item {} now at quantity {} for user {}",
        item.id,
        item.quantity,
        item.user_id
    );
    Ok(Json(item))
}

/// Handler for PUT /api/cart/{id}
pub async fn update_cart_quantity_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCartQuantity>,
) -> Result<Json<CartItem>, CartError> {
    payload
        .validate()
        .map_err(|e| CartError::ValidationError(e.to_string()))?;

    let item = cart_service(&state)
        .update_quantity(id, payload.quantity)
        .await?;

    Ok(Json(item))
}

/// Handler for PUT /api/cart/{id}/note
pub async fn update_cart_note_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCartNote>,
) -> Result<Json<serde_json::Value>, CartError> {
    cart_service(&state)
        .update_note(id, payload.note.as_deref())
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// Handler for DELETE /api/cart/{id}
pub async fn remove_cart_item_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, CartError> {
    cart_service(&state).remove_item(id).await?;
    Ok(Json(json!({ "success": true })))
}

/// Handler for DELETE /api/cart/clear?user_id=
pub async fn clear_cart_handler(
    State(state): State<crate::AppState>,
    Query(query): Query<CartOwnerQuery>,
) -> Result<Json<serde_json::Value>, CartError> {
    let removed = cart_service(&state).clear(query.user_id).await?;
    tracing::debug!("Cleared {} cart rows for user {}", removed, query.user_id);
    Ok(Json(json!({ "success": true })))
}
