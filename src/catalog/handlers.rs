// HTTP handlers for the product catalog: public reads plus admin CRUD

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::auth::{AuthUser, Role};
use crate::catalog::models::{slugify, CreateProduct, Product, UpdateProduct};
use crate::catalog::repository::ProductsRepository;
use crate::error::ApiError;

/// Handler for GET /api/products
pub async fn list_products_handler(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let repo = ProductsRepository::new(state.db.clone());
    let products = repo.list().await?;

    tracing::debug!("Retrieved {} products", products.len());
    Ok(Json(products))
}

/// Handler for GET /api/products/{id}
pub async fn get_product_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let repo = ProductsRepository::new(state.db.clone());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Product".to_string(),
        })?;

    Ok(Json(product))
}

/// Handler for POST /api/admin/products
/// Creates a new product (admin only)
pub async fn create_product_handler(
    State(state): State<crate::AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProduct>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    user.require_role(&[Role::Admin, Role::Superadmin])?;

    payload.validate()?;

    let repo = ProductsRepository::new(state.db.clone());

    let name = payload.name.trim().to_string();
    let slug = payload
        .slug
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| slugify(&name));

    if repo.slug_exists(&slug, None).await? {
        return Err(ApiError::Conflict(format!(
            "Product with slug '{}' already exists",
            slug
        )));
    }

    // Generated identifier mirrors the storefront's PROD_ convention
    let id = format!(
        "PROD_{}_{}",
        chrono::Utc::now().timestamp_millis(),
        &uuid::Uuid::new_v4().simple().to_string()[..9]
    );

    let product = repo
        .create(
            &id,
            &name,
            &slug,
            payload.price,
            payload.description.trim(),
            payload.detail_description.as_deref(),
            &payload.images,
            payload.stock,
            payload.discount_percentage,
            payload.discount_end_date,
            payload.faqs.as_ref(),
        )
        .await?;

    tracing::info!("Created product {} ({})", product.id, product.name);
    Ok((StatusCode::CREATED, Json(product)))
}

/// Handler for PUT /api/admin/products/{id}
pub async fn update_product_handler(
    State(state): State<crate::AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProduct>,
) -> Result<Json<Product>, ApiError> {
    user.require_role(&[Role::Admin, Role::Superadmin])?;

    payload.validate()?;

    let repo = ProductsRepository::new(state.db.clone());

    if let Some(ref slug) = payload.slug {
        if repo.slug_exists(slug, Some(&id)).await? {
            return Err(ApiError::Conflict(format!(
                "Product with slug '{}' already exists",
                slug
            )));
        }
    }

    let product = repo.update(&id, payload).await?;

    tracing::info!("Updated product {}", product.id);
    Ok(Json(product))
}

/// Handler for DELETE /api/admin/products/{id}
pub async fn delete_product_handler(
    State(state): State<crate::AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    user.require_role(&[Role::Admin, Role::Superadmin])?;

    let repo = ProductsRepository::new(state.db.clone());
    if !repo.delete(&id).await? {
        return Err(ApiError::NotFound {
            resource: "Product".to_string(),
        });
    }

    tracing::info!("Deleted product {}", id);
    Ok(StatusCode::NO_CONTENT)
}
