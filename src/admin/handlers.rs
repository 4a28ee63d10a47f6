// HTTP handlers for the admin back-office
// The users surface talks to the hosted identity provider for the account
// itself and to the local user_roles table for authorization.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::admin::models::{ChangeRole, CreateUser};
use crate::admin::repository::StatsRepository;
use crate::admin::AdminStats;
use crate::auth::{AuthError, AuthUser, Role, RolesRepository, UserView};
use crate::catalog::{ProductSummary, ProductsRepository};
use crate::error::ApiError;

/// Handler for GET /api/admin/stats
pub async fn stats_handler(
    State(state): State<crate::AppState>,
    user: AuthUser,
) -> Result<Json<AdminStats>, ApiError> {
    user.require_role(&[Role::Admin, Role::Superadmin])?;

    let stats = StatsRepository::new(state.db.clone())
        .dashboard_stats()
        .await?;

    Ok(Json(stats))
}

/// Handler for GET /api/admin/low-stock
/// Products running out, lowest stock first
pub async fn low_stock_handler(
    State(state): State<crate::AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ProductSummary>>, ApiError> {
    user.require_role(&[Role::Superadmin])?;

    let products = ProductsRepository::new(state.db.clone()).low_stock().await?;
    Ok(Json(products))
}

/// Handler for GET /api/admin/users
/// Provider accounts joined with local roles; superadmins are not listed
pub async fn list_users_handler(
    State(state): State<crate::AppState>,
    user: AuthUser,
) -> Result<Json<Vec<UserView>>, AuthError> {
    user.require_role(&[Role::Superadmin])?;

    let provider_users = state.identity.list_users().await?;
    let roles: HashMap<Uuid, Role> = RolesRepository::new(state.db.clone())
        .list_roles()
        .await?
        .into_iter()
        .collect();

    let users = provider_users
        .into_iter()
        .filter_map(|u| {
            let role = roles.get(&u.id).copied().unwrap_or_default();
            if role == Role::Superadmin {
                return None;
            }
            Some(UserView {
                id: u.id,
                email: u.email,
                role,
                created_at: u.created_at,
                last_sign_in_at: u.last_sign_in_at,
                confirmed_at: u.confirmed_at,
            })
        })
        .collect();

    Ok(Json(users))
}

/// Handler for POST /api/admin/users
/// Creates the provider account, then assigns the role. The provider account
/// is deleted again if the role assignment fails.
pub async fn create_user_handler(
    State(state): State<crate::AppState>,
    user: AuthUser,
    Json(payload): Json<CreateUser>,
) -> Result<Json<UserView>, AuthError> {
    user.require_role(&[Role::Superadmin])?;

    payload
        .validate()
        .map_err(|e| AuthError::ValidationError(e.to_string()))?;

    if payload.role == Role::Superadmin {
        return Err(AuthError::Forbidden(
            "Cannot create superadmin accounts".to_string(),
        ));
    }

    let created = state
        .identity
        .create_user(&payload.email, &payload.password)
        .await?;

    let roles = RolesRepository::new(state.db.clone());
    if let Err(e) = roles.upsert_role(created.id, payload.role).await {
        tracing::error!(
            "Role assignment failed for new user {}; rolling back provider account: {}",
            created.id,
            e
        );
        if let Err(del) = state.identity.delete_user(created.id).await {
            tracing::error!("Rollback delete failed for user {}: {}", created.id, del);
        }
        return Err(e);
    }

    tracing::info!("Created user {} with role {}", created.id, payload.role);

    Ok(Json(UserView {
        id: created.id,
        email: created.email,
        role: payload.role,
        created_at: created.created_at,
        last_sign_in_at: created.last_sign_in_at,
        confirmed_at: created.confirmed_at,
    }))
}

/// Handler for PUT /api/admin/users/{user_id}/role
/// A superadmin's role can never be changed through this surface
pub async fn change_role_handler(
    State(state): State<crate::AppState>,
    user: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<ChangeRole>,
) -> Result<Json<serde_json::Value>, AuthError> {
    user.require_role(&[Role::Superadmin])?;

    let roles = RolesRepository::new(state.db.clone());
    let current = roles.find_role(user_id).await?;
    if current == Role::Superadmin {
        return Err(AuthError::Forbidden(
            "Cannot change a superadmin's role".to_string(),
        ));
    }
    if payload.role == Role::Superadmin {
        return Err(AuthError::Forbidden(
            "Cannot promote to superadmin".to_string(),
        ));
    }

    roles.upsert_role(user_id, payload.role).await?;

    tracing::info!("Changed role of user {} to {}", user_id, payload.role);
    Ok(Json(json!({ "success": true })))
}

/// Handler for DELETE /api/admin/users/{user_id}
pub async fn delete_user_handler(
    State(state): State<crate::AppState>,
    user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AuthError> {
    user.require_role(&[Role::Superadmin])?;

    let roles = RolesRepository::new(state.db.clone());
    if roles.find_role(user_id).await? == Role::Superadmin {
        return Err(AuthError::Forbidden(
            "Cannot delete a superadmin".to_string(),
        ));
    }

    state.identity.delete_user(user_id).await?;
    roles.delete_role(user_id).await?;

    tracing::info!("Deleted user {}", user_id);
    Ok(Json(json!({ "success": true })))
}
