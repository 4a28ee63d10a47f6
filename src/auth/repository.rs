use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::error::AuthError;
use crate::auth::models::Role;

/// Repository for the user_roles table
#[derive(Clone)]
pub struct RolesRepository {
    pool: PgPool,
}

impl RolesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the role for a user; users without a row default to `user`
    pub async fn find_role(&self, user_id: Uuid) -> Result<Role, AuthError> {
        let role: Option<Role> =
            sqlx::query_scalar("SELECT role FROM user_roles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(role.unwrap_or_default())
    }

    /// Insert or update the role for a user
    pub async fn upsert_role(&self, user_id: Uuid, role: Role) -> Result<(), AuthError> {
        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET role = EXCLUDED.role
            "#,
        )
        .bind(user_id)
        .bind(role)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All role assignments, for joining against the provider's user list
    pub async fn list_roles(&self) -> Result<Vec<(Uuid, Role)>, AuthError> {
        let rows: Vec<(Uuid, Role)> =
            sqlx::query_as("SELECT user_id, role FROM user_roles")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows)
    }

    /// Remove the role row for a user (when the user is deleted upstream)
    pub async fn delete_role(&self, user_id: Uuid) -> Result<(), AuthError> {
        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
