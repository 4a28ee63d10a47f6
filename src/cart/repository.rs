use sqlx::PgPool;
use uuid::Uuid;

use crate::cart::error::CartError;
use crate::cart::models::CartItem;

const CART_COLUMNS: &str = "id, user_id, product_id, quantity, note, created_at, updated_at";

/// Repository for cart rows
#[derive(Clone)]
pub struct CartRepository {
    pool: PgPool,
}

impl CartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All cart rows for a user, newest first
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<CartItem>, CartError> {
        let items = sqlx::query_as::<_, CartItem>(&format!(
            "SELECT {} FROM carts WHERE user_id = $1 ORDER BY created_at DESC",
            CART_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CartItem>, CartError> {
        let item = sqlx::query_as::<_, CartItem>(&format!(
            "SELECT {} FROM carts WHERE id = $1",
            CART_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// The existing row for a (user, product) pair, if any
    pub async fn find_by_user_and_product(
        &self,
        user_id: Uuid,
        product_id: &str,
    ) -> Result<Option<CartItem>, CartError> {
        let item = sqlx::query_as::<_, CartItem>(&format!(
            "SELECT {} FROM carts WHERE user_id = $1 AND product_id = $2",
            CART_COLUMNS
        ))
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn insert(
        &self,
        user_id: Uuid,
        product_id: &str,
        quantity: i32,
    ) -> Result<CartItem, CartError> {
        let item = sqlx::query_as::<_, CartItem>(&format!(
            r#"
            INSERT INTO carts (user_id, product_id, quantity)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            CART_COLUMNS
        ))
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn update_quantity(&self, id: Uuid, quantity: i32) -> Result<CartItem, CartError> {
        let item = sqlx::query_as::<_, CartItem>(&format!(
            r#"
            UPDATE carts
            SET quantity = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {}
            "#,
            CART_COLUMNS
        ))
        .bind(quantity)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CartError::NotFound)?;

        Ok(item)
    }

    /// Set or clear the free-text note on a cart row
    pub async fn update_note(&self, id: Uuid, note: Option<&str>) -> Result<(), CartError> {
        let result = sqlx::query("UPDATE carts SET note = $1, updated_at = NOW() WHERE id = $2")
            .bind(note)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CartError::NotFound);
        }

        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, CartError> {
        let result = sqlx::query("DELETE FROM carts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove every cart row for a user (checkout clearing or explicit clear)
    pub async fn clear(&self, user_id: Uuid) -> Result<u64, CartError> {
        let result = sqlx::query("DELETE FROM carts WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
