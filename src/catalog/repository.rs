use sqlx::PgPool;

use crate::catalog::models::{Product, ProductSummary};
use crate::error::ApiError;

const PRODUCT_COLUMNS: &str = "id, name, slug, price, description, detail_description, \
     images, stock, discount_percentage, discount_end_date, faqs, created_at, updated_at";

/// Repository for product reads and writes
#[derive(Clone)]
pub struct ProductsRepository {
    pool: PgPool,
}

impl ProductsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All products, newest first
    pub async fn list(&self) -> Result<Vec<Product>, ApiError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products ORDER BY created_at DESC",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Product>, ApiError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Fetch several products in one round trip, for cart and checkout checks
    pub async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Product>, ApiError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE id = ANY($1)",
            PRODUCT_COLUMNS
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    pub async fn slug_exists(&self, slug: &str, exclude_id: Option<&str>) -> Result<bool, ApiError> {
        let exists: Option<bool> = match exclude_id {
            Some(id) => {
                sqlx::query_scalar(
                    "SELECT EXISTS(SELECT 1 FROM products WHERE slug = $1 AND id != $2)",
                )
                .bind(slug)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE slug = $1)")
                    .bind(slug)
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(exists.unwrap_or(false))
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        id: &str,
        name: &str,
        slug: &str,
        price: i64,
        description: &str,
        detail_description: Option<&str>,
        images: &[String],
        stock: i32,
        discount_percentage: Option<i32>,
        discount_end_date: Option<chrono::DateTime<chrono::Utc>>,
        faqs: Option<&serde_json::Value>,
    ) -> Result<Product, ApiError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products
                (id, name, slug, price, description, detail_description, images,
                 stock, discount_percentage, discount_end_date, faqs)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .bind(name)
        .bind(slug)
        .bind(price)
        .bind(description)
        .bind(detail_description)
        .bind(images)
        .bind(stock)
        .bind(discount_percentage)
        .bind(discount_end_date)
        .bind(faqs)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    /// Partial update: omitted fields keep their current values.
    /// Runs inside a transaction so the existence check and write are atomic.
    pub async fn update(
        &self,
        id: &str,
        changes: crate::catalog::models::UpdateProduct,
    ) -> Result<Product, ApiError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Product".to_string(),
        })?;

        let updated = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = $1,
                slug = $2,
                price = $3,
                description = $4,
                detail_description = $5,
                images = $6,
                stock = $7,
                discount_percentage = $8,
                discount_end_date = $9,
                faqs = $10,
                updated_at = NOW()
            WHERE id = $11
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(changes.name.unwrap_or(existing.name))
        .bind(changes.slug.unwrap_or(existing.slug))
        .bind(changes.price.unwrap_or(existing.price))
        .bind(changes.description.unwrap_or(existing.description))
        .bind(changes.detail_description.or(existing.detail_description))
        .bind(changes.images.unwrap_or(existing.images))
        .bind(changes.stock.unwrap_or(existing.stock))
        .bind(changes.discount_percentage.or(existing.discount_percentage))
        .bind(changes.discount_end_date.or(existing.discount_end_date))
        .bind(changes.faqs.or(existing.faqs))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Products running low: more than zero but fewer than ten units
    pub async fn low_stock(&self) -> Result<Vec<ProductSummary>, ApiError> {
        let products = sqlx::query_as::<_, ProductSummary>(
            r#"
            SELECT id, name, slug, price, stock
            FROM products
            WHERE stock > 0 AND stock < 10
            ORDER BY stock ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }
}
