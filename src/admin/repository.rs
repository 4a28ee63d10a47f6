use sqlx::PgPool;

use crate::admin::models::AdminStats;
use crate::error::ApiError;

/// Aggregate queries for the admin dashboard
#[derive(Clone)]
pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One-shot dashboard counters
    pub async fn dashboard_stats(&self) -> Result<AdminStats, ApiError> {
        let stats = sqlx::query_as::<_, AdminStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM products) AS total_products,
                (SELECT COUNT(*) FROM orders) AS total_orders,
                (SELECT COUNT(*) FROM orders WHERE status = 'completed') AS completed_orders,
                (SELECT COUNT(*) FROM orders WHERE status = 'pending') AS pending_orders,
                (SELECT COALESCE(SUM(amount), 0) FROM orders WHERE status = 'completed')
                    AS total_revenue
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}
