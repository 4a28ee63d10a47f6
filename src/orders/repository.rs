use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::orders::error::OrderError;
use crate::orders::models::{NewOrderLine, Order, OrderLine, OrderLineWithProduct, OrderStatus};
use crate::payment::PaymentDetail;

const ORDER_COLUMNS: &str = "id, user_id, status, amount, payment_method, payment_number, \
     fee, total_payment, expired_at, processing_started_at, completed_at, processed_by, \
     stock_reduced, created_at, updated_at";

const LINE_COLUMNS: &str = "id, order_id, product_id, quantity, unit_price, amount, note";

/// Data access for order aggregates and their lines
///
/// Status transitions are expressed as conditional updates so that concurrent
/// callers race on the database row, not in application code. A caller learns
/// whether it won the transition from the affected row count.
#[derive(Clone)]
pub struct OrdersRepository {
    pool: PgPool,
}

impl OrdersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, order_id: &str) -> Result<Option<Order>, OrderError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE id = $1",
            ORDER_COLUMNS
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Insert an order with its lines in one transaction
    pub async fn create_with_lines(
        &self,
        order_id: &str,
        user_id: Uuid,
        amount: i64,
        payment: &PaymentDetail,
        lines: &[NewOrderLine],
    ) -> Result<Order, OrderError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (id, user_id, status, amount, payment_method, payment_number,
                                fee, total_payment, expired_at)
            VALUES ($1, $2, 'pending', $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(order_id)
        .bind(user_id)
        .bind(amount)
        .bind(&payment.payment_method)
        .bind(&payment.payment_number)
        .bind(payment.fee)
        .bind(payment.total_payment)
        .bind(payment.expired_at)
        .fetch_one(&mut *tx)
        .await?;

        for line in lines {
            sqlx::query(
                r#"
                INSERT INTO order_lines (order_id, product_id, quantity, unit_price, amount, note)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(order_id)
            .bind(&line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price)
            .bind(line.amount)
            .bind(&line.note)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(order)
    }

    /// Refresh payment metadata on a still-pending order (idempotent checkout
    /// retry). Lines are left untouched.
    pub async fn refresh_payment_meta(
        &self,
        order_id: &str,
        payment: &PaymentDetail,
    ) -> Result<u64, OrderError> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET payment_method = $1, payment_number = $2, fee = $3, total_payment = $4,
                expired_at = $5, updated_at = NOW()
            WHERE id = $6 AND status = 'pending'
            "#,
        )
        .bind(&payment.payment_method)
        .bind(&payment.payment_number)
        .bind(payment.fee)
        .bind(payment.total_payment)
        .bind(payment.expired_at)
        .bind(order_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Conditional transition `pending -> processing`. Returns the number of
    /// rows changed; zero means the order was not pending (replay or unknown).
    pub async fn mark_processing(
        &self,
        order_id: &str,
        payment_method: Option<&str>,
    ) -> Result<u64, OrderError> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = 'processing',
                processing_started_at = NOW(),
                payment_method = COALESCE($1, payment_method),
                updated_at = NOW()
            WHERE id = $2 AND status = 'pending'
            "#,
        )
        .bind(payment_method)
        .bind(order_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Conditional transition `pending -> failed | expired`
    pub async fn mark_closed_from_pending(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<u64, OrderError> {
        debug_assert!(matches!(
            status,
            OrderStatus::Failed | OrderStatus::Expired
        ));

        let result = sqlx::query(
            "UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2 AND status = 'pending'",
        )
        .bind(status)
        .bind(order_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Conditional transition `processing -> completed` plus the stock
    /// decrement, in one transaction. Only one caller gets the updated row
    /// back; everyone else sees `None`.
    ///
    /// The `stock_reduced` claim and the per-line decrements commit together
    /// with the transition, so a failure mid-decrement rolls the claim back
    /// and a retry can still perform it. Each decrement is a single
    /// `GREATEST(stock - qty, 0)` statement, so stock never goes negative.
    pub async fn complete(
        &self,
        order_id: &str,
        processed_by: Option<Uuid>,
    ) -> Result<Option<Order>, OrderError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders
            SET status = 'completed', completed_at = NOW(), processed_by = $1, updated_at = NOW()
            WHERE id = $2 AND status = 'processing'
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(processed_by)
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(order) = order else {
            tx.rollback().await?;
            return Ok(None);
        };

        let claimed = sqlx::query(
            "UPDATE orders SET stock_reduced = TRUE, updated_at = NOW() \
             WHERE id = $1 AND stock_reduced = FALSE",
        )
        .bind(order_id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        if claimed {
            let lines = sqlx::query_as::<_, OrderLine>(&format!(
                "SELECT {} FROM order_lines WHERE order_id = $1 ORDER BY id",
                LINE_COLUMNS
            ))
            .bind(order_id)
            .fetch_all(&mut *tx)
            .await?;

            for line in &lines {
                sqlx::query(
                    "UPDATE products SET stock = GREATEST(stock - $1, 0), updated_at = NOW() \
                     WHERE id = $2",
                )
                .bind(line.quantity)
                .bind(&line.product_id)
                .execute(&mut *tx)
                .await?;
            }

            tracing::debug!(
                "Order {} completion decrements stock for {} lines",
                order_id,
                lines.len()
            );
        }

        tx.commit().await?;

        Ok(Some(order))
    }

    /// Expire pending orders whose payment window has elapsed
    pub async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<u64, OrderError> {
        let result = sqlx::query(
            "UPDATE orders SET status = 'expired', updated_at = NOW() \
             WHERE status = 'pending' AND expired_at IS NOT NULL AND expired_at < $1",
        )
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Lines for a set of orders, joined with product name and images
    pub async fn lines_with_products(
        &self,
        order_ids: &[String],
    ) -> Result<Vec<OrderLineWithProduct>, OrderError> {
        let lines = sqlx::query_as::<_, OrderLineWithProduct>(
            r#"
            SELECT ol.order_id, ol.product_id, p.name AS product_name,
                   p.images AS product_images, ol.quantity, ol.unit_price, ol.amount, ol.note
            FROM order_lines ol
            LEFT JOIN products p ON p.id = ol.product_id
            WHERE ol.order_id = ANY($1)
            ORDER BY ol.order_id, ol.id
            "#,
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, OrderError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
            ORDER_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    pub async fn list_all(&self) -> Result<Vec<Order>, OrderError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders ORDER BY created_at DESC",
            ORDER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Processing orders oldest-first, for the fulfillment queue
    pub async fn list_processing(&self) -> Result<Vec<Order>, OrderError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE status = 'processing' \
             ORDER BY processing_started_at ASC NULLS LAST",
            ORDER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }
}
