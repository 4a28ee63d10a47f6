use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::catalog::models::Product;
use crate::catalog::pricing;
use crate::catalog::repository::ProductsRepository;
use crate::orders::error::OrderError;
use crate::orders::models::{
    CheckoutLine, CheckoutResponse, NewOrderLine, Order, OrderLineView, OrderStatus,
    OrderStatusResponse, OrderSummary, PaymentInfoResponse, WebhookPayload,
};
use crate::orders::repository::OrdersRepository;
use crate::orders::status_machine::StatusMachine;
use crate::payment::PaymentClient;
use crate::validation::validate_order_id;

/// Result of the unified complete operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// This caller won the transition and stock was decremented
    Completed,
    /// Another caller already completed the order
    AlreadyCompleted,
    /// The order exists but is not in `processing`
    NotReady(OrderStatus),
}

/// Service layer for the order lifecycle
///
/// Checkout never touches stock. Stock is decremented once, by whichever
/// caller of `complete_order` wins the `processing -> completed` transition
/// and then claims the `stock_reduced` flag.
#[derive(Clone)]
pub struct OrderService {
    orders: OrdersRepository,
    products: ProductsRepository,
    payment: PaymentClient,
}

impl OrderService {
    pub fn new(
        orders: OrdersRepository,
        products: ProductsRepository,
        payment: PaymentClient,
    ) -> Self {
        Self {
            orders,
            products,
            payment,
        }
    }

    /// Create or retry an order for the given lines
    ///
    /// Re-issuing checkout for an order that is still pending refreshes the
    /// payment metadata in place and leaves the persisted lines untouched.
    pub async fn checkout(
        &self,
        user_id: Uuid,
        order_id: &str,
        payment_method: &str,
        requested: &[CheckoutLine],
    ) -> Result<CheckoutResponse, OrderError> {
        validate_order_id(order_id)
            .map_err(|_| OrderError::ValidationError("Invalid order id format".to_string()))?;

        if requested.is_empty() {
            return Err(OrderError::ValidationError("Cart is empty".to_string()));
        }

        if let Some(existing) = self.orders.find_by_id(order_id).await? {
            return match existing.status {
                OrderStatus::Pending => self.retry_pending(existing, payment_method).await,
                status => Err(OrderError::AlreadyProcessed(format!(
                    "Order {} is already {}",
                    order_id, status
                ))),
            };
        }

        let product_ids: Vec<String> = requested.iter().map(|l| l.product_id.clone()).collect();
        let products = self.products.find_by_ids(&product_ids).await?;

        let lines = build_order_lines(&products, requested, Utc::now())?;
        let amount: i64 = lines.iter().map(|l| l.amount).sum();

        let payment = self
            .payment
            .create_transaction(order_id, amount, payment_method)
            .await?;

        let order = self
            .orders
            .create_with_lines(order_id, user_id, amount, &payment, &lines)
            .await?;

        tracing::info!(
            "Checkout created order {} for user {} ({} lines, amount {})",
            order.id,
            user_id,
            lines.len(),
            amount
        );

        Ok(CheckoutResponse {
            order_id: order.id,
            amount,
            fee: payment.fee,
            total_payment: payment.total_payment,
            payment_method: payment.payment_method,
            payment_number: payment.payment_number,
            expired_at: payment.expired_at,
        })
    }

    /// Checkout retry path: re-create the gateway transaction and refresh the
    /// stored payment metadata on the pending order.
    async fn retry_pending(
        &self,
        existing: Order,
        payment_method: &str,
    ) -> Result<CheckoutResponse, OrderError> {
        let payment = self
            .payment
            .create_transaction(&existing.id, existing.amount, payment_method)
            .await?;

        let refreshed = self
            .orders
            .refresh_payment_meta(&existing.id, &payment)
            .await?;
        if refreshed == 0 {
            // Lost a race with the webhook between the lookup and the update
            return Err(OrderError::AlreadyProcessed(format!(
                "Order {} is no longer pending",
                existing.id
            )));
        }

        tracing::info!("Checkout retried pending order {}", existing.id);

        Ok(CheckoutResponse {
            order_id: existing.id,
            amount: existing.amount,
            fee: payment.fee,
            total_payment: payment.total_payment,
            payment_method: payment.payment_method,
            payment_number: payment.payment_number,
            expired_at: payment.expired_at,
        })
    }

    /// Apply a gateway webhook notification
    ///
    /// Errors here are for the caller to log; the HTTP handler acknowledges
    /// the webhook regardless.
    pub async fn handle_webhook(&self, payload: &WebhookPayload) -> Result<(), OrderError> {
        match payload.status.as_str() {
            "completed" => {
                let rows = self
                    .orders
                    .mark_processing(&payload.order_id, payload.payment_method.as_deref())
                    .await?;
                if rows == 0 {
                    tracing::debug!(
                        "Webhook for order {} matched no pending row (replay or unknown)",
                        payload.order_id
                    );
                } else {
                    tracing::info!("Order {} moved to processing via webhook", payload.order_id);
                }
            }
            "failed" | "expired" => {
                let status = OrderStatus::from_str(&payload.status)
                    .unwrap_or(OrderStatus::Failed);
                let rows = self
                    .orders
                    .mark_closed_from_pending(&payload.order_id, status)
                    .await?;
                if rows > 0 {
                    tracing::info!("Order {} closed as {} via webhook", payload.order_id, status);
                }
            }
            other => {
                tracing::debug!(
                    "Ignoring webhook status {:?} for order {}",
                    other,
                    payload.order_id
                );
            }
        }

        Ok(())
    }

    /// Unified completion: conditional `processing -> completed` transition
    /// and an exactly-once stock decrement, committed as one transaction by
    /// the repository.
    ///
    /// Both the admin fulfillment action and the payment polling path call
    /// this; whichever caller wins the transition performs the decrement.
    pub async fn complete_order(
        &self,
        order_id: &str,
        processed_by: Option<Uuid>,
    ) -> Result<CompletionOutcome, OrderError> {
        if let Some(order) = self.orders.complete(order_id, processed_by).await? {
            tracing::info!("Order {} completed", order.id);
            return Ok(CompletionOutcome::Completed);
        }

        match self.orders.find_by_id(order_id).await? {
            None => Err(OrderError::NotFound),
            Some(order) if order.status == OrderStatus::Completed => {
                Ok(CompletionOutcome::AlreadyCompleted)
            }
            Some(order) => {
                debug_assert!(!StatusMachine::is_valid_transition(
                    order.status,
                    OrderStatus::Completed
                ));
                Ok(CompletionOutcome::NotReady(order.status))
            }
        }
    }

    /// Poll the gateway for an order's payment and complete it when the
    /// gateway reports it paid.
    pub async fn check_payment(&self, order_id: &str) -> Result<OrderStatusResponse, OrderError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound)?;

        if matches!(order.status, OrderStatus::Pending | OrderStatus::Processing) {
            let detail = self.payment.transaction_detail(order_id, order.amount).await;
            match detail {
                Ok(tx) if tx.is_completed() => {
                    if order.status == OrderStatus::Pending {
                        self.orders
                            .mark_processing(order_id, tx.payment_method.as_deref())
                            .await?;
                    }
                    self.complete_order(order_id, None).await?;
                }
                Ok(_) => {}
                Err(e) => {
                    // Polling is best-effort; keep serving the stored snapshot
                    tracing::warn!("Payment poll failed for order {}: {}", order_id, e);
                }
            }
        }

        self.transaction_status(order_id).await
    }

    /// Stored snapshot of an order's status
    pub async fn transaction_status(
        &self,
        order_id: &str,
    ) -> Result<OrderStatusResponse, OrderError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound)?;

        Ok(OrderStatusResponse {
            order_id: order.id,
            status: order.status,
            amount: order.amount,
            payment_method: order.payment_method,
            completed_at: order.completed_at,
        })
    }

    /// Pending-payment details for the payment page
    pub async fn payment_info(&self, order_id: &str) -> Result<PaymentInfoResponse, OrderError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound)?;

        if order.status == OrderStatus::Completed {
            return Err(OrderError::PaymentAlreadyCompleted);
        }

        Ok(PaymentInfoResponse {
            order_id: order.id,
            status: order.status,
            amount: order.amount,
            fee: order.fee,
            total_payment: order.total_payment,
            payment_method: order.payment_method,
            payment_number: order.payment_number,
            expired_at: order.expired_at,
        })
    }

    /// Trigger a sandbox payment for an existing order
    pub async fn simulate_payment(&self, order_id: &str, amount: i64) -> Result<(), OrderError> {
        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound)?;

        self.payment.simulate_payment(order_id, amount).await?;
        Ok(())
    }

    /// A user's orders newest-first, with lines joined to products
    pub async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<OrderSummary>, OrderError> {
        let orders = self.orders.find_by_user(user_id).await?;
        self.summarize(orders).await
    }

    /// All orders with lines, for the back-office
    pub async fn all_orders(&self) -> Result<Vec<OrderSummary>, OrderError> {
        let orders = self.orders.list_all().await?;
        self.summarize(orders).await
    }

    /// Processing orders oldest-first
    pub async fn processing_orders(&self) -> Result<Vec<OrderSummary>, OrderError> {
        let orders = self.orders.list_processing().await?;
        self.summarize(orders).await
    }

    /// Expire pending orders past their payment deadline
    pub async fn expire_overdue(&self) -> Result<u64, OrderError> {
        let expired = self.orders.expire_overdue(Utc::now()).await?;
        if expired > 0 {
            tracing::info!("Expired {} overdue pending orders", expired);
        }
        Ok(expired)
    }

    async fn summarize(&self, orders: Vec<Order>) -> Result<Vec<OrderSummary>, OrderError> {
        let ids: Vec<String> = orders.iter().map(|o| o.id.clone()).collect();
        let mut lines_by_order: HashMap<String, Vec<OrderLineView>> = HashMap::new();
        for line in self.orders.lines_with_products(&ids).await? {
            lines_by_order
                .entry(line.order_id.clone())
                .or_default()
                .push(line.into());
        }

        Ok(orders
            .into_iter()
            .map(|order| OrderSummary {
                items: lines_by_order.remove(&order.id).unwrap_or_default(),
                order_id: order.id,
                status: order.status,
                amount: order.amount,
                payment_method: order.payment_method,
                processing_started_at: order.processing_started_at,
                completed_at: order.completed_at,
                created_at: order.created_at,
            })
            .collect())
    }
}

/// Build persisted order lines from requested lines and the loaded products
///
/// Pure function: rejects unknown products and any product whose combined
/// requested quantity exceeds current stock, repeated lines included. The
/// effective (discounted) unit price is snapshotted onto each line. Stock
/// itself is never modified here.
pub fn build_order_lines(
    products: &[Product],
    requested: &[CheckoutLine],
    now: DateTime<Utc>,
) -> Result<Vec<NewOrderLine>, OrderError> {
    let by_id: HashMap<&str, &Product> =
        products.iter().map(|p| (p.id.as_str(), p)).collect();

    // Stock is checked against the total per product, so a payload that
    // splits one product across several lines cannot evade the check
    let mut totals: HashMap<&str, i32> = HashMap::new();
    for request in requested {
        if request.quantity < 1 {
            return Err(OrderError::ValidationError(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let product = by_id
            .get(request.product_id.as_str())
            .ok_or_else(|| OrderError::ProductNotFound(request.product_id.clone()))?;

        let total = totals.entry(product.id.as_str()).or_insert(0);
        *total = total.saturating_add(request.quantity);
    }

    for (product_id, total) in &totals {
        let product = by_id[product_id];
        if !pricing::is_in_stock(product, *total) {
            return Err(OrderError::InsufficientStock(product.id.clone()));
        }
    }

    let mut lines = Vec::with_capacity(requested.len());
    for request in requested {
        let product = by_id[request.product_id.as_str()];
        let unit_price = pricing::discounted_price(product, now);
        lines.push(NewOrderLine {
            product_id: product.id.clone(),
            quantity: request.quantity,
            unit_price,
            amount: unit_price * request.quantity as i64,
            note: request
                .note
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(String::from),
        });
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::tests_support::product;
    use super::*;
    use chrono::Duration;

    fn line(product_id: &str, quantity: i32) -> CheckoutLine {
        CheckoutLine {
            product_id: product_id.to_string(),
            quantity,
            note: None,
        }
    }

    #[test]
    fn test_build_lines_snapshots_price_and_amount() {
        let products = vec![product("PROD_A", 25_000, 10), product("PROD_B", 10_000, 10)];
        let requested = vec![line("PROD_A", 2), line("PROD_B", 3)];

        let lines = build_order_lines(&products, &requested, Utc::now()).unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].unit_price, 25_000);
        assert_eq!(lines[0].amount, 50_000);
        assert_eq!(lines[1].amount, 30_000);
        let total: i64 = lines.iter().map(|l| l.amount).sum();
        assert_eq!(total, 80_000);
    }

    #[test]
    fn test_build_lines_uses_discounted_price() {
        let mut discounted = product("PROD_A", 100_000, 10);
        discounted.discount_percentage = Some(20);
        discounted.discount_end_date = Some(Utc::now() + Duration::hours(1));

        let lines =
            build_order_lines(&[discounted], &[line("PROD_A", 1)], Utc::now()).unwrap();

        assert_eq!(lines[0].unit_price, 80_000);
        assert_eq!(lines[0].amount, 80_000);
    }

    #[test]
    fn test_build_lines_rejects_quantity_over_stock() {
        let products = vec![product("PROD_A", 25_000, 5)];

        let result = build_order_lines(&products, &[line("PROD_A", 6)], Utc::now());

        assert!(matches!(result, Err(OrderError::InsufficientStock(id)) if id == "PROD_A"));
    }

    #[test]
    fn test_build_lines_accepts_quantity_equal_to_stock() {
        let products = vec![product("PROD_A", 25_000, 5)];

        let lines = build_order_lines(&products, &[line("PROD_A", 5)], Utc::now()).unwrap();

        assert_eq!(lines[0].quantity, 5);
        assert_eq!(lines[0].amount, 125_000);
    }

    #[test]
    fn test_build_lines_checks_combined_quantity_across_repeated_lines() {
        let products = vec![product("PROD_A", 25_000, 5)];
        let requested = vec![line("PROD_A", 3), line("PROD_A", 3)];

        let result = build_order_lines(&products, &requested, Utc::now());

        assert!(matches!(result, Err(OrderError::InsufficientStock(id)) if id == "PROD_A"));
    }

    #[test]
    fn test_build_lines_accepts_repeated_lines_within_stock() {
        let products = vec![product("PROD_A", 25_000, 6)];
        let requested = vec![line("PROD_A", 3), line("PROD_A", 3)];

        let lines = build_order_lines(&products, &requested, Utc::now()).unwrap();

        assert_eq!(lines.len(), 2);
        let total: i64 = lines.iter().map(|l| l.amount).sum();
        assert_eq!(total, 150_000);
    }

    #[test]
    fn test_build_lines_rejects_unknown_product() {
        let products = vec![product("PROD_A", 25_000, 5)];

        let result = build_order_lines(&products, &[line("PROD_MISSING", 1)], Utc::now());

        assert!(matches!(result, Err(OrderError::ProductNotFound(id)) if id == "PROD_MISSING"));
    }

    #[test]
    fn test_build_lines_rejects_zero_quantity() {
        let products = vec![product("PROD_A", 25_000, 5)];

        let result = build_order_lines(&products, &[line("PROD_A", 0)], Utc::now());

        assert!(matches!(result, Err(OrderError::ValidationError(_))));
    }

    #[test]
    fn test_build_lines_trims_notes() {
        let products = vec![product("PROD_A", 25_000, 5)];
        let requested = vec![CheckoutLine {
            product_id: "PROD_A".to_string(),
            quantity: 1,
            note: Some("  extra hot  ".to_string()),
        }];

        let lines = build_order_lines(&products, &requested, Utc::now()).unwrap();
        assert_eq!(lines[0].note.as_deref(), Some("extra hot"));
    }

    #[test]
    fn test_build_lines_drops_blank_notes() {
        let products = vec![product("PROD_A", 25_000, 5)];
        let requested = vec![CheckoutLine {
            product_id: "PROD_A".to_string(),
            quantity: 1,
            note: Some("   ".to_string()),
        }];

        let lines = build_order_lines(&products, &requested, Utc::now()).unwrap();
        assert_eq!(lines[0].note, None);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Line amounts always equal unit_price * quantity and never go negative
    #[test]
    fn prop_line_amount_consistency() {
        proptest!(|(
            price in 1i64..1_000_000,
            stock in 1i32..1_000,
            quantity in 1i32..1_000
        )| {
            let products = vec![super::tests_support::product("PROD_P", price, stock)];
            let requested = vec![CheckoutLine {
                product_id: "PROD_P".to_string(),
                quantity,
                note: None,
            }];

            match build_order_lines(&products, &requested, chrono::Utc::now()) {
                Ok(lines) => {
                    prop_assert!(quantity <= stock);
                    prop_assert_eq!(lines[0].amount, price * quantity as i64);
                }
                Err(OrderError::InsufficientStock(_)) => {
                    prop_assert!(quantity > stock);
                }
                Err(e) => return Err(TestCaseError::fail(format!("unexpected error: {}", e))),
            }
        });
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use super::*;

    pub fn product(id: &str, price: i64, stock: i32) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            slug: id.to_lowercase(),
            price,
            description: "A product".to_string(),
            detail_description: None,
            images: vec![],
            stock,
            discount_percentage: None,
            discount_end_date: None,
            faqs: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
