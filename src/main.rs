pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod coupons;
pub mod db;
pub mod error;
pub mod orders;
pub mod payment;
pub mod validation;

use std::time::Duration;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;

use auth::{IdentityClient, TokenService};
use config::Config;
use payment::PaymentClient;

/// Application state shared across handlers
///
/// External clients are constructed once at startup from validated config
/// and injected here; handlers never read credentials themselves.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub payment: PaymentClient,
    pub identity: IdentityClient,
    pub tokens: TokenService,
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
pub fn create_router(state: AppState) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Catalog
        .route("/api/products", get(catalog::handlers::list_products_handler))
        .route("/api/products/:id", get(catalog::handlers::get_product_handler))
        // Cart
        .route("/api/cart", get(cart::handlers::list_cart_handler))
        .route("/api/cart", post(cart::handlers::add_cart_item_handler))
        .route("/api/cart/clear", delete(cart::handlers::clear_cart_handler))
        .route("/api/cart/:id", put(cart::handlers::update_cart_quantity_handler))
        .route("/api/cart/:id", delete(cart::handlers::remove_cart_item_handler))
        .route("/api/cart/:id/note", put(cart::handlers::update_cart_note_handler))
        // Coupons
        .route("/api/coupons/apply", post(coupons::handlers::apply_coupon_handler))
        // Checkout and order lifecycle
        .route("/api/checkout", post(orders::handlers::checkout_handler))
        .route("/api/checkout-cart", post(orders::handlers::checkout_cart_handler))
        .route("/api/webhook", post(orders::handlers::webhook_handler))
        .route("/api/check-payment", post(orders::handlers::check_payment_handler))
        .route("/api/transaction/:order_id", get(orders::handlers::transaction_status_handler))
        .route("/api/payment-info/:order_id", get(orders::handlers::payment_info_handler))
        .route("/api/simulate-payment", post(orders::handlers::simulate_payment_handler))
        .route("/api/my-orders", get(orders::handlers::my_orders_handler))
        // Admin: products
        .route("/api/admin/products", post(catalog::handlers::create_product_handler))
        .route("/api/admin/products/:id", put(catalog::handlers::update_product_handler))
        .route("/api/admin/products/:id", delete(catalog::handlers::delete_product_handler))
        // Admin: coupons
        .route("/api/admin/coupons", get(coupons::handlers::list_coupons_handler))
        .route("/api/admin/coupons", post(coupons::handlers::create_coupon_handler))
        .route("/api/admin/coupons/:id", put(coupons::handlers::update_coupon_handler))
        .route("/api/admin/coupons/:id", delete(coupons::handlers::delete_coupon_handler))
        .route("/api/admin/coupons/:id/toggle", put(coupons::handlers::toggle_coupon_handler))
        // Admin: orders
        .route("/api/admin/transactions", get(orders::handlers::admin_transactions_handler))
        .route("/api/admin/orders-processing", get(orders::handlers::admin_processing_orders_handler))
        .route("/api/admin/orders/:order_id/complete", post(orders::handlers::admin_complete_order_handler))
        // Admin: reporting and users
        .route("/api/admin/stats", get(admin::handlers::stats_handler))
        .route("/api/admin/low-stock", get(admin::handlers::low_stock_handler))
        .route("/api/admin/users", get(admin::handlers::list_users_handler))
        .route("/api/admin/users", post(admin::handlers::create_user_handler))
        .route("/api/admin/users/:user_id/role", put(admin::handlers::change_role_handler))
        .route("/api/admin/users/:user_id", delete(admin::handlers::delete_user_handler))
        .layer(cors)
        .with_state(state)
}

/// Periodically expires pending orders whose payment window has elapsed
async fn run_expiry_sweep(service: orders::OrderService) {
    let mut interval = tokio::time::interval(Duration::from_secs(60));
    loop {
        interval.tick().await;
        if let Err(e) = service.expire_overdue().await {
            tracing::error!("Order expiry sweep failed: {}", e);
        }
    }
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    tracing::info!("Storefront API - Starting...");

    let config = Config::from_env().expect("Invalid configuration");

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    let state = AppState {
        db: db_pool.clone(),
        payment: PaymentClient::new(&config),
        identity: IdentityClient::new(&config),
        tokens: TokenService::new(config.jwt_secret.clone()),
    };

    // Background sweep for overdue pending orders
    let sweep_service = orders::OrderService::new(
        orders::OrdersRepository::new(db_pool.clone()),
        catalog::ProductsRepository::new(db_pool.clone()),
        state.payment.clone(),
    );
    tokio::spawn(run_expiry_sweep(sweep_service));

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Storefront API is running on http://{}", addr);

    axum::serve(listener, app).await.expect("Server error");
}
