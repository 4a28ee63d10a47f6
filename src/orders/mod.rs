// Order lifecycle core
// Checkout creates an order aggregate with immutable lines; the webhook moves
// it from pending to processing; a single idempotent complete operation (used
// by both the admin action and payment polling) finishes it and decrements
// stock exactly once. A background sweep expires overdue pending orders.

pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod status_machine;

pub use error::OrderError;
pub use models::{
    CheckoutLine, CheckoutResponse, Order, OrderLine, OrderStatus, OrderSummary,
};
pub use repository::OrdersRepository;
pub use service::{CompletionOutcome, OrderService};
pub use status_machine::StatusMachine;
