// Per-user shopping cart
// Quantities are stock-checked against the live product row at call time;
// this is a best-effort check, the hard guarantee lives in order completion

pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use error::CartError;
pub use models::{AddCartItem, CartItem, CartItemView, UpdateCartNote, UpdateCartQuantity};
pub use repository::CartRepository;
pub use service::CartService;
