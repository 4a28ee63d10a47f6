// Product catalog: public reads, admin CRUD and pure pricing rules

pub mod handlers;
pub mod models;
pub mod pricing;
pub mod repository;

pub use models::{CreateProduct, Product, ProductSummary, UpdateProduct};
pub use pricing::{discount_amount, discounted_price, is_discount_active, is_in_stock};
pub use repository::ProductsRepository;
