// Coupon codes: validation, discount calculation, apply endpoint, admin CRUD

pub mod engine;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;

pub use engine::{calculate_discount, validate, CouponRejection};
pub use error::CouponError;
pub use models::{Coupon, CreateCoupon, DiscountType, UpdateCoupon};
pub use repository::CouponsRepository;
