// Admin back-office: dashboard stats, low-stock report and the users surface

pub mod handlers;
pub mod models;
pub mod repository;

pub use models::AdminStats;
pub use repository::StatsRepository;
