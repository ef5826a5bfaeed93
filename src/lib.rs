pub mod config;
pub mod db;
pub mod models;
pub mod plugins;
pub mod price_checker;
pub mod product_manager;
pub mod scheduler;
pub mod scraper;
pub mod utils;
pub mod web;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::Database;
pub use price_checker::{PriceChecker, SweepReport};
pub use product_manager::{ProductManager, TrackOutcome};
pub use scheduler::PriceScheduler;
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
