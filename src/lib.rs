// Core modules
pub mod bot;
pub mod config;
pub mod execution;
pub mod models;
pub mod providers;
pub mod regime;
pub mod risk;
pub mod scheduler;
pub mod scoring;
pub mod universe;

// Re-export commonly used types
pub use bot::TradingBot;
pub use config::Settings;
pub use models::*;
pub use scheduler::CycleScheduler;

// Error handling
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
