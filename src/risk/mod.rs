// Risk management module
pub mod sizing;
pub mod stops;

pub use sizing::{portfolio_qty, position_size};
pub use stops::near_support;
