// Market regime classification module
pub mod classifier;

pub use classifier::{Regime, RegimeClassifier};
