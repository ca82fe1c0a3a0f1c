//! Trend indicators: SMA, moving-average crossovers

pub mod crossover;
pub mod sma;

pub use crossover::*;
pub use sma::*;
