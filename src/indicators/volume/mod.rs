//! Volume indicators: traded base-asset quantity

pub mod aggregator;

pub use aggregator::*;
