//! External data sources.

pub mod market_data;
pub mod yahoo;
