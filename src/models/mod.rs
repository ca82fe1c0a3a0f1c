//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod series;

pub use indicators::{Candle, CrossoverDirection, CrossoverEvent, SmaIndicator, VolumeAggregate};
pub use series::{OhlcvSeries, PricePoint, PriceSeries};
