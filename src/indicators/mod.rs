pub mod error;

pub mod trend;
pub mod volume;

pub use error::IndicatorError;
pub use trend::{detect_crossovers, CrossoverDetector};
pub use volume::{aggregate_volume, completed_buckets, VolumeAggregator};
