use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    #[error("invalid moving-average windows: short={short}, long={long} (need 0 < short < long)")]
    InvalidWindow { short: usize, long: usize },
    #[error("bucket count must be at least 1")]
    InvalidBucketCount,
    #[error("timestamps must be strictly increasing (violated at index {index})")]
    NonMonotonicTimestamps { index: usize },
}
