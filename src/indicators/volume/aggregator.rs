//! Traded quantity over the most recent buckets
//!
//! Upstream volume is notional (quote currency), so each bucket contributes
//! `volume / close` units of the base asset. A bucket whose close is not a
//! strictly positive finite number contributes nothing and is counted in
//! [`VolumeAggregate::skipped_buckets`].

use chrono::{DateTime, Duration, Utc};

use crate::indicators::error::IndicatorError;
use crate::models::indicators::VolumeAggregate;
use crate::models::series::OhlcvSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeAggregator {
    bucket_count: usize,
}

impl VolumeAggregator {
    pub fn new(bucket_count: usize) -> Result<Self, IndicatorError> {
        if bucket_count == 0 {
            return Err(IndicatorError::InvalidBucketCount);
        }
        Ok(Self { bucket_count })
    }

    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    /// Sum over the last `bucket_count` candles (all of them if fewer),
    /// truncated toward zero.
    pub fn aggregate(&self, series: &OhlcvSeries) -> VolumeAggregate {
        let window = series.tail(self.bucket_count);
        if window.is_empty() {
            return VolumeAggregate::empty();
        }

        let mut raw_total = 0.0;
        let mut skipped_buckets = 0;
        for candle in window {
            match candle.base_quantity() {
                Some(quantity) => raw_total += quantity,
                None => skipped_buckets += 1,
            }
        }

        VolumeAggregate {
            total: raw_total.trunc() as i64,
            raw_total,
            buckets_used: window.len(),
            skipped_buckets,
        }
    }
}

/// Truncated base-asset quantity traded over the last `bucket_count` buckets.
pub fn aggregate_volume(series: &OhlcvSeries, bucket_count: usize) -> Result<i64, IndicatorError> {
    Ok(VolumeAggregator::new(bucket_count)?.aggregate(series).total)
}

/// Drop trailing candles whose bucket has not closed at `as_of`.
///
/// A candle stamped at its open time covers `[timestamp, timestamp + interval)`.
pub fn completed_buckets(series: &OhlcvSeries, interval: Duration, as_of: DateTime<Utc>) -> OhlcvSeries {
    let candles = series.candles();
    let keep = candles
        .iter()
        .rposition(|c| c.timestamp + interval <= as_of)
        .map_or(0, |idx| idx + 1);
    OhlcvSeries::from_unordered(candles[..keep].to_vec())
}
