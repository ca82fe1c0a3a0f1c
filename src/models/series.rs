//! Ordered time series handed to the indicators.
//!
//! Both series types guarantee strictly increasing timestamps. `new` rejects
//! input that violates this; `from_unordered` repairs it by sorting and keeping
//! the last record seen for each timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::indicators::IndicatorError;
use crate::models::indicators::Candle;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, IndicatorError> {
        ensure_increasing(points.iter().map(|p| p.timestamp))?;
        Ok(Self { points })
    }

    pub fn from_unordered(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);
        Self {
            points: dedup_keep_last(points, |p| p.timestamp),
        }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OhlcvSeries {
    candles: Vec<Candle>,
}

impl OhlcvSeries {
    pub fn new(candles: Vec<Candle>) -> Result<Self, IndicatorError> {
        ensure_increasing(candles.iter().map(|c| c.timestamp))?;
        Ok(Self { candles })
    }

    pub fn from_unordered(mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.timestamp);
        Self {
            candles: dedup_keep_last(candles, |c| c.timestamp),
        }
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn into_candles(self) -> Vec<Candle> {
        self.candles
    }

    /// The most recent `count` candles, or all of them if fewer exist.
    pub fn tail(&self, count: usize) -> &[Candle] {
        let start = self.candles.len().saturating_sub(count);
        &self.candles[start..]
    }

    pub fn close_series(&self) -> PriceSeries {
        PriceSeries {
            points: self
                .candles
                .iter()
                .map(|c| PricePoint {
                    timestamp: c.timestamp,
                    close: c.close,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }
}

fn ensure_increasing(
    mut timestamps: impl Iterator<Item = DateTime<Utc>>,
) -> Result<(), IndicatorError> {
    let Some(mut previous) = timestamps.next() else {
        return Ok(());
    };
    for (offset, current) in timestamps.enumerate() {
        if current <= previous {
            return Err(IndicatorError::NonMonotonicTimestamps { index: offset + 1 });
        }
        previous = current;
    }
    Ok(())
}

fn dedup_keep_last<T>(sorted: Vec<T>, key: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(sorted.len());
    for item in sorted {
        match out.last_mut() {
            Some(last) if key(last) == key(&item) => *last = item,
            _ => out.push(item),
        }
    }
    out
}
