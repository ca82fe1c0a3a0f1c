use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV bucket. `volume` is notional, in quote currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub timestamp: DateTime<Utc>,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp,
        }
    }

    /// Quantity of the base asset traded in this bucket, or `None` when the
    /// close cannot be divided by.
    pub fn base_quantity(&self) -> Option<f64> {
        if self.close.is_finite() && self.close > 0.0 && self.volume.is_finite() {
            Some(self.volume / self.close)
        } else {
            None
        }
    }
}

/// Simple moving average value at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmaIndicator {
    pub value: f64,
    pub period: u32,
    pub timestamp: DateTime<Utc>,
}

/// Direction of the short average relative to the long one after a crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossoverDirection {
    /// Short average moved above the long one.
    Bullish,
    /// Short average moved below the long one.
    Bearish,
    /// The averages became equal.
    Converged,
}

impl CrossoverDirection {
    pub fn from_sign(sign: i8) -> Self {
        match sign {
            s if s > 0 => CrossoverDirection::Bullish,
            s if s < 0 => CrossoverDirection::Bearish,
            _ => CrossoverDirection::Converged,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossoverEvent {
    pub timestamp: DateTime<Utc>,
    pub short_ma: f64,
    pub long_ma: f64,
    pub difference: f64,
    pub direction: CrossoverDirection,
}

impl CrossoverEvent {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// `YYYY-MM-DD`
    pub fn date_string(&self) -> String {
        self.date().format("%Y-%m-%d").to_string()
    }
}

/// Truncated base-asset quantity over the most recent buckets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeAggregate {
    pub total: i64,
    pub raw_total: f64,
    pub buckets_used: usize,
    /// Buckets whose close was zero, negative or not finite.
    pub skipped_buckets: usize,
}

impl VolumeAggregate {
    pub fn empty() -> Self {
        Self {
            total: 0,
            raw_total: 0.0,
            buckets_used: 0,
            skipped_buckets: 0,
        }
    }
}
