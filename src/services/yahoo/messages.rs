//! Yahoo Finance `v8/finance/chart` payloads.

use chrono::DateTime;
use serde::Deserialize;

use crate::models::indicators::Candle;
use crate::services::market_data::FetchError;

#[derive(Debug, Clone, Deserialize)]
pub struct ChartEnvelope {
    pub chart: ChartBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartBody {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartError {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    #[serde(default)]
    pub indicators: Option<ChartIndicators>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
}

/// Column-oriented OHLCV; any cell may be `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub open: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub high: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub low: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub close: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub volume: Option<Vec<Option<f64>>>,
}

fn cell(column: &Option<Vec<Option<f64>>>, idx: usize) -> Option<f64> {
    column.as_ref()?.get(idx).copied().flatten()
}

impl ChartResult {
    /// Rows with a null close are dropped, a null volume counts as zero and
    /// missing open/high/low fall back to the close.
    pub fn into_candles(self) -> Result<Vec<Candle>, FetchError> {
        let timestamps = match self.timestamp {
            Some(ts) if !ts.is_empty() => ts,
            _ => return Ok(Vec::new()),
        };

        let quote = self
            .indicators
            .and_then(|i| i.quote.into_iter().next())
            .ok_or_else(|| FetchError::SchemaMismatch("indicators.quote".to_string()))?;
        if quote.close.is_none() {
            return Err(FetchError::SchemaMismatch("close".to_string()));
        }
        if quote.volume.is_none() {
            return Err(FetchError::SchemaMismatch("volume".to_string()));
        }

        let mut candles = Vec::with_capacity(timestamps.len());
        for (idx, &seconds) in timestamps.iter().enumerate() {
            let Some(close) = cell(&quote.close, idx) else {
                continue;
            };
            let Some(timestamp) = DateTime::from_timestamp(seconds, 0) else {
                continue;
            };
            candles.push(Candle::new(
                cell(&quote.open, idx).unwrap_or(close),
                cell(&quote.high, idx).unwrap_or(close),
                cell(&quote.low, idx).unwrap_or(close),
                close,
                cell(&quote.volume, idx).unwrap_or(0.0),
                timestamp,
            ));
        }
        Ok(candles)
    }
}
