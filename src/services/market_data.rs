//! Market data provider interface.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::indicators::Candle;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream returned HTTP {status}")]
    Status { status: u16 },
    #[error("upstream error {code}: {description}")]
    Upstream { code: String, description: String },
    #[error("failed to decode upstream payload: {0}")]
    Decode(String),
    #[error("upstream payload is missing `{0}`")]
    SchemaMismatch(String),
    #[error("invalid market data url: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Transport hiccups, rate limiting and 5xx responses are worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            FetchError::Status { status } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// What slice of history to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistoryRequest {
    /// `start` inclusive, `end` exclusive; an open end means "up to now".
    Range {
        start: NaiveDate,
        end: Option<NaiveDate>,
        interval: String,
    },
    /// Relative lookback such as `5d` or `1mo`.
    Period { period: String, interval: String },
}

impl HistoryRequest {
    pub fn daily_since(start: NaiveDate, end: Option<NaiveDate>) -> Self {
        HistoryRequest::Range {
            start,
            end,
            interval: "1d".to_string(),
        }
    }

    pub fn period(period: impl Into<String>, interval: impl Into<String>) -> Self {
        HistoryRequest::Period {
            period: period.into(),
            interval: interval.into(),
        }
    }

    pub fn interval(&self) -> &str {
        match self {
            HistoryRequest::Range { interval, .. } | HistoryRequest::Period { interval, .. } => interval,
        }
    }
}

/// Bucket length for an interval code (`15m`, `1h`, `1d`, `1wk`).
///
/// Calendar-sized codes (`1mo`, `3mo`) have no fixed length and return `None`.
pub fn interval_duration(interval: &str) -> Option<Duration> {
    let interval = interval.trim();
    let split = interval.find(|c: char| !c.is_ascii_digit())?;
    let (count, unit) = interval.split_at(split);
    let count: i64 = count.parse().ok()?;
    match unit {
        "m" => Some(Duration::minutes(count)),
        "h" => Some(Duration::hours(count)),
        "d" => Some(Duration::days(count)),
        "wk" => Some(Duration::weeks(count)),
        _ => None,
    }
}

#[async_trait::async_trait]
pub trait MarketDataProvider {
    /// OHLCV history for a symbol, ascending by timestamp.
    ///
    /// An empty vector means the upstream had no rows for the request.
    async fn get_history(
        &self,
        symbol: &str,
        request: &HistoryRequest,
    ) -> Result<Vec<Candle>, FetchError>;
}

/// Provider serving a fixed response, for wiring tests and offline runs.
pub struct StaticMarketDataProvider {
    candles: Vec<Candle>,
    failure: Option<String>,
}

impl StaticMarketDataProvider {
    pub fn new(candles: Vec<Candle>) -> Self {
        Self {
            candles,
            failure: None,
        }
    }

    /// Every request fails with an upstream error carrying `description`.
    pub fn failing(description: impl Into<String>) -> Self {
        Self {
            candles: Vec::new(),
            failure: Some(description.into()),
        }
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for StaticMarketDataProvider {
    async fn get_history(
        &self,
        _symbol: &str,
        _request: &HistoryRequest,
    ) -> Result<Vec<Candle>, FetchError> {
        match &self.failure {
            Some(description) => Err(FetchError::Upstream {
                code: "Unavailable".to_string(),
                description: description.clone(),
            }),
            None => Ok(self.candles.clone()),
        }
    }
}
