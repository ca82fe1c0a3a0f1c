//! Environment-driven configuration.
//!
//! Every value has a default matching the BTC-USD report the service was
//! built around; a `.env` file is honoured by the binaries via `dotenvy`.

use chrono::NaiveDate;
use std::env;
use std::time::Duration;

use crate::indicators::IndicatorError;

pub const DEFAULT_SYMBOL: &str = "BTC-USD";
pub const DEFAULT_MARKET_DATA_URL: &str = "https://query1.finance.yahoo.com";

/// Deployment environment name (`production`, `sandbox`, ...).
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn get_port() -> u16 {
    parse_var("PORT").unwrap_or(8080)
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Trimmed value, or `None` when unset or blank.
fn string_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_date_var(key: &str) -> Option<NaiveDate> {
    env::var(key)
        .ok()
        .and_then(|v| NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").ok())
}

fn parse_bool_var(key: &str) -> Option<bool> {
    string_var(key).and_then(|v| match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    })
}

/// Parameters for the daily crossover scan.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossoverConfig {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
    pub short_window: usize,
    pub long_window: usize,
    pub threshold: f64,
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            end: None,
            short_window: 50,
            long_window: 200,
            threshold: 500.0,
        }
    }
}

/// Parameters for the hourly traded-volume total.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeConfig {
    pub buckets: usize,
    pub period: String,
    pub interval: String,
    /// Drop a trailing bucket that has not closed yet before taking the last N.
    pub completed_buckets_only: bool,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            buckets: 6,
            period: "5d".to_string(),
            interval: "1h".to_string(),
            completed_buckets_only: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketDataConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: usize,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MARKET_DATA_URL.to_string(),
            timeout: Duration::from_secs(10),
            max_retries: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub symbol: String,
    pub crossover: CrossoverConfig,
    pub volume: VolumeConfig,
    pub market_data: MarketDataConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            crossover: CrossoverConfig::default(),
            volume: VolumeConfig::default(),
            market_data: MarketDataConfig::default(),
        }
    }
}

impl Config {
    /// Build from environment variables; unparsable values keep their default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let crossover = CrossoverConfig {
            start: parse_date_var("CROSSOVER_START").unwrap_or(defaults.crossover.start),
            end: parse_date_var("CROSSOVER_END"),
            short_window: parse_var("SHORT_WINDOW").unwrap_or(defaults.crossover.short_window),
            long_window: parse_var("LONG_WINDOW").unwrap_or(defaults.crossover.long_window),
            threshold: parse_var("CROSSOVER_THRESHOLD").unwrap_or(defaults.crossover.threshold),
        };

        let volume = VolumeConfig {
            buckets: parse_var("VOLUME_BUCKETS").unwrap_or(defaults.volume.buckets),
            period: string_var("VOLUME_PERIOD").unwrap_or(defaults.volume.period),
            interval: string_var("VOLUME_INTERVAL").unwrap_or(defaults.volume.interval),
            completed_buckets_only: parse_bool_var("COMPLETED_BUCKETS_ONLY")
                .unwrap_or(defaults.volume.completed_buckets_only),
        };

        let market_data = MarketDataConfig {
            base_url: string_var("MARKET_DATA_URL").unwrap_or(defaults.market_data.base_url),
            timeout: parse_var("MARKET_DATA_TIMEOUT_SECONDS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.market_data.timeout),
            max_retries: parse_var("MARKET_DATA_RETRIES").unwrap_or(defaults.market_data.max_retries),
        };

        Self {
            symbol: string_var("SYMBOL").unwrap_or(defaults.symbol),
            crossover,
            volume,
            market_data,
        }
    }

    /// Reject window and bucket settings the detectors cannot run with.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        let short = self.crossover.short_window;
        let long = self.crossover.long_window;
        if short == 0 || short >= long {
            return Err(IndicatorError::InvalidWindow { short, long });
        }
        if self.volume.buckets == 0 {
            return Err(IndicatorError::InvalidBucketCount);
        }
        Ok(())
    }
}
