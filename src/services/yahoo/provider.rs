//! Yahoo Finance market data provider implementation

use std::sync::Arc;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use tracing::{debug, warn};

use super::client::YahooRestClient;
use crate::config::MarketDataConfig;
use crate::models::indicators::Candle;
use crate::models::series::OhlcvSeries;
use crate::services::market_data::{FetchError, HistoryRequest, MarketDataProvider};

pub struct YahooMarketDataProvider {
    client: Arc<YahooRestClient>,
    max_retries: usize,
    retry_delay: Duration,
}

impl YahooMarketDataProvider {
    pub fn new(config: &MarketDataConfig) -> Result<Self, FetchError> {
        let client = Arc::new(YahooRestClient::new(config)?);
        Ok(Self::with_client(client).with_retries(config.max_retries, Duration::from_millis(500)))
    }

    pub fn with_client(client: Arc<YahooRestClient>) -> Self {
        Self {
            client,
            max_retries: 0,
            retry_delay: Duration::from_millis(500),
        }
    }

    /// Retry retryable failures up to `max_retries` times, backing off
    /// exponentially from `min_delay`.
    pub fn with_retries(mut self, max_retries: usize, min_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = min_delay;
        self
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for YahooMarketDataProvider {
    async fn get_history(
        &self,
        symbol: &str,
        request: &HistoryRequest,
    ) -> Result<Vec<Candle>, FetchError> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.retry_delay)
            .with_max_times(self.max_retries);

        let chart = (|| async move { self.client.fetch_chart(symbol, request).await })
            .retry(backoff)
            .when(FetchError::is_retryable)
            .notify(|err: &FetchError, delay: Duration| {
                warn!(
                    symbol = %symbol,
                    error = %err,
                    delay_ms = delay.as_millis() as u64,
                    "Market data request failed, retrying"
                );
            })
            .await?;

        let Some(chart) = chart else {
            debug!(symbol = %symbol, "Chart response carried no result");
            return Ok(Vec::new());
        };

        let candles = chart.into_candles()?;
        debug!(symbol = %symbol, count = candles.len(), "Fetched {} candles for {}", candles.len(), symbol);

        // Yahoo occasionally repeats the live bucket; enforce ordering here.
        Ok(OhlcvSeries::from_unordered(candles).into_candles())
    }
}
