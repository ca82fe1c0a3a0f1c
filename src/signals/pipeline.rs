//! Fetch-then-compute orchestration for both signals.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::{CrossoverConfig, VolumeConfig};
use crate::indicators::{completed_buckets, CrossoverDetector, VolumeAggregator};
use crate::models::indicators::{CrossoverEvent, VolumeAggregate};
use crate::models::series::OhlcvSeries;
use crate::services::market_data::{interval_duration, HistoryRequest, MarketDataProvider};
use crate::signals::error::{SignalError, SignalResult};
use crate::signals::observer::SignalObserver;

/// Each call fetches its own series; nothing is shared between calls except
/// the read-only collaborators.
#[derive(Clone)]
pub struct SignalPipeline {
    provider: Arc<dyn MarketDataProvider + Send + Sync>,
    observer: Arc<dyn SignalObserver>,
}

impl SignalPipeline {
    pub fn new(
        provider: Arc<dyn MarketDataProvider + Send + Sync>,
        observer: Arc<dyn SignalObserver>,
    ) -> Self {
        Self { provider, observer }
    }

    /// Daily moving-average crossovers since `params.start`.
    pub async fn crossovers(
        &self,
        symbol: &str,
        params: &CrossoverConfig,
    ) -> SignalResult<Vec<CrossoverEvent>> {
        let result = self.run_crossovers(symbol, params).await;
        self.report(symbol, &result);
        if let Ok(events) = &result {
            self.observer.on_crossovers(symbol, events);
        }
        result
    }

    /// Same as [`crossovers`](Self::crossovers), as `YYYY-MM-DD` strings.
    pub async fn crossover_dates(
        &self,
        symbol: &str,
        params: &CrossoverConfig,
    ) -> SignalResult<Vec<String>> {
        let events = self.crossovers(symbol, params).await?;
        Ok(events.iter().map(CrossoverEvent::date_string).collect())
    }

    /// Base-asset quantity traded over the last `params.buckets` buckets.
    ///
    /// `as_of` only matters when `params.completed_buckets_only` is set.
    pub async fn total_traded(
        &self,
        symbol: &str,
        params: &VolumeConfig,
        as_of: DateTime<Utc>,
    ) -> SignalResult<VolumeAggregate> {
        let result = self.run_total_traded(symbol, params, as_of).await;
        self.report(symbol, &result);
        if let Ok(aggregate) = &result {
            if aggregate.skipped_buckets > 0 {
                self.observer.on_zero_price_buckets(symbol, aggregate.skipped_buckets);
            }
        }
        result
    }

    async fn run_crossovers(
        &self,
        symbol: &str,
        params: &CrossoverConfig,
    ) -> SignalResult<Vec<CrossoverEvent>> {
        let detector = CrossoverDetector::new(params.short_window, params.long_window, params.threshold)?;
        let request = HistoryRequest::daily_since(params.start, params.end);
        let series = self.fetch(symbol, &request).await?;
        Ok(detector.events(&series.close_series()))
    }

    async fn run_total_traded(
        &self,
        symbol: &str,
        params: &VolumeConfig,
        as_of: DateTime<Utc>,
    ) -> SignalResult<VolumeAggregate> {
        let aggregator = VolumeAggregator::new(params.buckets)?;
        let request = HistoryRequest::period(params.period.clone(), params.interval.clone());
        let mut series = self.fetch(symbol, &request).await?;

        if params.completed_buckets_only {
            match interval_duration(&params.interval) {
                Some(interval) => series = completed_buckets(&series, interval, as_of),
                None => debug!(
                    interval = %params.interval,
                    "Interval has no fixed length, keeping trailing bucket"
                ),
            }
        }

        Ok(aggregator.aggregate(&series))
    }

    async fn fetch(&self, symbol: &str, request: &HistoryRequest) -> SignalResult<OhlcvSeries> {
        let candles = self.provider.get_history(symbol, request).await?;
        self.observer.on_fetched(symbol, candles.len());
        if candles.is_empty() {
            return Err(SignalError::NoData {
                symbol: symbol.to_string(),
            });
        }
        Ok(OhlcvSeries::from_unordered(candles))
    }

    fn report<T>(&self, symbol: &str, result: &SignalResult<T>) {
        if let Err(error) = result {
            self.observer.on_failure(symbol, error);
        }
    }
}
