//! Prometheus metrics for the HTTP layer and the signal pipeline.

use std::sync::Arc;

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

use crate::models::indicators::CrossoverEvent;
use crate::signals::{SignalError, SignalObserver, TracingObserver};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
    pub signal_failures_total: IntCounterVec,
    pub zero_price_buckets_total: IntCounter,
    pub crossovers_detected_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total number of HTTP requests")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently being served")?;
        let signal_failures_total = IntCounterVec::new(
            Opts::new("signal_failures_total", "Signal computations that failed, by kind"),
            &["kind"],
        )?;
        let zero_price_buckets_total = IntCounter::new(
            "zero_price_buckets_total",
            "Buckets excluded from volume totals because of an unusable close price",
        )?;
        let crossovers_detected_total =
            IntCounter::new("crossovers_detected_total", "Moving-average crossovers reported")?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(signal_failures_total.clone()))?;
        registry.register(Box::new(zero_price_buckets_total.clone()))?;
        registry.register(Box::new(crossovers_detected_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            signal_failures_total,
            zero_price_buckets_total,
            crossovers_detected_total,
        })
    }

    /// Render all metrics in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Counts pipeline outcomes and forwards them to [`TracingObserver`].
pub struct MetricsObserver {
    metrics: Arc<Metrics>,
    tracing: TracingObserver,
}

impl MetricsObserver {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self {
            metrics,
            tracing: TracingObserver,
        }
    }
}

impl SignalObserver for MetricsObserver {
    fn on_fetched(&self, symbol: &str, rows: usize) {
        self.tracing.on_fetched(symbol, rows);
    }

    fn on_failure(&self, symbol: &str, error: &SignalError) {
        self.metrics
            .signal_failures_total
            .with_label_values(&[error.kind()])
            .inc();
        self.tracing.on_failure(symbol, error);
    }

    fn on_zero_price_buckets(&self, symbol: &str, skipped: usize) {
        self.metrics.zero_price_buckets_total.inc_by(skipped as u64);
        self.tracing.on_zero_price_buckets(symbol, skipped);
    }

    fn on_crossovers(&self, symbol: &str, events: &[CrossoverEvent]) {
        self.metrics.crossovers_detected_total.inc_by(events.len() as u64);
        self.tracing.on_crossovers(symbol, events);
    }
}
