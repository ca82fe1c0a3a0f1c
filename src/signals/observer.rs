//! Observability hooks injected into the pipeline.

use tracing::{debug, warn};

use crate::models::indicators::CrossoverEvent;
use crate::signals::error::SignalError;

pub trait SignalObserver: Send + Sync {
    fn on_fetched(&self, _symbol: &str, _rows: usize) {}

    fn on_failure(&self, symbol: &str, error: &SignalError);

    /// Buckets excluded from a volume total because their close was unusable.
    fn on_zero_price_buckets(&self, _symbol: &str, _skipped: usize) {}

    fn on_crossovers(&self, _symbol: &str, _events: &[CrossoverEvent]) {}
}

pub struct NoopObserver;

impl SignalObserver for NoopObserver {
    fn on_failure(&self, _symbol: &str, _error: &SignalError) {}
}

/// Emits `tracing` events; needs a subscriber installed by the binary.
pub struct TracingObserver;

impl SignalObserver for TracingObserver {
    fn on_fetched(&self, symbol: &str, rows: usize) {
        debug!(symbol = %symbol, rows, "Fetched market data");
    }

    fn on_failure(&self, symbol: &str, error: &SignalError) {
        warn!(symbol = %symbol, kind = error.kind(), error = %error, "Signal computation failed");
    }

    fn on_zero_price_buckets(&self, symbol: &str, skipped: usize) {
        warn!(symbol = %symbol, skipped, "Skipped buckets with non-positive close price");
    }

    fn on_crossovers(&self, symbol: &str, events: &[CrossoverEvent]) {
        debug!(symbol = %symbol, count = events.len(), "Detected {} crossovers", events.len());
    }
}
