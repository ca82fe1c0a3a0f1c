//! Moving-average crossover detection
//!
//! A crossover is reported at a timestamp where the sign of
//! `SMA(short) - SMA(long)` differs from the sign at the previous timestamp
//! that has both averages, and the absolute difference is below the
//! threshold. Only the warm-up region (before the long window fills) is
//! skipped; gaps in the source series are compared as adjacent samples.

use crate::common::math;
use crate::indicators::error::IndicatorError;
use crate::indicators::trend::sma::calculate_sma_series;
use crate::models::indicators::{CrossoverDirection, CrossoverEvent};
use crate::models::series::PriceSeries;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossoverDetector {
    short_window: usize,
    long_window: usize,
    threshold: f64,
}

impl CrossoverDetector {
    /// Windows must satisfy `0 < short < long`. Any threshold is accepted;
    /// a non-positive one simply never matches.
    pub fn new(short_window: usize, long_window: usize, threshold: f64) -> Result<Self, IndicatorError> {
        if short_window == 0 || short_window >= long_window || long_window > u32::MAX as usize {
            return Err(IndicatorError::InvalidWindow {
                short: short_window,
                long: long_window,
            });
        }
        Ok(Self {
            short_window,
            long_window,
            threshold,
        })
    }

    pub fn short_window(&self) -> usize {
        self.short_window
    }

    pub fn long_window(&self) -> usize {
        self.long_window
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Accepted crossovers in ascending time order.
    pub fn events(&self, series: &PriceSeries) -> Vec<CrossoverEvent> {
        // NaN thresholds fall out here too.
        if !(self.threshold > 0.0) || series.len() < self.long_window {
            return Vec::new();
        }

        let short = calculate_sma_series(series, self.short_window as u32);
        let long = calculate_sma_series(series, self.long_window as u32);
        // Both series end at the last point; align short onto long's first timestamp.
        let offset = self.long_window - self.short_window;

        let mut events = Vec::new();
        let mut previous_sign: Option<i8> = None;

        for (long_ma, short_ma) in long.iter().zip(&short[offset..]) {
            let difference = short_ma.value - long_ma.value;
            let sign = math::sign(difference);

            if let Some(previous) = previous_sign {
                if sign != previous && difference.abs() < self.threshold {
                    events.push(CrossoverEvent {
                        timestamp: long_ma.timestamp,
                        short_ma: short_ma.value,
                        long_ma: long_ma.value,
                        difference,
                        direction: CrossoverDirection::from_sign(sign),
                    });
                }
            }
            previous_sign = Some(sign);
        }

        events
    }

    /// Accepted crossover dates as `YYYY-MM-DD`.
    pub fn detect(&self, series: &PriceSeries) -> Vec<String> {
        self.events(series)
            .iter()
            .map(CrossoverEvent::date_string)
            .collect()
    }
}

/// Crossover dates for `series`; fails only on invalid windows.
pub fn detect_crossovers(
    series: &PriceSeries,
    short_window: usize,
    long_window: usize,
    threshold: f64,
) -> Result<Vec<String>, IndicatorError> {
    Ok(CrossoverDetector::new(short_window, long_window, threshold)?.detect(series))
}
