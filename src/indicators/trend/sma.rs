//! SMA (Simple Moving Average) indicator

use crate::common::math;
use crate::models::indicators::SmaIndicator;
use crate::models::series::PriceSeries;

/// Latest SMA of the series, `None` until a full window exists.
pub fn calculate_sma(series: &PriceSeries, period: u32) -> Option<SmaIndicator> {
    let last = series.points().last()?;
    let value = math::sma(&series.closes(), period as usize)?;
    Some(SmaIndicator {
        value,
        period,
        timestamp: last.timestamp,
    })
}

/// SMA at every timestamp that has a full trailing window.
///
/// The first `period - 1` timestamps are omitted, so the result starts at
/// `series.points()[period - 1]`.
pub fn calculate_sma_series(series: &PriceSeries, period: u32) -> Vec<SmaIndicator> {
    let window = period as usize;
    let means = math::rolling_mean(&series.closes(), window);
    series
        .points()
        .iter()
        .skip(window.saturating_sub(1))
        .zip(means)
        .map(|(point, value)| SmaIndicator {
            value,
            period,
            timestamp: point.timestamp,
        })
        .collect()
}
