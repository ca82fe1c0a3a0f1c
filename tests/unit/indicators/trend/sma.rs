//! Unit tests for SMA indicator

use chrono::{Duration, TimeZone, Utc};
use trendscope::indicators::trend::{calculate_sma, calculate_sma_series};
use trendscope::models::series::{PricePoint, PriceSeries};

fn create_test_series(count: usize, base_price: f64) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let points = (0..count)
        .map(|i| PricePoint {
            timestamp: start + Duration::days(i as i64),
            close: base_price + i as f64,
        })
        .collect();
    PriceSeries::new(points).unwrap()
}

#[test]
fn test_sma_insufficient_data() {
    let series = create_test_series(10, 100.0);
    assert!(calculate_sma(&series, 20).is_none());
    assert!(calculate_sma_series(&series, 20).is_empty());
}

#[test]
fn test_sma_latest_value() {
    let series = create_test_series(10, 100.0);
    let sma = calculate_sma(&series, 4).unwrap();
    assert_eq!(sma.period, 4);
    assert_eq!(sma.value, 107.5);
    assert_eq!(sma.timestamp, series.points()[9].timestamp);
}

#[test]
fn test_sma_series_skips_warm_up() {
    let series = create_test_series(10, 100.0);
    let values = calculate_sma_series(&series, 3);
    assert_eq!(values.len(), 8);
    assert_eq!(values[0].timestamp, series.points()[2].timestamp);
    assert_eq!(values[0].value, 101.0);
    assert_eq!(values.last().unwrap().value, 108.0);
}
