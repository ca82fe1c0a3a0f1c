//! Unit tests for moving-average crossover detection

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use trendscope::indicators::trend::{detect_crossovers, CrossoverDetector};
use trendscope::indicators::IndicatorError;
use trendscope::models::indicators::CrossoverDirection;
use trendscope::models::series::{PricePoint, PriceSeries};

fn daily_series(closes: &[f64]) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let points = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            timestamp: start + Duration::days(i as i64),
            close,
        })
        .collect();
    PriceSeries::new(points).unwrap()
}

/// 250 days at 100, then falling by 0.5 a day for 150 days.
fn flat_then_falling() -> Vec<f64> {
    (0..400)
        .map(|i| if i < 250 { 100.0 } else { 100.0 - 0.5 * (i - 249) as f64 })
        .collect()
}

#[test]
fn test_flat_then_falling_crosses_once() {
    let series = daily_series(&flat_then_falling());
    let dates = detect_crossovers(&series, 50, 200, 500.0).unwrap();
    assert_eq!(dates, vec!["2024-09-07".to_string()]);
}

#[test]
fn test_flat_then_falling_event_is_bearish() {
    let detector = CrossoverDetector::new(50, 200, 500.0).unwrap();
    let events = detector.events(&daily_series(&flat_then_falling()));
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.direction, CrossoverDirection::Bearish);
    assert!(event.short_ma < event.long_ma);
    assert!((event.difference - (-0.0075)).abs() < 1e-9);
}

#[test]
fn test_threshold_filters_wide_crossings() {
    let series = daily_series(&flat_then_falling());
    let dates = detect_crossovers(&series, 50, 200, 0.001).unwrap();
    assert!(dates.is_empty());
}

#[test]
fn test_series_shorter_than_long_window_is_empty() {
    let series = daily_series(&flat_then_falling()[..199]);
    assert!(detect_crossovers(&series, 50, 200, 500.0).unwrap().is_empty());
    assert!(detect_crossovers(&PriceSeries::default(), 50, 200, 500.0)
        .unwrap()
        .is_empty());
}

#[test]
fn test_non_positive_threshold_is_empty() {
    let series = daily_series(&flat_then_falling());
    assert!(detect_crossovers(&series, 50, 200, 0.0).unwrap().is_empty());
    assert!(detect_crossovers(&series, 50, 200, -1.0).unwrap().is_empty());
    assert!(detect_crossovers(&series, 50, 200, f64::NAN).unwrap().is_empty());
}

#[test]
fn test_detector_keeps_its_parameters() {
    let detector = CrossoverDetector::new(50, 200, 500.0).unwrap();
    assert_eq!(detector.short_window(), 50);
    assert_eq!(detector.long_window(), 200);
    assert_eq!(detector.threshold(), 500.0);
}

#[test]
fn test_invalid_windows_are_rejected() {
    assert_eq!(
        CrossoverDetector::new(200, 50, 1.0).unwrap_err(),
        IndicatorError::InvalidWindow { short: 200, long: 50 }
    );
    assert!(CrossoverDetector::new(0, 5, 1.0).is_err());
    assert!(CrossoverDetector::new(5, 5, 1.0).is_err());
}

#[test]
fn test_first_eligible_point_is_never_a_crossover() {
    // Short average is above the long one from the first defined point on.
    let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
    let series = daily_series(&closes);
    assert!(detect_crossovers(&series, 3, 10, 1_000.0).unwrap().is_empty());
}

#[test]
fn test_bullish_crossing() {
    let series = daily_series(&[3.0, 2.0, 1.0, 2.0, 3.0]);
    let events = CrossoverDetector::new(2, 3, 1.0).unwrap().events(&series);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].date(), NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    assert_eq!(events[0].date_string(), "2024-01-05");
    assert_eq!(events[0].direction, CrossoverDirection::Bullish);
}

#[test]
fn test_zero_run_flags_only_entry() {
    let series = daily_series(&[1.0, 2.0, 3.0, 4.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0]);
    let events = CrossoverDetector::new(2, 4, 1.0).unwrap().events(&series);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].date_string(), "2024-01-08");
    assert_eq!(events[0].direction, CrossoverDirection::Converged);
}

#[test]
fn test_output_is_idempotent_and_strictly_increasing() {
    let closes: Vec<f64> = (0..200)
        .map(|i| 100.0 + 10.0 * (i as f64 / 5.0).sin())
        .collect();
    let series = daily_series(&closes);
    let detector = CrossoverDetector::new(3, 8, 100.0).unwrap();

    let first = detector.detect(&series);
    let second = detector.detect(&series);
    assert_eq!(first, second);
    assert!(!first.is_empty());
    assert!(first.windows(2).all(|pair| pair[0] < pair[1]));
}
