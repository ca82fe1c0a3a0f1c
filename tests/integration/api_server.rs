//! Integration tests for the API Server
//!
//! Drives the router over HTTP with the Yahoo provider pointed at wiremock.


use chrono::Utc;
use serde_json::Value;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use test_utils::{chart_body, flat_then_falling, mock_daily_chart, mock_hourly_chart, TestApiServer};

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "trendscope");
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = TestApiServer::new().await;
    let _ = app.server.get("/health").await;
    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    assert!(body.contains("http_requests_total"));
    assert!(body.contains("http_request_duration_seconds"));
    assert!(body.contains("http_requests_in_flight"));
}

#[tokio::test]
async fn find_crossovers_returns_dates() {
    let app = TestApiServer::new().await;
    mock_daily_chart(&app.upstream, &flat_then_falling()).await;

    let response = app.server.get("/find_crossovers").await;
    assert_eq!(response.status_code(), 200);
    let body: Vec<String> = response.json();
    assert_eq!(body, vec!["2024-09-07".to_string()]);
}

#[tokio::test]
async fn find_crossovers_honours_query_threshold() {
    let app = TestApiServer::new().await;
    mock_daily_chart(&app.upstream, &flat_then_falling()).await;

    let response = app
        .server
        .get("/find_crossovers")
        .add_query_param("threshold", "0.001")
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Vec<String> = response.json();
    assert!(body.is_empty());
}

#[tokio::test]
async fn find_crossovers_rejects_inverted_windows() {
    let app = TestApiServer::new().await;

    let response = app
        .server
        .get("/find_crossovers")
        .add_query_param("short_window", "200")
        .add_query_param("long_window", "50")
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "invalid_parameters");
}

#[tokio::test]
async fn crossover_report_includes_moving_averages() {
    let app = TestApiServer::new().await;
    mock_daily_chart(&app.upstream, &flat_then_falling()).await;

    let response = app.server.get("/api/crossovers").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["symbol"], "BTC-USD");
    assert_eq!(body["short_window"], 50);
    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["direction"], "bearish");
    assert!(events[0]["short_ma"].as_f64().unwrap() < events[0]["long_ma"].as_f64().unwrap());
}

#[tokio::test]
async fn unknown_symbol_is_reported_as_acquisition_failure() {
    let app = TestApiServer::new().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/NOPE-USD"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        })))
        .mount(&app.upstream)
        .await;

    let response = app
        .server
        .get("/find_crossovers")
        .add_query_param("symbol", "NOPE-USD")
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), 502);
    let body: Value = response.json();
    assert_eq!(body["error"], "acquisition_failure");

    let metrics = app.server.get("/metrics").await.text();
    assert!(metrics.contains("signal_failures_total{kind=\"acquisition_failure\"} 1"));
}

#[tokio::test]
async fn upstream_server_error_is_not_fatal() {
    let app = TestApiServer::new().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&app.upstream)
        .await;

    let response = app
        .server
        .get("/calculate_total_btc_traded")
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), 502);

    // The server keeps answering after an upstream failure.
    assert_eq!(app.server.get("/health").await.status_code(), 200);
}

#[tokio::test]
async fn missing_volume_column_is_schema_mismatch() {
    let app = TestApiServer::new().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/BTC-USD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "chart": {"result": [{
                "timestamp": [1717200000],
                "indicators": {"quote": [{"close": [50000.0]}]}
            }], "error": null}
        })))
        .mount(&app.upstream)
        .await;

    let response = app
        .server
        .get("/calculate_total_btc_traded")
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), 502);
    let body: Value = response.json();
    assert_eq!(body["error"], "schema_mismatch");
}

#[tokio::test]
async fn empty_chart_is_no_data() {
    let app = TestApiServer::new().await;
    mock_hourly_chart(&app.upstream, &[], &[]).await;

    let response = app
        .server
        .get("/calculate_total_btc_traded")
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["error"], "no_data");
}

#[tokio::test]
async fn small_notional_volume_truncates_to_zero() {
    let app = TestApiServer::new().await;
    let closes = vec![Some(50_000.0); 6];
    let volumes: Vec<Option<f64>> = [100.0, 200.0, 150.0, 300.0, 250.0, 400.0]
        .into_iter()
        .map(Some)
        .collect();
    mock_hourly_chart(&app.upstream, &closes, &volumes).await;

    let response = app.server.get("/calculate_total_btc_traded").await;
    assert_eq!(response.status_code(), 200);
    let total: i64 = response.json();
    assert_eq!(total, 0);
}

#[tokio::test]
async fn total_traded_uses_last_six_buckets() {
    let app = TestApiServer::new().await;
    let closes = vec![Some(60_000.0); 8];
    let mut volumes = vec![Some(6_000_000.0); 8];
    volumes[0] = Some(600_000_000.0);
    mock_hourly_chart(&app.upstream, &closes, &volumes).await;

    let response = app.server.get("/calculate_total_btc_traded").await;
    assert_eq!(response.status_code(), 200);
    let total: i64 = response.json();
    assert_eq!(total, 600);
}

#[tokio::test]
async fn zero_close_bucket_does_not_fault() {
    let app = TestApiServer::new().await;
    let closes = vec![Some(100.0), Some(0.0), Some(100.0)];
    let volumes = vec![Some(1_000.0), Some(5_000.0), None];
    mock_hourly_chart(&app.upstream, &closes, &volumes).await;

    let response = app.server.get("/api/volume").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["total"], 10);
    assert_eq!(body["buckets_used"], 3);
    assert_eq!(body["skipped_buckets"], 1);
    assert_eq!(body["interval"], "1h");

    let metrics = app.server.get("/metrics").await.text();
    assert!(metrics.contains("zero_price_buckets_total 1"));
}

#[tokio::test]
async fn completed_only_drops_the_open_bucket() {
    let app = TestApiServer::new().await;
    // Four closed hours, then one that started now and is still open.
    let open_start = Utc::now().timestamp();
    let closes = vec![Some(100.0); 5];
    let volumes = vec![
        Some(1_000.0),
        Some(2_000.0),
        Some(3_000.0),
        Some(4_000.0),
        Some(500_000.0),
    ];
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/BTC-USD"))
        .and(query_param("range", "5d"))
        .and(query_param("interval", "1h"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(
            open_start - 4 * 3_600,
            3_600,
            &closes,
            &volumes,
        )))
        .mount(&app.upstream)
        .await;

    let response = app
        .server
        .get("/api/volume")
        .add_query_param("completed_only", "true")
        .add_query_param("buckets", "3")
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["total"], 90);
    assert_eq!(body["buckets_used"], 3);

    let response = app
        .server
        .get("/api/volume")
        .add_query_param("buckets", "3")
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["total"], 5_070);
}

#[tokio::test]
async fn volume_query_overrides_period_interval_and_buckets() {
    let app = TestApiServer::new().await;
    let closes = vec![Some(10.0); 4];
    let volumes = vec![Some(100.0), Some(200.0), Some(300.0), Some(400.0)];
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/BTC-USD"))
        .and(query_param("range", "1d"))
        .and(query_param("interval", "30m"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(
            1_717_200_000,
            1_800,
            &closes,
            &volumes,
        )))
        .expect(1)
        .mount(&app.upstream)
        .await;

    let response = app
        .server
        .get("/api/volume")
        .add_query_param("period", "1d")
        .add_query_param("interval", "30m")
        .add_query_param("buckets", "2")
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["total"], 70);
    assert_eq!(body["buckets_used"], 2);
    assert_eq!(body["interval"], "30m");
}
