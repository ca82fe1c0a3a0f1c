//! HTTP endpoint server using Axum

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use crate::config::{Config, CrossoverConfig, VolumeConfig};
use crate::metrics::{Metrics, MetricsObserver};
use crate::models::indicators::{CrossoverEvent, VolumeAggregate};
use crate::services::yahoo::YahooMarketDataProvider;
use crate::signals::{SignalError, SignalPipeline};

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub pipeline: SignalPipeline,
    pub config: Arc<Config>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

/// Pipeline failures rendered as `{ "error": kind, "message": text }`.
pub struct ApiError(pub SignalError);

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self.0 {
            SignalError::InvalidParameters(_) => StatusCode::BAD_REQUEST,
            SignalError::NoData { .. } => StatusCode::NOT_FOUND,
            SignalError::AcquisitionFailure(_) | SignalError::SchemaMismatch(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl From<SignalError> for ApiError {
    fn from(err: SignalError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.0.kind(),
            "message": self.0.to_string(),
        });
        (self.status_code(), Json(body)).into_response()
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "trendscope"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Default, Deserialize)]
pub struct CrossoverQuery {
    symbol: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    short_window: Option<usize>,
    long_window: Option<usize>,
    threshold: Option<f64>,
}

impl CrossoverQuery {
    fn resolve(self, config: &Config) -> (String, CrossoverConfig) {
        let defaults = &config.crossover;
        let params = CrossoverConfig {
            start: self.start.unwrap_or(defaults.start),
            end: self.end.or(defaults.end),
            short_window: self.short_window.unwrap_or(defaults.short_window),
            long_window: self.long_window.unwrap_or(defaults.long_window),
            threshold: self.threshold.unwrap_or(defaults.threshold),
        };
        (self.symbol.unwrap_or_else(|| config.symbol.clone()), params)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct VolumeQuery {
    symbol: Option<String>,
    buckets: Option<usize>,
    period: Option<String>,
    interval: Option<String>,
    completed_only: Option<bool>,
}

impl VolumeQuery {
    fn resolve(self, config: &Config) -> (String, VolumeConfig) {
        let defaults = &config.volume;
        let params = VolumeConfig {
            buckets: self.buckets.unwrap_or(defaults.buckets),
            period: self.period.unwrap_or_else(|| defaults.period.clone()),
            interval: self.interval.unwrap_or_else(|| defaults.interval.clone()),
            completed_buckets_only: self.completed_only.unwrap_or(defaults.completed_buckets_only),
        };
        (self.symbol.unwrap_or_else(|| config.symbol.clone()), params)
    }
}

/// Crossover dates as a bare JSON array of `YYYY-MM-DD` strings.
async fn find_crossovers(
    State(state): State<AppState>,
    Query(query): Query<CrossoverQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let (symbol, params) = query.resolve(&state.config);
    let dates = state.pipeline.crossover_dates(&symbol, &params).await?;
    Ok(Json(dates))
}

/// Truncated base-asset quantity as a bare JSON integer.
async fn calculate_total_traded(
    State(state): State<AppState>,
    Query(query): Query<VolumeQuery>,
) -> Result<Json<i64>, ApiError> {
    let (symbol, params) = query.resolve(&state.config);
    let aggregate = state
        .pipeline
        .total_traded(&symbol, &params, Utc::now())
        .await?;
    Ok(Json(aggregate.total))
}

#[derive(Debug, Serialize)]
struct CrossoverReport {
    symbol: String,
    short_window: usize,
    long_window: usize,
    threshold: f64,
    events: Vec<CrossoverEvent>,
}

async fn crossover_report(
    State(state): State<AppState>,
    Query(query): Query<CrossoverQuery>,
) -> Result<Json<CrossoverReport>, ApiError> {
    let (symbol, params) = query.resolve(&state.config);
    let events = state.pipeline.crossovers(&symbol, &params).await?;
    Ok(Json(CrossoverReport {
        symbol,
        short_window: params.short_window,
        long_window: params.long_window,
        threshold: params.threshold,
        events,
    }))
}

#[derive(Debug, Serialize)]
struct VolumeReport {
    symbol: String,
    interval: String,
    #[serde(flatten)]
    aggregate: VolumeAggregate,
}

async fn volume_report(
    State(state): State<AppState>,
    Query(query): Query<VolumeQuery>,
) -> Result<Json<VolumeReport>, ApiError> {
    let (symbol, params) = query.resolve(&state.config);
    let aggregate = state
        .pipeline
        .total_traded(&symbol, &params, Utc::now())
        .await?;
    Ok(Json(VolumeReport {
        symbol,
        interval: params.interval,
        aggregate,
    }))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/find_crossovers", get(find_crossovers))
        .route("/calculate_total_btc_traded", get(calculate_total_traded))
        .route("/api/crossovers", get(crossover_report))
        .route("/api/volume", get(volume_report))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Wire the Yahoo provider, metrics and pipeline for `config`.
pub fn build_state(config: Config) -> Result<AppState, Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let provider = Arc::new(YahooMarketDataProvider::new(&config.market_data)?);
    let observer = Arc::new(MetricsObserver::new(metrics.clone()));

    Ok(AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics,
        start_time: Arc::new(Instant::now()),
        pipeline: SignalPipeline::new(provider, observer),
        config: Arc::new(config),
    })
}

pub async fn start_server(config: Config, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(config)?;
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
