//! Trendscope API Server
//!
//! Serves crossover dates and traded-volume totals over HTTP, plus health
//! and Prometheus metrics. Stateless; every request fetches its own data.

use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use trendscope::config::{get_environment, get_port, Config};
use trendscope::core::http::start_server;
use trendscope::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = Config::from_env();
    config.validate()?;
    let port = get_port();

    let env = get_environment();
    info!("Starting Trendscope API Server");
    info!(environment = %env, "Environment");
    info!(symbol = %config.symbol, "Default symbol");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(config, port).await {
            error!(error = %e, "HTTP server error");
        }
    });

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
