//! One-shot report: crossover dates on the first line, traded total on the
//! second. Failures are logged to stderr and printed as an empty line / zero.

use std::sync::Arc;

use chrono::Utc;
use dotenvy::dotenv;
use trendscope::config::Config;
use trendscope::logging;
use trendscope::services::yahoo::YahooMarketDataProvider;
use trendscope::signals::{SignalPipeline, SignalResultExt, TracingObserver};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging_with_writer(std::io::stderr);

    let config = Config::from_env();
    config.validate()?;

    let provider = Arc::new(YahooMarketDataProvider::new(&config.market_data)?);
    let pipeline = SignalPipeline::new(provider, Arc::new(TracingObserver));

    let dates = pipeline
        .crossover_dates(&config.symbol, &config.crossover)
        .await
        .or_empty();
    let traded = pipeline
        .total_traded(&config.symbol, &config.volume, Utc::now())
        .await
        .map(|aggregate| aggregate.total)
        .or_empty();

    println!("{}", dates.join(" "));
    println!("{}", traded);

    Ok(())
}
