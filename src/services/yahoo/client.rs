//! REST client for the Yahoo Finance chart endpoint.

use chrono::{NaiveDate, NaiveTime, Utc};
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::messages::{ChartEnvelope, ChartResult};
use crate::config::MarketDataConfig;
use crate::services::market_data::{FetchError, HistoryRequest};

// Yahoo rejects requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

pub struct YahooRestClient {
    base_url: String,
    http: Client,
}

impl YahooRestClient {
    pub fn new(config: &MarketDataConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;
        Ok(Self::with_client(config.base_url.clone(), http))
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    pub fn chart_url(&self, symbol: &str, request: &HistoryRequest) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);

        {
            let mut query = url.query_pairs_mut();
            match request {
                HistoryRequest::Range { start, end, interval } => {
                    let period2 = end.map(day_start_unix).unwrap_or_else(|| Utc::now().timestamp());
                    query
                        .append_pair("period1", &day_start_unix(*start).to_string())
                        .append_pair("period2", &period2.to_string())
                        .append_pair("interval", interval);
                }
                HistoryRequest::Period { period, interval } => {
                    query.append_pair("range", period).append_pair("interval", interval);
                }
            }
            query.append_pair("includePrePost", "false");
        }

        Ok(url)
    }

    /// Fetch one chart. `Ok(None)` means Yahoo answered without a result block.
    pub async fn fetch_chart(
        &self,
        symbol: &str,
        request: &HistoryRequest,
    ) -> Result<Option<ChartResult>, FetchError> {
        let url = self.chart_url(symbol, request)?;
        debug!(symbol = %symbol, url = %url, "Requesting chart");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope = match serde_json::from_str::<ChartEnvelope>(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(FetchError::Status {
                    status: status.as_u16(),
                })
            }
            Err(e) => return Err(FetchError::Decode(e.to_string())),
        };

        if let Some(error) = envelope.chart.error {
            return Err(FetchError::Upstream {
                code: error.code,
                description: error.description.unwrap_or_default(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        Ok(envelope.chart.result.and_then(|results| results.into_iter().next()))
    }
}

fn day_start_unix(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}
