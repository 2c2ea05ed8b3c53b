//! HTTP polling feed for Binance-compatible REST APIs.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use super::{DataFeed, FeedSource};
use crate::Result;
use crate::models::bar::parse_klines;
use crate::models::ticker::TickerResponse;
use crate::models::{RawBar, Ticker, Timeframe};

/// Default public REST endpoint.
pub const DEFAULT_REST_URL: &str = "https://api.binance.com/api/v3";

/// Largest `limit` the klines endpoint accepts.
const MAX_KLINE_LIMIT: usize = 1000;

/// Per-request timeout; a slow response should not stall the chart.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Polls `GET {base}/klines` and `GET {base}/ticker/24hr`.
pub struct RestFeed {
    client: reqwest::Client,
    base_url: String,
}

impl RestFeed {
    /// Builds a feed against `base_url` (no trailing path segments).
    ///
    /// # Errors
    ///
    /// Returns [`WicklineError::Http`](crate::WicklineError::Http) if the
    /// HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("wickline/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl DataFeed for RestFeed {
    fn source(&self) -> FeedSource {
        FeedSource::Live
    }

    async fn open(&self) -> Result<()> {
        info!(url = %self.base_url, "REST feed ready");
        Ok(())
    }

    async fn get_bars(&self, symbol: &str, timeframe: Timeframe, limit: usize) -> Result<Vec<RawBar>> {
        let limit = limit.clamp(1, MAX_KLINE_LIMIT);
        let response = self
            .client
            .get(format!("{}/klines", self.base_url))
            .query(&[("symbol", symbol), ("interval", timeframe.label())])
            .query(&[("limit", limit)])
            .send()
            .await?;

        let body: Value = response.error_for_status()?.json().await?;
        let bars = parse_klines(&body)?;
        debug!(symbol, timeframe = %timeframe, bars = bars.len(), "Fetched klines");
        Ok(bars)
    }

    async fn get_ticker(&self, symbol: &str) -> Result<Ticker> {
        let response = self
            .client
            .get(format!("{}/ticker/24hr", self.base_url))
            .query(&[("symbol", symbol)])
            .send()
            .await?;

        let body: TickerResponse = response.error_for_status()?.json().await?;
        Ticker::try_from(body)
    }
}
