//! Market data feed collaborators.
//!
//! The chart only needs a bounded, ascending series of bars for a
//! `(symbol, timeframe)` pair and a 24h ticker snapshot. [`DataFeed`]
//! is the seam: [`rest::RestFeed`] polls an HTTP API and
//! [`synthetic::SyntheticFeed`] generates a deterministic series from a
//! seed. Each chart owns its feed instance; there is no global feed.

pub mod rest;
pub mod synthetic;

use std::future::Future;

use tracing::debug;

use crate::Result;
use crate::models::{ChartKey, RawBar, Ticker, Timeframe};

pub use rest::RestFeed;
pub use synthetic::SyntheticFeed;

/// Where a delivery came from. Drives the online/offline indicator only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedSource {
    Live,
    Synthetic,
}

/// Bars and ticker from a single refresh.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub bars: Vec<RawBar>,
    pub ticker: Ticker,
    pub source: FeedSource,
}

/// A source of OHLCV bars and ticker snapshots.
///
/// Lifecycle: [`open`](DataFeed::open) once before the first request,
/// [`subscribe`](DataFeed::subscribe) whenever the displayed key
/// changes, [`close`](DataFeed::close) on teardown.
pub trait DataFeed: Send + Sync {
    /// Which kind of data this feed produces.
    fn source(&self) -> FeedSource;

    /// Prepares the feed for requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the feed cannot be reached at all.
    fn open(&self) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }

    /// Announces the key the chart is about to request.
    fn subscribe(&self, key: &ChartKey) {
        debug!(key = %key, "Feed subscribed");
    }

    /// Returns up to `limit` bars, ascending by open time.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, a non-2xx status, or a
    /// payload of the wrong shape.
    fn get_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<RawBar>>> + Send;

    /// Returns the current 24h ticker for `symbol`.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`get_bars`](DataFeed::get_bars).
    fn get_ticker(&self, symbol: &str) -> impl Future<Output = Result<Ticker>> + Send;

    /// Fetches bars and ticker for one refresh.
    ///
    /// # Errors
    ///
    /// Fails if either request fails.
    fn snapshot(
        &self,
        key: &ChartKey,
        limit: usize,
    ) -> impl Future<Output = Result<FeedSnapshot>> + Send {
        async move {
            let (bars, ticker) = tokio::try_join!(
                self.get_bars(&key.symbol, key.timeframe, limit),
                self.get_ticker(&key.symbol),
            )?;
            Ok(FeedSnapshot {
                bars,
                ticker,
                source: self.source(),
            })
        }
    }

    /// Releases anything the feed holds.
    fn close(&self) {
        debug!("Feed closed");
    }
}
