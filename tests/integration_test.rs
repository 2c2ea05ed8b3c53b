//! Live API tests against the public Binance REST endpoint.
//!
//! These tests require network access.
//! Run with: `cargo test --features integration-tests`

#![cfg(feature = "integration-tests")]

mod common;

use wickline::chart::window::ingest;
use wickline::feed::rest::DEFAULT_REST_URL;
use wickline::feed::{DataFeed, FeedSource, RestFeed};
use wickline::models::{ChartKey, Timeframe};

#[tokio::test]
async fn test_live_klines_pass_ingest() {
    let feed = RestFeed::new(DEFAULT_REST_URL).expect("client builds");
    let key = ChartKey::new("BTCUSDT", Timeframe::M15);

    let bars = feed
        .get_bars(&key.symbol, key.timeframe, 100)
        .await
        .expect("klines fetched");
    assert_eq!(bars.len(), 100);

    let (window, report) = ingest(key, &bars, 100);
    assert_eq!(report.dropped(), 0);
    assert_eq!(window.len(), 100);
}

#[tokio::test]
async fn test_live_snapshot() {
    let feed = RestFeed::new(DEFAULT_REST_URL).expect("client builds");
    let key = ChartKey::new("ETHUSDT", Timeframe::H1);

    let snapshot = feed.snapshot(&key, 50).await.expect("snapshot fetched");
    assert_eq!(snapshot.source, FeedSource::Live);
    assert!(snapshot.ticker.last_price > 0.0);
    assert!(snapshot.ticker.high_24h >= snapshot.ticker.low_24h);
}

#[tokio::test]
async fn test_unknown_symbol_is_an_error() {
    let feed = RestFeed::new(DEFAULT_REST_URL).expect("client builds");
    let result = feed.get_ticker("NOTAREALPAIR").await;
    assert!(result.is_err());
}
