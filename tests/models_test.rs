//! Feed payload parsing tests against recorded responses.

mod common;

use wickline::chart::window::ingest;
use wickline::models::bar::parse_klines;
use wickline::models::ticker::TickerResponse;
use wickline::models::{ChartKey, Ticker, Timeframe};

const KLINES_JSON: &str = include_str!("fixtures/klines.json");
const TICKER_JSON: &str = include_str!("fixtures/ticker_24hr.json");

#[test]
fn test_klines_parse_string_encoded_numbers() {
    let body: serde_json::Value = serde_json::from_str(KLINES_JSON).expect("valid json");
    let bars = parse_klines(&body).expect("klines parse");

    assert_eq!(bars.len(), 5);
    assert_eq!(bars[0].open_time, 1_699_999_200_000);
    assert_eq!(bars[0].close_time, 1_700_002_799_999);
    assert_eq!(bars[0].open, 36500.10);
    assert_eq!(bars[0].volume, 812.441);
    assert_eq!(bars[3].volume, 0.0);
}

#[test]
fn test_klines_ingest_drops_inverted_bar() {
    let body: serde_json::Value = serde_json::from_str(KLINES_JSON).expect("valid json");
    let bars = parse_klines(&body).expect("klines parse");
    let (window, report) = ingest(ChartKey::new("BTCUSDT", Timeframe::H1), &bars, 200);

    // The last bar has a high below its open.
    assert_eq!(window.len(), 4);
    assert_eq!(report.received, 5);
    assert_eq!(report.dropped_invalid, 1);
    assert_eq!(report.dropped_out_of_order, 0);
    assert_eq!(report.dropped_gap, 0);
    assert_eq!(window.price_range(), Some((36210.30, 36700.00)));
}

#[test]
fn test_klines_wrong_shape_is_malformed() {
    let body = serde_json::json!({ "code": -1121, "msg": "Invalid symbol." });
    let err = parse_klines(&body).unwrap_err();
    assert!(err.to_string().starts_with("malformed message"));

    let short_row = serde_json::json!([[1700000000000_i64, "1", "2"]]);
    assert!(parse_klines(&short_row).is_err());
}

#[test]
fn test_ticker_24hr_converts() {
    let response: TickerResponse = serde_json::from_str(TICKER_JSON).expect("ticker json");
    assert_eq!(response.symbol, "BTCUSDT");

    let ticker = Ticker::try_from(response).expect("ticker converts");
    assert_eq!(ticker.last_price, 36500.0);
    assert_eq!(ticker.change, -190.25);
    assert_eq!(ticker.change_percent, -0.518);
    assert_eq!(ticker.high_24h, 36890.0);
    assert_eq!(ticker.low_24h, 36210.3);
    assert!(!ticker.is_up());
}

#[test]
fn test_ticker_with_garbage_number_is_rejected() {
    let json = TICKER_JSON.replace("\"36500.00000000\"", "\"n/a\"");
    let response: TickerResponse = serde_json::from_str(&json).expect("ticker json");
    assert!(Ticker::try_from(response).is_err());
}
