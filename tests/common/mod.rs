//! Shared test builders and fixtures.

#![allow(dead_code)]

use std::path::PathBuf;

use wickline::chart::window::{ChartWindow, DEFAULT_CAPACITY, ingest};
use wickline::models::{ChartKey, RawBar, Timeframe};

pub const MINUTE: i64 = 60_000;

/// Path to the test fixtures directory.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Reads a fixture file as a string.
pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixtures_dir().join(name)).expect("failed to read fixture")
}

/// One-minute bar at grid slot `index`.
pub fn bar(index: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> RawBar {
    RawBar {
        open_time: index * MINUTE,
        open,
        high,
        low,
        close,
        volume,
        close_time: (index + 1) * MINUTE - 1,
    }
}

/// Builds a one-minute window from `(open, high, low, close)` tuples with
/// unit volume.
pub fn window_from_ohlc(symbol: &str, ohlc: &[(f64, f64, f64, f64)]) -> ChartWindow {
    let raws: Vec<RawBar> = ohlc
        .iter()
        .enumerate()
        .map(|(i, &(o, h, l, c))| bar(i as i64, o, h, l, c, 1.0))
        .collect();
    ingest(ChartKey::new(symbol, Timeframe::M1), &raws, DEFAULT_CAPACITY).0
}

/// Builds a one-minute window of flat bars with the given volumes.
pub fn window_from_volumes(volumes: &[f64]) -> ChartWindow {
    let raws: Vec<RawBar> = volumes
        .iter()
        .enumerate()
        .map(|(i, &v)| bar(i as i64, 10.0, 11.0, 9.0, 10.5, v))
        .collect();
    ingest(ChartKey::new("BTCUSDT", Timeframe::M1), &raws, DEFAULT_CAPACITY).0
}

/// The three-bar window used in the moving-average scenario.
pub fn three_bar_window() -> ChartWindow {
    window_from_ohlc(
        "BTCUSDT",
        &[
            (10.0, 12.0, 9.0, 11.0),
            (11.0, 13.0, 10.0, 12.0),
            (12.0, 12.0, 11.0, 11.5),
        ],
    )
}
