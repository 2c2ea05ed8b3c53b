//! Configuration and style loading tests.

mod common;

use std::collections::HashMap;
use std::io::Write;

use wickline::chart::ChartStyle;
use wickline::chart::surface::Rgba;
use wickline::config::from_lookup;
use wickline::models::Timeframe;

use common::fixtures_dir;

#[test]
fn test_style_fixture_overrides_and_inherits() {
    let style = ChartStyle::load(&fixtures_dir().join("style.json")).expect("style loads");
    let defaults = ChartStyle::default();

    assert_eq!(style.background, Rgba::rgb(0, 0, 0));
    assert_eq!(style.grid_lines, 3);
    assert_eq!(style.volume_alpha, 200);
    assert_eq!(style.periods(), vec![20, 50]);
    assert_eq!(style.overlay_color(50), Rgba::rgb(0, 255, 255).with_alpha(180));

    assert_eq!(style.bullish, defaults.bullish);
    assert_eq!(style.padding_ratio, defaults.padding_ratio);
}

#[test]
fn test_invalid_style_is_rejected() {
    let err = ChartStyle::load(&fixtures_dir().join("invalid_style.json")).unwrap_err();
    assert!(err.to_string().contains("padding_ratio"));
}

#[test]
fn test_style_file_not_found() {
    let err = ChartStyle::load(&fixtures_dir().join("missing.json")).unwrap_err();
    assert!(err.to_string().starts_with("configuration error"));
}

#[test]
fn test_style_file_with_bad_json() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "{{ \"grid_lines\": ").expect("write");
    let err = ChartStyle::load(file.path()).unwrap_err();
    assert!(err.to_string().starts_with("json error"));
}

#[test]
fn test_config_from_environment_map() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("WICKLINE_SYMBOL", "solusdt"),
        ("WICKLINE_TIMEFRAME", "4h"),
        ("WICKLINE_OFFLINE", "1"),
        ("WICKLINE_STYLE_PATH", "/etc/wickline/style.json"),
    ]);
    let config = from_lookup(|name| vars.get(name).map(|v| v.to_string())).expect("config loads");

    assert_eq!(config.chart.symbol, "SOLUSDT");
    assert_eq!(config.chart.timeframe, Timeframe::H4);
    assert!(config.feed.offline);
    assert!(config.chart.symbols.contains(&"SOLUSDT".to_string()));
    assert_eq!(
        config.style_path.as_deref(),
        Some(std::path::Path::new("/etc/wickline/style.json"))
    );
}
