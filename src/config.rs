//! Application configuration loaded from environment variables.
//!
//! Every setting has a default, so an empty environment yields a working
//! configuration pointed at the public Binance REST API:
//! - `WICKLINE_REST_URL`: REST base URL
//! - `WICKLINE_SYMBOL`: symbol shown at startup
//! - `WICKLINE_SYMBOLS`: comma-separated symbols cycled with `h`/`l`
//! - `WICKLINE_TIMEFRAME`: startup timeframe (`1m`, `5m`, `15m`, `1h`, `4h`, `1d`)
//! - `WICKLINE_REFRESH_SECS`: polling period in seconds
//! - `WICKLINE_WINDOW_CAPACITY`: bars kept per window
//! - `WICKLINE_SEED`: seed for the synthetic fallback series
//! - `WICKLINE_OFFLINE`: `1`/`true` to skip the network entirely
//! - `WICKLINE_STYLE_PATH`: optional JSON chart style
//! - `WICKLINE_LOG_PATH`: log file (the terminal is owned by the UI)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::WicklineError;
use crate::chart::window::DEFAULT_CAPACITY;
use crate::feed::rest::DEFAULT_REST_URL;
use crate::feed::synthetic::DEFAULT_SEED;
use crate::models::Timeframe;

const DEFAULT_SYMBOL: &str = "BTCUSDT";
const DEFAULT_SYMBOLS: &[&str] = &["BTCUSDT", "ETHUSDT", "SOLUSDT", "BNBUSDT", "XRPUSDT"];
const DEFAULT_REFRESH_SECS: u64 = 30;
const DEFAULT_LOG_PATH: &str = "wickline.log";

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub chart: ChartConfig,
    pub style_path: Option<PathBuf>,
    pub log_path: PathBuf,
}

/// Where market data comes from and how often.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    pub rest_url: String,
    pub refresh_interval: Duration,
    pub seed: u64,
    pub offline: bool,
}

/// What the chart shows at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub symbol: String,
    pub symbols: Vec<String>,
    pub timeframe: Timeframe,
    pub capacity: usize,
}

/// Loads the application configuration from environment variables.
///
/// # Errors
///
/// Returns [`WicklineError::Config`] if a variable is set but cannot be
/// parsed, or if a numeric setting is zero.
pub fn fetch_config() -> crate::Result<AppConfig> {
    from_lookup(non_empty_var)
}

/// Builds the configuration from an arbitrary variable lookup.
///
/// `lookup` returns `None` for unset variables. Empty values are treated
/// as unset.
///
/// # Errors
///
/// Same as [`fetch_config`].
pub fn from_lookup<F>(lookup: F) -> crate::Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|s| !s.trim().is_empty());

    let rest_url = var("WICKLINE_REST_URL").unwrap_or_else(|| DEFAULT_REST_URL.to_string());

    let symbol = var("WICKLINE_SYMBOL")
        .map(|s| s.trim().to_uppercase())
        .unwrap_or_else(|| DEFAULT_SYMBOL.to_string());

    let mut symbols: Vec<String> = match var("WICKLINE_SYMBOLS") {
        Some(list) => list
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect(),
        None => DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
    };
    if !symbols.contains(&symbol) {
        symbols.insert(0, symbol.clone());
    }

    let timeframe = match var("WICKLINE_TIMEFRAME") {
        Some(raw) => Timeframe::from_str(raw.trim())
            .map_err(|e| WicklineError::Config(format!("WICKLINE_TIMEFRAME: {e}")))?,
        None => Timeframe::default(),
    };

    let refresh_secs = parse_positive(&var, "WICKLINE_REFRESH_SECS", DEFAULT_REFRESH_SECS)?;
    let capacity = parse_positive(&var, "WICKLINE_WINDOW_CAPACITY", DEFAULT_CAPACITY as u64)? as usize;

    let seed = match var("WICKLINE_SEED") {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|e| WicklineError::Config(format!("WICKLINE_SEED: {e}")))?,
        None => DEFAULT_SEED,
    };

    let offline = match var("WICKLINE_OFFLINE") {
        Some(raw) => parse_flag("WICKLINE_OFFLINE", &raw)?,
        None => false,
    };

    Ok(AppConfig {
        feed: FeedConfig {
            rest_url,
            refresh_interval: Duration::from_secs(refresh_secs),
            seed,
            offline,
        },
        chart: ChartConfig {
            symbol,
            symbols,
            timeframe,
            capacity,
        },
        style_path: var("WICKLINE_STYLE_PATH").map(PathBuf::from),
        log_path: var("WICKLINE_LOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH)),
    })
}

fn parse_positive<V>(var: &V, name: &str, default: u64) -> crate::Result<u64>
where
    V: Fn(&str) -> Option<String>,
{
    let Some(raw) = var(name) else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(WicklineError::Config(format!("{name} must be greater than zero"))),
        Ok(value) => Ok(value),
        Err(e) => Err(WicklineError::Config(format!("{name}: {e}"))),
    }
}

fn parse_flag(name: &str, raw: &str) -> crate::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(WicklineError::Config(format!(
            "{name}: expected a boolean, got {other:?}"
        ))),
    }
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn with_vars(vars: &[(&str, &str)]) -> crate::Result<AppConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_without_env_vars() {
        let config = with_vars(&[]).unwrap();
        assert_eq!(config.feed.rest_url, DEFAULT_REST_URL);
        assert_eq!(config.feed.refresh_interval, Duration::from_secs(30));
        assert_eq!(config.feed.seed, DEFAULT_SEED);
        assert!(!config.feed.offline);
        assert_eq!(config.chart.symbol, "BTCUSDT");
        assert_eq!(config.chart.symbols.len(), 5);
        assert_eq!(config.chart.timeframe, Timeframe::H1);
        assert_eq!(config.chart.capacity, 200);
        assert!(config.style_path.is_none());
        assert_eq!(config.log_path, PathBuf::from("wickline.log"));
    }

    #[test]
    fn overrides_are_applied() {
        let config = with_vars(&[
            ("WICKLINE_REST_URL", "http://localhost:8080/api/v3"),
            ("WICKLINE_SYMBOL", "ethusdt"),
            ("WICKLINE_TIMEFRAME", "15m"),
            ("WICKLINE_REFRESH_SECS", "5"),
            ("WICKLINE_WINDOW_CAPACITY", "50"),
            ("WICKLINE_SEED", "7"),
            ("WICKLINE_OFFLINE", "true"),
            ("WICKLINE_STYLE_PATH", "style.json"),
        ])
        .unwrap();

        assert_eq!(config.feed.rest_url, "http://localhost:8080/api/v3");
        assert_eq!(config.chart.symbol, "ETHUSDT");
        assert_eq!(config.chart.timeframe, Timeframe::M15);
        assert_eq!(config.feed.refresh_interval, Duration::from_secs(5));
        assert_eq!(config.chart.capacity, 50);
        assert_eq!(config.feed.seed, 7);
        assert!(config.feed.offline);
        assert_eq!(config.style_path, Some(PathBuf::from("style.json")));
    }

    #[test]
    fn startup_symbol_joins_symbol_list() {
        let config = with_vars(&[
            ("WICKLINE_SYMBOL", "DOGEUSDT"),
            ("WICKLINE_SYMBOLS", "btcusdt, ethusdt,,"),
        ])
        .unwrap();
        assert_eq!(config.chart.symbols, vec!["DOGEUSDT", "BTCUSDT", "ETHUSDT"]);
    }

    #[test]
    fn rejects_unknown_timeframe() {
        let err = with_vars(&[("WICKLINE_TIMEFRAME", "3h")]).unwrap_err();
        assert!(err.to_string().contains("WICKLINE_TIMEFRAME"));
    }

    #[test]
    fn rejects_zero_refresh_period() {
        let err = with_vars(&[("WICKLINE_REFRESH_SECS", "0")]).unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn rejects_garbage_numbers_and_flags() {
        assert!(with_vars(&[("WICKLINE_WINDOW_CAPACITY", "many")]).is_err());
        assert!(with_vars(&[("WICKLINE_SEED", "-1")]).is_err());
        assert!(with_vars(&[("WICKLINE_OFFLINE", "maybe")]).is_err());
    }

    #[test]
    fn empty_values_treated_as_absent() {
        let config = with_vars(&[
            ("WICKLINE_REST_URL", ""),
            ("WICKLINE_SYMBOL", "  "),
            ("WICKLINE_TIMEFRAME", ""),
        ])
        .unwrap();
        assert_eq!(config.feed.rest_url, DEFAULT_REST_URL);
        assert_eq!(config.chart.symbol, "BTCUSDT");
        assert_eq!(config.chart.timeframe, Timeframe::H1);
    }
}
