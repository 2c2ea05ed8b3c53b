//! Live ticker snapshot models.

use serde::{Deserialize, Serialize};

use crate::{Result, WicklineError};

/// 24-hour rolling ticker snapshot for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Ticker {
    pub last_price: f64,
    /// Absolute price change over the last 24 hours.
    pub change: f64,
    /// Relative price change over the last 24 hours, in percent.
    pub change_percent: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    pub volume_24h: f64,
}

impl Ticker {
    /// Whether the 24h change is zero or positive.
    pub fn is_up(&self) -> bool {
        self.change >= 0.0
    }
}

/// Wire shape of a Binance-style `/ticker/24hr` response.
///
/// Numeric fields arrive as decimal strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerResponse {
    pub symbol: String,
    pub last_price: String,
    pub price_change: String,
    pub price_change_percent: String,
    pub high_price: String,
    pub low_price: String,
    pub volume: String,
}

impl TryFrom<TickerResponse> for Ticker {
    type Error = WicklineError;

    fn try_from(response: TickerResponse) -> Result<Self> {
        let ticker = Ticker {
            last_price: parse_decimal(&response.last_price, "lastPrice")?,
            change: parse_decimal(&response.price_change, "priceChange")?,
            change_percent: parse_decimal(&response.price_change_percent, "priceChangePercent")?,
            high_24h: parse_decimal(&response.high_price, "highPrice")?,
            low_24h: parse_decimal(&response.low_price, "lowPrice")?,
            volume_24h: parse_decimal(&response.volume, "volume")?,
        };
        Ok(ticker)
    }
}

fn parse_decimal(raw: &str, field: &str) -> Result<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| WicklineError::MalformedMessage(format!("invalid ticker {field}: {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_string_fields() {
        let json = r#"{
            "symbol": "ETHUSDT",
            "priceChange": "-15.45",
            "priceChangePercent": "-0.68",
            "lastPrice": "2250.55",
            "highPrice": "2300.00",
            "lowPrice": "2200.00",
            "volume": "45678.12",
            "count": 1000
        }"#;

        let response: TickerResponse = serde_json::from_str(json).unwrap();
        let ticker = Ticker::try_from(response).unwrap();

        assert_eq!(ticker.last_price, 2250.55);
        assert_eq!(ticker.change, -15.45);
        assert_eq!(ticker.change_percent, -0.68);
        assert!(!ticker.is_up());
    }

    #[test]
    fn rejects_unparseable_price() {
        let response = TickerResponse {
            symbol: "BTCUSDT".into(),
            last_price: "n/a".into(),
            price_change: "0".into(),
            price_change_percent: "0".into(),
            high_price: "0".into(),
            low_price: "0".into(),
            volume: "0".into(),
        };
        let err = Ticker::try_from(response).unwrap_err();
        assert!(err.to_string().contains("lastPrice"));
    }
}
