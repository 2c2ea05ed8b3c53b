//! OHLCV bar models.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Result, WicklineError};

/// A bar exactly as delivered by a feed, before any validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    /// Bucket start, milliseconds since the Unix epoch.
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// Bucket end, milliseconds since the Unix epoch.
    pub close_time: i64,
}

impl RawBar {
    /// Parses one kline row in the array layout used by Binance-style
    /// REST APIs: `[openTime, open, high, low, close, volume, closeTime, ...]`.
    ///
    /// Prices may be encoded either as JSON numbers or as decimal strings.
    /// Trailing columns (quote volume, trade count, ...) are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`WicklineError::MalformedMessage`] if the row is not an
    /// array of at least seven fields or a field has the wrong type.
    pub fn from_kline(row: &Value) -> Result<Self> {
        let fields = row
            .as_array()
            .ok_or_else(|| WicklineError::MalformedMessage("kline row is not an array".into()))?;
        if fields.len() < 7 {
            return Err(WicklineError::MalformedMessage(format!(
                "kline row has {} fields, expected at least 7",
                fields.len()
            )));
        }

        Ok(Self {
            open_time: int_field(&fields[0], "openTime")?,
            open: float_field(&fields[1], "open")?,
            high: float_field(&fields[2], "high")?,
            low: float_field(&fields[3], "low")?,
            close: float_field(&fields[4], "close")?,
            volume: float_field(&fields[5], "volume")?,
            close_time: int_field(&fields[6], "closeTime")?,
        })
    }
}

/// Parses a whole kline response body (an array of rows).
///
/// # Errors
///
/// Returns [`WicklineError::MalformedMessage`] if the body is not an
/// array or any row fails [`RawBar::from_kline`].
pub fn parse_klines(body: &Value) -> Result<Vec<RawBar>> {
    body.as_array()
        .ok_or_else(|| WicklineError::MalformedMessage("kline response is not an array".into()))?
        .iter()
        .map(RawBar::from_kline)
        .collect()
}

fn float_field(value: &Value, name: &str) -> Result<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| WicklineError::MalformedMessage(format!("invalid kline field {name}: {value}")))
}

fn int_field(value: &Value, name: &str) -> Result<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| WicklineError::MalformedMessage(format!("invalid kline field {name}: {value}")))
}

/// A validated OHLCV bar.
///
/// Only [`OhlcvBar::validate`] constructs these from feed data, so every
/// instance satisfies `low <= min(open, close) <= max(open, close) <= high`,
/// `open_time < close_time`, finite prices and a non-negative volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OhlcvBar {
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub close_time: i64,
}

/// Why a raw bar was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarDefect {
    /// A price or the volume is NaN or infinite.
    NonFinite,
    /// Volume is below zero.
    NegativeVolume,
    /// The OHLC ordering invariant does not hold.
    OhlcOrder,
    /// `open_time` is not strictly before `close_time`.
    TimeOrder,
}

impl fmt::Display for BarDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            BarDefect::NonFinite => "non-finite value",
            BarDefect::NegativeVolume => "negative volume",
            BarDefect::OhlcOrder => "low <= min(open, close) <= max(open, close) <= high violated",
            BarDefect::TimeOrder => "open_time is not before close_time",
        };
        f.write_str(reason)
    }
}

impl OhlcvBar {
    /// Checks every per-bar invariant and returns the validated bar.
    ///
    /// # Errors
    ///
    /// Returns the first [`BarDefect`] found.
    pub fn validate(raw: &RawBar) -> std::result::Result<Self, BarDefect> {
        let values = [raw.open, raw.high, raw.low, raw.close, raw.volume];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(BarDefect::NonFinite);
        }
        if raw.volume < 0.0 {
            return Err(BarDefect::NegativeVolume);
        }
        let body_low = raw.open.min(raw.close);
        let body_high = raw.open.max(raw.close);
        if !(raw.low <= body_low && body_high <= raw.high) {
            return Err(BarDefect::OhlcOrder);
        }
        if raw.open_time >= raw.close_time {
            return Err(BarDefect::TimeOrder);
        }

        Ok(Self {
            open_time: raw.open_time,
            open: raw.open,
            high: raw.high,
            low: raw.low,
            close: raw.close,
            volume: raw.volume,
            close_time: raw.close_time,
        })
    }

    /// A bar whose close is at or above its open. Doji bars count as bullish.
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    /// Upper edge of the candle body.
    pub fn body_high(&self) -> f64 {
        self.open.max(self.close)
    }

    /// Lower edge of the candle body.
    pub fn body_low(&self) -> f64 {
        self.open.min(self.close)
    }
}
