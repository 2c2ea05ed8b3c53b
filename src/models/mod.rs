//! Market data models shared by the feed, the chart pipeline and the UI.
//!
//! Contains the OHLCV bar types, the live ticker snapshot, timeframes,
//! and the `(symbol, timeframe)` key that identifies a chart window.

pub mod bar;
pub mod ticker;
pub mod timeframe;

use std::fmt;

pub use bar::{BarDefect, OhlcvBar, RawBar};
pub use ticker::Ticker;
pub use timeframe::Timeframe;

/// Identifies the series a chart window was built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChartKey {
    pub symbol: String,
    pub timeframe: Timeframe,
}

impl ChartKey {
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
        }
    }
}

impl fmt::Display for ChartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.symbol, self.timeframe)
    }
}
