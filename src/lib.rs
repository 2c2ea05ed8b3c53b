//! Terminal market chart library.
//!
//! Polls OHLCV bars and a 24h ticker for one `(symbol, timeframe)` pair,
//! derives moving averages, maps everything into pixel space, and draws
//! a candlestick pane and a companion volume pane. The pipeline in
//! [`chart`] is pure and renders onto any [`chart::DrawingSurface`]; the
//! [`tui`] module hosts it in a terminal.

pub mod chart;
pub mod config;
pub mod controller;
pub mod error;
pub mod feed;
pub mod models;
pub mod tui;

pub use error::{Result, WicklineError};
