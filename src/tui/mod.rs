//! Terminal front end for the chart.
//!
//! Provides a Ratatui-based TUI that shows one symbol at a time: a
//! candlestick pane with moving averages and a live-price line, a volume
//! pane, and the ticker, feed and data-quality status around them.

pub mod app;
pub mod canvas;
pub mod components;
pub mod event;
pub mod terminal;
pub mod ui;

pub use app::App;
pub use event::{Action, Event, Message, RefreshTimer};
pub use terminal::{TerminalGuard, Tui};
pub use ui::render;
