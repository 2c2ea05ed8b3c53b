//! Application state for the TUI.

use std::time::{Duration, Instant};

use crate::chart::style::ChartStyle;
use crate::config::ChartConfig;
use crate::controller::{FetchTicket, RefreshController};
use crate::models::{ChartKey, Timeframe};

/// How long an error stays in the status bar.
const ERROR_DISPLAY_TIMEOUT: Duration = Duration::from_secs(5);

/// Central application state container.
pub struct App {
    // -- Chart State --
    /// Owns the window, ticker and refresh state machine.
    pub controller: RefreshController,
    /// Colors and geometry for every pane.
    pub style: ChartStyle,

    // -- Symbol Selector --
    /// Symbols cycled with `h`/`l`/`Tab`.
    pub symbols: Vec<String>,
    /// Index of the displayed symbol in `symbols`.
    pub symbol_index: usize,

    // -- UI State --
    /// Error message to display (clears after timeout).
    pub error_message: Option<ErrorDisplay>,
    /// When the last delivery was applied.
    pub last_update: Option<Instant>,

    // -- Internal --
    /// Flag to signal application should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates the app showing `config.symbol` at `config.timeframe`.
    pub fn new(config: &ChartConfig, style: ChartStyle, seed: u64) -> Self {
        let symbols = if config.symbols.is_empty() {
            vec![config.symbol.clone()]
        } else {
            config.symbols.clone()
        };
        let symbol_index = symbols
            .iter()
            .position(|s| *s == config.symbol)
            .unwrap_or(0);
        let key = ChartKey::new(symbols[symbol_index].clone(), config.timeframe);

        Self {
            controller: RefreshController::new(key, config.capacity, style.periods(), seed),
            style,

            symbols,
            symbol_index,

            error_message: None,
            last_update: None,

            should_quit: false,
        }
    }

    /// The symbol currently displayed.
    pub fn current_symbol(&self) -> &str {
        &self.controller.key().symbol
    }

    pub fn timeframe(&self) -> Timeframe {
        self.controller.key().timeframe
    }

    /// Moves the selector right, wrapping around.
    pub fn next_symbol(&mut self) -> Option<FetchTicket> {
        if self.symbols.is_empty() {
            return None;
        }
        self.symbol_index = (self.symbol_index + 1) % self.symbols.len();
        self.select_current_symbol()
    }

    /// Moves the selector left, wrapping around.
    pub fn previous_symbol(&mut self) -> Option<FetchTicket> {
        if self.symbols.is_empty() {
            return None;
        }
        self.symbol_index = if self.symbol_index == 0 {
            self.symbols.len() - 1
        } else {
            self.symbol_index - 1
        };
        self.select_current_symbol()
    }

    pub fn select_timeframe(&mut self, timeframe: Timeframe) -> Option<FetchTicket> {
        self.controller.select_timeframe(timeframe)
    }

    fn select_current_symbol(&mut self) -> Option<FetchTicket> {
        let symbol = self.symbols[self.symbol_index].clone();
        self.controller.select_symbol(&symbol)
    }

    /// Shows an error message in the status bar.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(ErrorDisplay {
            message: message.into(),
            timestamp: Instant::now(),
        });
    }

    /// Clears error messages older than the display timeout.
    pub fn clear_stale_errors(&mut self) {
        if let Some(ref error) = self.error_message
            && error.timestamp.elapsed() > ERROR_DISPLAY_TIMEOUT
        {
            self.error_message = None;
        }
    }
}

/// Error message with timestamp for auto-clearing.
#[derive(Debug, Clone)]
pub struct ErrorDisplay {
    /// The error message.
    pub message: String,
    /// When the error was shown.
    pub timestamp: Instant,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(symbol: &str) -> ChartConfig {
        ChartConfig {
            symbol: symbol.to_string(),
            symbols: vec!["BTCUSDT".into(), "ETHUSDT".into(), "SOLUSDT".into()],
            timeframe: Timeframe::H1,
            capacity: 50,
        }
    }

    #[test]
    fn starts_on_configured_symbol() {
        let app = App::new(&config("ETHUSDT"), ChartStyle::default(), 1);
        assert_eq!(app.symbol_index, 1);
        assert_eq!(app.current_symbol(), "ETHUSDT");
        assert_eq!(app.controller.capacity(), 50);
    }

    #[test]
    fn symbol_selector_wraps() {
        let mut app = App::new(&config("BTCUSDT"), ChartStyle::default(), 1);
        app.controller.mount();

        let ticket = app.previous_symbol().unwrap();
        assert_eq!(ticket.key.symbol, "SOLUSDT");
        let ticket = app.next_symbol().unwrap();
        assert_eq!(ticket.key.symbol, "BTCUSDT");
        assert_eq!(app.current_symbol(), "BTCUSDT");
    }

    #[test]
    fn single_symbol_does_not_refetch() {
        let mut cfg = config("BTCUSDT");
        cfg.symbols = vec!["BTCUSDT".into()];
        let mut app = App::new(&cfg, ChartStyle::default(), 1);
        assert!(app.next_symbol().is_none());
    }

    #[test]
    fn fresh_errors_are_kept() {
        let mut app = App::new(&config("BTCUSDT"), ChartStyle::default(), 1);
        app.show_error("feed down");
        app.clear_stale_errors();
        assert!(app.error_message.is_some());
    }
}
