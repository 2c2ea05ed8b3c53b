//! Terminal setup and teardown utilities.

use std::io::{self, IsTerminal, Stdout};

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::warn;

use crate::{Result, WicklineError};

/// Type alias for our terminal backend.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Owns the terminal while the UI runs and restores it on drop, including
/// when the draw loop returns early with an error.
pub struct TerminalGuard {
    terminal: Tui,
    restored: bool,
}

impl TerminalGuard {
    /// Enables raw mode and switches to the alternate screen buffer.
    ///
    /// # Errors
    ///
    /// Returns [`WicklineError::Io`] if stdout is not a TTY or terminal
    /// initialization fails.
    pub fn enter() -> Result<Self> {
        if !io::stdout().is_terminal() {
            return Err(WicklineError::Io(
                "the chart needs an interactive terminal (TTY)".to_string(),
            ));
        }

        enable_raw_mode().map_err(|e| WicklineError::Io(format!("failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|e| {
            let _ = disable_raw_mode();
            WicklineError::Io(format!("failed to enter alternate screen: {e}"))
        })?;

        let terminal = Terminal::new(CrosstermBackend::new(stdout)).map_err(|e| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            WicklineError::Io(format!("failed to create terminal: {e}"))
        })?;

        Ok(Self {
            terminal,
            restored: false,
        })
    }

    pub fn terminal(&mut self) -> &mut Tui {
        &mut self.terminal
    }

    /// Disables raw mode and returns to the main screen buffer.
    ///
    /// # Errors
    ///
    /// Returns [`WicklineError::Io`] if terminal restoration fails.
    pub fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode().map_err(|e| WicklineError::Io(e.to_string()))?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .map_err(|e| WicklineError::Io(e.to_string()))?;
        self.terminal
            .show_cursor()
            .map_err(|e| WicklineError::Io(e.to_string()))?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!(error = %e, "Failed to restore terminal");
        }
    }
}
