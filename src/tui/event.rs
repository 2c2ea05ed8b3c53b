//! Event handling for the TUI.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use crate::Result;
use crate::controller::{Applied, FetchTicket};
use crate::feed::{DataFeed, FeedSnapshot};
use crate::models::Timeframe;

use super::app::App;

/// Events that can occur in the terminal.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// Periodic tick for UI housekeeping.
    Tick,
}

/// Messages that update application state.
#[derive(Debug)]
pub enum Message {
    /// Input event from terminal.
    Input(Event),
    /// The refresh timer fired.
    RefreshDue,
    /// A fetch settled.
    FeedResult {
        ticket: FetchTicket,
        result: Result<FeedSnapshot>,
    },
}

/// Side effects requested by [`update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Run a fetch and report back with this ticket.
    Fetch(FetchTicket),
}

/// Spawns a task that polls for terminal events and sends them to a channel.
pub fn spawn_event_reader(tx: mpsc::UnboundedSender<Message>) {
    tokio::spawn(async move {
        loop {
            // Poll for events with a 50ms timeout
            match tokio::task::spawn_blocking(|| {
                if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            })
            .await
            {
                Ok(Some(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                    if tx.send(Message::Input(Event::Key(key))).is_err() {
                        break;
                    }
                }
                Ok(Some(CrosstermEvent::Resize(w, h))) => {
                    if tx.send(Message::Input(Event::Resize(w, h))).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });
}

/// Spawns a task that sends periodic tick events.
pub fn spawn_tick_timer(tx: mpsc::UnboundedSender<Message>, interval_ms: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
        loop {
            interval.tick().await;
            if tx.send(Message::Input(Event::Tick)).is_err() {
                break;
            }
        }
    });
}

/// Repeating refresh task, cancelled when dropped.
///
/// The first tick fires one full period after start; the initial load is
/// issued by mounting the chart.
pub struct RefreshTimer {
    handle: JoinHandle<()>,
}

impl RefreshTimer {
    pub fn start(tx: mpsc::UnboundedSender<Message>, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(Message::RefreshDue).is_err() {
                    break;
                }
            }
        });
        Self { handle }
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.handle.abort();
        debug!("Refresh timer stopped");
    }
}

/// Runs one fetch in the background and reports the result.
pub fn spawn_fetch<F>(feed: Arc<F>, ticket: FetchTicket, limit: usize, tx: mpsc::UnboundedSender<Message>)
where
    F: DataFeed + 'static,
{
    tokio::spawn(async move {
        feed.subscribe(&ticket.key);
        let result = feed.snapshot(&ticket.key, limit).await;
        // The receiver is gone only during shutdown.
        let _ = tx.send(Message::FeedResult { ticket, result });
    });
}

/// Updates application state based on a message.
pub fn update(app: &mut App, message: Message) -> Option<Action> {
    match message {
        Message::Input(event) => handle_input(app, event),
        Message::RefreshDue => app.controller.on_timer_tick().map(Action::Fetch),
        Message::FeedResult { ticket, result } => {
            let applied = app.controller.apply(&ticket, result);
            if applied.needs_redraw() {
                app.last_update = Some(std::time::Instant::now());
            }
            if applied == Applied::Degraded
                && let Some(error) = app.controller.last_error()
            {
                let message = format!("Feed error: {error}");
                app.show_error(message);
            }
            None
        }
    }
}

/// Handles input events and updates application state.
fn handle_input(app: &mut App, event: Event) -> Option<Action> {
    match event {
        Event::Key(key) => handle_key(app, key),
        // The next draw rebuilds scales from the new pane sizes.
        Event::Resize(_, _) => None,
        Event::Tick => {
            app.clear_stale_errors();
            None
        }
    }
}

/// Handles key press events.
fn handle_key(app: &mut App, key: KeyEvent) -> Option<Action> {
    let ticket = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            None
        }
        KeyCode::Char('q') | KeyCode::Esc => {
            app.should_quit = true;
            None
        }

        // Timeframe
        KeyCode::Char(digit @ '1'..='6') => {
            Timeframe::from_shortcut(digit).and_then(|tf| app.select_timeframe(tf))
        }
        KeyCode::Char('[') => {
            let tf = app.timeframe().previous();
            app.select_timeframe(tf)
        }
        KeyCode::Char(']') => {
            let tf = app.timeframe().next();
            app.select_timeframe(tf)
        }

        // Symbol
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => app.next_symbol(),
        KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => app.previous_symbol(),

        // Refresh
        KeyCode::Char('r') => Some(app.controller.refresh()),

        _ => None,
    };
    ticket.map(Action::Fetch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WicklineError;
    use crate::chart::style::ChartStyle;
    use crate::config::ChartConfig;
    use crate::controller::LoadState;
    use crate::feed::synthetic::synthetic_snapshot;

    fn app() -> App {
        let config = ChartConfig {
            symbol: "BTCUSDT".to_string(),
            symbols: vec!["BTCUSDT".into(), "ETHUSDT".into()],
            timeframe: Timeframe::H1,
            capacity: 40,
        };
        App::new(&config, ChartStyle::default(), 42)
    }

    fn key(code: KeyCode) -> Message {
        Message::Input(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn fetched(action: Option<Action>) -> FetchTicket {
        match action {
            Some(Action::Fetch(ticket)) => ticket,
            None => panic!("expected a fetch"),
        }
    }

    #[test]
    fn digit_keys_switch_timeframe() {
        let mut app = app();
        let ticket = fetched(update(&mut app, key(KeyCode::Char('2'))));
        assert_eq!(ticket.key.timeframe, Timeframe::M5);
        assert!(update(&mut app, key(KeyCode::Char('2'))).is_none());
    }

    #[test]
    fn brackets_cycle_timeframe() {
        let mut app = app();
        let ticket = fetched(update(&mut app, key(KeyCode::Char(']'))));
        assert_eq!(ticket.key.timeframe, Timeframe::H4);
        let ticket = fetched(update(&mut app, key(KeyCode::Char('['))));
        assert_eq!(ticket.key.timeframe, Timeframe::H1);
    }

    #[test]
    fn tab_moves_to_next_symbol() {
        let mut app = app();
        let ticket = fetched(update(&mut app, key(KeyCode::Tab)));
        assert_eq!(ticket.key.symbol, "ETHUSDT");
    }

    #[test]
    fn refresh_due_respects_in_flight_fetch() {
        let mut app = app();
        let ticket = app.controller.mount();
        assert!(update(&mut app, Message::RefreshDue).is_none());

        let result = Ok(synthetic_snapshot(1, &ticket.key, 40, 1_700_000_000_000));
        update(&mut app, Message::FeedResult { ticket, result });
        assert_eq!(app.controller.state(), LoadState::Ready);
        assert!(app.last_update.is_some());
        assert!(update(&mut app, Message::RefreshDue).is_some());
    }

    #[test]
    fn failed_fetch_shows_error() {
        let mut app = app();
        let ticket = app.controller.mount();
        let result = Err(WicklineError::MalformedMessage("bad".to_string()));
        update(&mut app, Message::FeedResult { ticket, result });

        assert_eq!(app.controller.state(), LoadState::Degraded);
        let shown = app.error_message.as_ref().map(|e| e.message.clone());
        assert!(shown.unwrap().contains("bad"));
    }

    #[test]
    fn stale_failure_is_silent() {
        let mut app = app();
        let old = app.controller.mount();
        update(&mut app, key(KeyCode::Tab));
        let result = Err(WicklineError::MalformedMessage("late".to_string()));
        update(&mut app, Message::FeedResult { ticket: old, result });

        assert!(app.error_message.is_none());
        assert_eq!(app.controller.state(), LoadState::Loading);
    }

    #[test]
    fn quit_keys() {
        let mut first = app();
        update(&mut first, key(KeyCode::Char('q')));
        assert!(first.should_quit);

        let mut second = app();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        update(&mut second, Message::Input(Event::Key(ctrl_c)));
        assert!(second.should_quit);
    }

    #[tokio::test]
    async fn refresh_timer_stops_on_drop() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = RefreshTimer::start(tx, Duration::from_millis(10));
        assert!(matches!(rx.recv().await, Some(Message::RefreshDue)));

        drop(timer);
        // The aborted task drops its sender, closing the channel.
        while rx.recv().await.is_some() {}
    }
}
