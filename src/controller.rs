//! Refresh controller: owns the displayed window and decides when to
//! fetch.
//!
//! The controller never performs I/O itself. Every transition into
//! `Loading` hands out a [`FetchTicket`] stamped with a generation
//! number; the host runs the fetch and passes the ticket back to
//! [`RefreshController::apply`] with the result. Switching symbol or
//! timeframe bumps the generation, so a late response for the old key
//! no longer matches and is dropped.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::Result;
use crate::chart::frame::ChartFrame;
use crate::chart::indicator::{MovingAverageSeries, compute_moving_averages};
use crate::chart::scale::PaneSize;
use crate::chart::style::ChartStyle;
use crate::chart::window::{ChartWindow, QualityReport, ingest};
use crate::feed::synthetic::synthetic_snapshot;
use crate::feed::{FeedSnapshot, FeedSource};
use crate::models::{ChartKey, Ticker, Timeframe};

/// Where the controller is in its refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    Idle,
    /// A fetch is outstanding.
    Loading,
    /// The window holds data from the last successful fetch.
    Ready,
    /// The last fetch failed; the window holds last-good or synthetic data.
    Degraded,
}

impl LoadState {
    pub fn label(&self) -> &'static str {
        match self {
            LoadState::Idle => "Idle",
            LoadState::Loading => "Loading",
            LoadState::Ready => "Ready",
            LoadState::Degraded => "Degraded",
        }
    }
}

/// Feed health, for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    Online,
    Offline,
}

impl FeedStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FeedStatus::Online => "online",
            FeedStatus::Offline => "offline",
        }
    }
}

/// Identifies one fetch. Returned to [`RefreshController::apply`]
/// together with the fetch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub key: ChartKey,
    pub generation: u64,
}

/// Outcome of [`RefreshController::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// New bars were installed.
    Ready,
    /// The fetch failed and fallback data is shown.
    Degraded,
    /// The ticket was superseded; nothing changed.
    Stale,
}

impl Applied {
    /// Whether the displayed data changed and a redraw is due.
    pub fn needs_redraw(&self) -> bool {
        !matches!(self, Applied::Stale)
    }
}

/// Owns the [`ChartWindow`], ticker and moving averages for one chart.
#[derive(Debug)]
pub struct RefreshController {
    key: ChartKey,
    capacity: usize,
    periods: Vec<usize>,
    seed: u64,
    generation: u64,
    in_flight: Option<u64>,
    state: LoadState,
    status: FeedStatus,
    window: ChartWindow,
    ticker: Option<Ticker>,
    moving_averages: BTreeMap<usize, MovingAverageSeries>,
    quality: QualityReport,
    last_error: Option<String>,
}

impl RefreshController {
    /// Creates an idle controller for `key`.
    ///
    /// `periods` are the moving averages recomputed on every refresh and
    /// `seed` drives the synthetic fallback series.
    pub fn new(key: ChartKey, capacity: usize, periods: Vec<usize>, seed: u64) -> Self {
        Self {
            window: ChartWindow::empty(key.clone()),
            key,
            capacity,
            periods,
            seed,
            generation: 0,
            in_flight: None,
            state: LoadState::Idle,
            status: FeedStatus::Online,
            ticker: None,
            moving_averages: BTreeMap::new(),
            quality: QualityReport::default(),
            last_error: None,
        }
    }

    pub fn key(&self) -> &ChartKey {
        &self.key
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn status(&self) -> FeedStatus {
        self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn window(&self) -> &ChartWindow {
        &self.window
    }

    pub fn ticker(&self) -> Option<&Ticker> {
        self.ticker.as_ref()
    }

    pub fn moving_averages(&self) -> &BTreeMap<usize, MovingAverageSeries> {
        &self.moving_averages
    }

    /// Counters from the most recent ingest.
    pub fn quality(&self) -> QualityReport {
        self.quality
    }

    /// Message from the most recent failed fetch, cleared on success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Initial load when the chart is first shown.
    pub fn mount(&mut self) -> FetchTicket {
        info!(key = %self.key, "Chart mounted");
        self.begin()
    }

    /// Periodic refresh. Skipped while a fetch is still outstanding so
    /// two refreshes never race to set the window.
    pub fn on_timer_tick(&mut self) -> Option<FetchTicket> {
        if let Some(generation) = self.in_flight {
            debug!(key = %self.key, generation, "Timer tick skipped, fetch in flight");
            return None;
        }
        Some(self.begin())
    }

    /// User-requested refresh. Supersedes any outstanding fetch.
    pub fn refresh(&mut self) -> FetchTicket {
        self.begin()
    }

    /// Switches to another symbol. Returns `None` if it is already shown.
    pub fn select_symbol(&mut self, symbol: &str) -> Option<FetchTicket> {
        if self.key.symbol == symbol {
            return None;
        }
        Some(self.switch_to(ChartKey::new(symbol, self.key.timeframe)))
    }

    /// Switches to another timeframe. Returns `None` if it is already shown.
    pub fn select_timeframe(&mut self, timeframe: Timeframe) -> Option<FetchTicket> {
        if self.key.timeframe == timeframe {
            return None;
        }
        Some(self.switch_to(ChartKey::new(self.key.symbol.clone(), timeframe)))
    }

    /// Installs the result of the fetch identified by `ticket`.
    ///
    /// Results for superseded tickets are ignored. A failed fetch keeps
    /// the last-good window for the current key; with nothing to keep, a
    /// synthetic series is generated from the configured seed. A delivery
    /// with no usable bars also keeps the last-good window and degrades.
    pub fn apply(&mut self, ticket: &FetchTicket, result: Result<FeedSnapshot>) -> Applied {
        if ticket.generation != self.generation || ticket.key != self.key {
            debug!(
                ticket_key = %ticket.key,
                ticket_generation = ticket.generation,
                current_key = %self.key,
                current_generation = self.generation,
                "Discarding stale feed response"
            );
            return Applied::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(snapshot) => {
                self.status = match snapshot.source {
                    FeedSource::Live => FeedStatus::Online,
                    FeedSource::Synthetic => FeedStatus::Offline,
                };
                let (window, quality) = ingest(self.key.clone(), &snapshot.bars, self.capacity);
                if window.is_empty() && !self.window.is_empty() {
                    warn!(
                        key = %self.key,
                        received = quality.received,
                        dropped = quality.dropped(),
                        kept = self.window.len(),
                        "Feed delivered no usable bars, keeping last good window"
                    );
                    self.quality = quality;
                    self.last_error = Some("feed delivered no usable bars".to_string());
                    self.state = LoadState::Degraded;
                    return Applied::Degraded;
                }
                self.last_error = None;
                self.install(window, quality, snapshot.ticker);
                self.state = LoadState::Ready;
                Applied::Ready
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "Feed request failed");
                self.status = FeedStatus::Offline;
                self.last_error = Some(err.to_string());
                if self.window.is_empty() {
                    let now = chrono::Utc::now().timestamp_millis();
                    info!(key = %self.key, seed = self.seed, "Falling back to synthetic series");
                    let fallback = synthetic_snapshot(self.seed, &self.key, self.capacity, now);
                    let (window, quality) = ingest(self.key.clone(), &fallback.bars, self.capacity);
                    self.install(window, quality, fallback.ticker);
                } else {
                    debug!(key = %self.key, bars = self.window.len(), "Keeping last good window");
                }
                self.state = LoadState::Degraded;
                Applied::Degraded
            }
        }
    }

    /// Freezes the current state into a frame for the given pane sizes.
    pub fn frame(&self, price_pane: PaneSize, volume_pane: PaneSize, style: &ChartStyle) -> ChartFrame<'_> {
        ChartFrame::build(
            &self.window,
            self.ticker.as_ref(),
            &self.moving_averages,
            price_pane,
            volume_pane,
            style,
        )
    }

    fn begin(&mut self) -> FetchTicket {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        self.state = LoadState::Loading;
        debug!(key = %self.key, generation = self.generation, "Refresh started");
        FetchTicket {
            key: self.key.clone(),
            generation: self.generation,
        }
    }

    fn switch_to(&mut self, key: ChartKey) -> FetchTicket {
        info!(from = %self.key, to = %key, "Switching chart");
        self.window = ChartWindow::empty(key.clone());
        self.key = key;
        self.ticker = None;
        self.moving_averages.clear();
        self.quality = QualityReport::default();
        self.begin()
    }

    fn install(&mut self, window: ChartWindow, quality: QualityReport, ticker: Ticker) {
        if quality.dropped() > 0 {
            warn!(key = %self.key, dropped = quality.dropped(), "Feed delivered invalid bars");
        }
        self.moving_averages = compute_moving_averages(&window, &self.periods);
        self.window = window;
        self.quality = quality;
        self.ticker = Some(ticker);
    }
}
