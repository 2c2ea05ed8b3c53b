//! Fixed-capacity, time-ordered bar window.

use tracing::{debug, warn};

use crate::models::{ChartKey, OhlcvBar, RawBar};

/// Default number of bars kept per window.
pub const DEFAULT_CAPACITY: usize = 200;

/// The bars currently displayed for one `(symbol, timeframe)` pair.
///
/// Built only by [`ingest`]; renderers get it by shared reference and
/// never mutate it. Bars sit on the timeframe grid and are spaced exactly
/// one timeframe apart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartWindow {
    key: ChartKey,
    bars: Vec<OhlcvBar>,
}

impl ChartWindow {
    /// Creates a window with no bars.
    pub fn empty(key: ChartKey) -> Self {
        Self {
            key,
            bars: Vec::new(),
        }
    }

    pub fn key(&self) -> &ChartKey {
        &self.key
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&OhlcvBar> {
        self.bars.last()
    }

    /// Lowest low and highest high across the window.
    pub fn price_range(&self) -> Option<(f64, f64)> {
        if self.bars.is_empty() {
            return None;
        }
        Some(self.bars.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), bar| (lo.min(bar.low), hi.max(bar.high)),
        ))
    }

    /// Largest volume across the window.
    pub fn max_volume(&self) -> Option<f64> {
        self.bars.iter().map(|bar| bar.volume).reduce(f64::max)
    }

    /// Closing prices in window order.
    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|bar| bar.close)
    }
}

/// Data-quality counters from one [`ingest`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QualityReport {
    /// Raw bars handed in by the feed.
    pub received: usize,
    /// Bars kept in the resulting window.
    pub accepted: usize,
    /// Bars failing a per-bar invariant (OHLC order, NaN, times, volume).
    pub dropped_invalid: usize,
    /// Bars that were not strictly after their predecessor or off the
    /// timeframe grid.
    pub dropped_out_of_order: usize,
    /// Valid bars older than a gap in the series.
    pub dropped_gap: usize,
    /// Oldest valid bars discarded to honour the capacity.
    pub trimmed: usize,
}

impl QualityReport {
    /// Bars rejected for data-quality reasons (trimming excluded).
    pub fn dropped(&self) -> usize {
        self.dropped_invalid + self.dropped_out_of_order + self.dropped_gap
    }
}

/// Validates a feed delivery and builds the replacement window.
///
/// The previous window is discarded by the caller; nothing is merged.
/// Invalid bars are dropped and logged, never fatal. A missing slot
/// breaks the uniform spacing, so everything before it is discarded and
/// the newest contiguous run is kept. When more than `capacity` bars
/// survive, the oldest are trimmed.
pub fn ingest(key: ChartKey, raw_bars: &[RawBar], capacity: usize) -> (ChartWindow, QualityReport) {
    let step = key.timeframe.duration_ms();
    let mut report = QualityReport {
        received: raw_bars.len(),
        ..QualityReport::default()
    };
    let mut bars: Vec<OhlcvBar> = Vec::with_capacity(raw_bars.len().min(capacity));

    for raw in raw_bars {
        let bar = match OhlcvBar::validate(raw) {
            Ok(bar) => bar,
            Err(defect) => {
                warn!(
                    key = %key,
                    open_time = raw.open_time,
                    reason = %defect,
                    "Dropping invalid bar"
                );
                report.dropped_invalid += 1;
                continue;
            }
        };

        let off_grid = bar.open_time.rem_euclid(step) != 0;
        let not_after_previous = bars
            .last()
            .is_some_and(|prev| bar.open_time <= prev.open_time);
        if off_grid || not_after_previous {
            warn!(
                key = %key,
                open_time = bar.open_time,
                off_grid,
                "Dropping out-of-order bar"
            );
            report.dropped_out_of_order += 1;
            continue;
        }

        if let Some(prev) = bars.last()
            && bar.open_time != prev.open_time + step
        {
            warn!(
                key = %key,
                open_time = bar.open_time,
                expected = prev.open_time + step,
                discarded = bars.len(),
                "Gap in bars, restarting window"
            );
            report.dropped_gap += bars.len();
            bars.clear();
        }

        bars.push(bar);
    }

    if bars.len() > capacity {
        report.trimmed = bars.len() - capacity;
        bars.drain(..report.trimmed);
    }
    report.accepted = bars.len();

    debug!(
        key = %key,
        received = report.received,
        accepted = report.accepted,
        dropped = report.dropped(),
        trimmed = report.trimmed,
        "Ingested bars"
    );

    (ChartWindow { key, bars }, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Timeframe;

    const MINUTE: i64 = 60_000;

    fn key() -> ChartKey {
        ChartKey::new("BTCUSDT", Timeframe::M1)
    }

    fn raw(index: i64, close: f64) -> RawBar {
        RawBar {
            open_time: index * MINUTE,
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 10.0,
            close_time: (index + 1) * MINUTE - 1,
        }
    }

    #[test]
    fn keeps_valid_bars_in_order() {
        let raws: Vec<RawBar> = (0..5).map(|i| raw(i, 100.0 + i as f64)).collect();
        let (window, report) = ingest(key(), &raws, DEFAULT_CAPACITY);

        assert_eq!(window.len(), 5);
        assert_eq!(report.accepted, 5);
        assert_eq!(report.dropped(), 0);
        assert_eq!(window.price_range(), Some((99.0, 105.0)));
    }

    #[test]
    fn drops_invalid_bar_and_counts_it() {
        let mut raws: Vec<RawBar> = (0..4).map(|i| raw(i, 100.0)).collect();
        raws[3].high = 50.0;

        let (window, report) = ingest(key(), &raws, DEFAULT_CAPACITY);

        assert_eq!(window.len(), 3);
        assert_eq!(report.dropped_invalid, 1);
        assert!(window.bars().iter().all(|b| b.open_time != 3 * MINUTE));
    }

    #[test]
    fn gap_keeps_newest_contiguous_run() {
        let raws = vec![raw(0, 1.0), raw(1, 1.0), raw(5, 1.0), raw(6, 1.0)];
        let (window, report) = ingest(key(), &raws, DEFAULT_CAPACITY);

        let times: Vec<i64> = window.bars().iter().map(|b| b.open_time).collect();
        assert_eq!(times, vec![5 * MINUTE, 6 * MINUTE]);
        assert_eq!(report.dropped_gap, 2);
        assert_eq!(report.accepted, 2);
        assert_eq!(report.dropped(), 2);
    }

    #[test]
    fn invalid_bar_mid_series_leaves_a_gap() {
        let mut raws: Vec<RawBar> = (0..5).map(|i| raw(i, 100.0)).collect();
        raws[2].low = 200.0;

        let (window, report) = ingest(key(), &raws, DEFAULT_CAPACITY);

        assert_eq!(window.len(), 2);
        assert_eq!(window.bars()[0].open_time, 3 * MINUTE);
        assert_eq!(report.dropped_invalid, 1);
        assert_eq!(report.dropped_gap, 2);
    }

    #[test]
    fn drops_duplicate_and_off_grid_timestamps() {
        let mut raws = vec![raw(0, 1.0), raw(1, 1.0), raw(1, 1.0), raw(2, 1.0)];
        raws[3].open_time += 5;

        let (window, report) = ingest(key(), &raws, DEFAULT_CAPACITY);

        assert_eq!(window.len(), 2);
        assert_eq!(report.dropped_out_of_order, 2);
    }

    #[test]
    fn trims_oldest_when_over_capacity() {
        let raws: Vec<RawBar> = (0..10).map(|i| raw(i, i as f64 + 10.0)).collect();
        let (window, report) = ingest(key(), &raws, 4);

        assert_eq!(window.len(), 4);
        assert_eq!(report.trimmed, 6);
        assert_eq!(window.bars()[0].open_time, 6 * MINUTE);
        assert_eq!(window.last().map(|b| b.open_time), Some(9 * MINUTE));
    }

    #[test]
    fn empty_delivery_yields_empty_window() {
        let (window, report) = ingest(key(), &[], DEFAULT_CAPACITY);
        assert!(window.is_empty());
        assert_eq!(window.price_range(), None);
        assert_eq!(window.max_volume(), None);
        assert_eq!(report, QualityReport::default());
    }
}
