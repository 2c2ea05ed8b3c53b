//! Simple moving averages over closing prices.

use std::collections::{BTreeMap, VecDeque};

use tracing::warn;

use super::window::ChartWindow;

/// One SMA series aligned to the tail of a window.
///
/// `values[i]` is the mean close over bars `i ..= i + period - 1`, so the
/// first value belongs to bar index `period - 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct MovingAverageSeries {
    pub period: usize,
    pub values: Vec<f64>,
}

impl MovingAverageSeries {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Window index of the bar `values[i]` is drawn at.
    pub fn bar_index(&self, i: usize) -> usize {
        self.period - 1 + i
    }
}

/// Computes one SMA series per requested period.
///
/// Periods longer than the window produce an empty series rather than
/// partial averages. A period of zero is meaningless and also yields an
/// empty series.
pub fn compute_moving_averages(
    window: &ChartWindow,
    periods: &[usize],
) -> BTreeMap<usize, MovingAverageSeries> {
    periods
        .iter()
        .map(|&period| (period, sma(window, period)))
        .collect()
}

fn sma(window: &ChartWindow, period: usize) -> MovingAverageSeries {
    if period == 0 {
        warn!("Ignoring moving average with period 0");
        return MovingAverageSeries {
            period,
            values: Vec::new(),
        };
    }

    let len = window.len();
    let mut values = Vec::with_capacity((len + 1).saturating_sub(period));
    let mut trailing: VecDeque<f64> = VecDeque::with_capacity(period + 1);
    let mut sum = 0.0;

    for close in window.closes() {
        trailing.push_back(close);
        sum += close;
        if trailing.len() > period
            && let Some(old) = trailing.pop_front()
        {
            sum -= old;
        }
        if trailing.len() == period {
            values.push(sum / period as f64);
        }
    }

    MovingAverageSeries { period, values }
}
