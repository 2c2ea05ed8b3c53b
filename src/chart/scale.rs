//! Linear value-to-pixel mappings for the price and volume panes.
//!
//! Pixel coordinates have their origin at the top-left corner of a pane
//! with `y` growing downwards, so price and volume scales map larger
//! values to smaller `y`.

use super::window::ChartWindow;

/// Default fraction of the price range added above and below the data.
pub const DEFAULT_PADDING_RATIO: f64 = 0.1;

/// Pixel dimensions of a drawing pane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PaneSize {
    pub width: f64,
    pub height: f64,
}

impl PaneSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A pane with no drawable area gets no scales and no draw calls.
    pub fn has_area(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Horizontal insets for the bar index axis, leaving room for labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexPadding {
    pub left: f64,
    pub right: f64,
}

/// A linear transform from `[domain_min, domain_max]` onto
/// `[range_min, range_max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub domain_min: f64,
    pub domain_max: f64,
    pub range_min: f64,
    pub range_max: f64,
}

impl Scale {
    pub fn new(domain_min: f64, domain_max: f64, range_min: f64, range_max: f64) -> Self {
        Self {
            domain_min,
            domain_max,
            range_min,
            range_max,
        }
    }

    pub fn domain_span(&self) -> f64 {
        self.domain_max - self.domain_min
    }

    pub fn range_span(&self) -> f64 {
        self.range_max - self.range_min
    }

    /// Maps a domain value to a pixel coordinate.
    ///
    /// A zero-width domain (one bar, or a perfectly flat series) maps
    /// everything to the middle of the range.
    pub fn map(&self, value: f64) -> f64 {
        let span = self.domain_span();
        if span == 0.0 {
            return (self.range_min + self.range_max) / 2.0;
        }
        self.range_min + (value - self.domain_min) / span * self.range_span()
    }

    /// Maps a pixel coordinate back to a domain value.
    pub fn invert(&self, pixel: f64) -> f64 {
        let span = self.range_span();
        if span == 0.0 {
            return (self.domain_min + self.domain_max) / 2.0;
        }
        self.domain_min + (pixel - self.range_min) / span * self.domain_span()
    }

    /// `count` evenly spaced pixel positions from `range_min` to
    /// `range_max` inclusive, each paired with its domain value.
    pub fn ticks(&self, count: usize) -> Vec<(f64, f64)> {
        match count {
            0 => Vec::new(),
            1 => {
                let mid = (self.range_min + self.range_max) / 2.0;
                vec![(mid, self.invert(mid))]
            }
            _ => (0..count)
                .map(|i| {
                    let t = i as f64 / (count - 1) as f64;
                    let pixel = self.range_min + t * self.range_span();
                    (pixel, self.invert(pixel))
                })
                .collect(),
        }
    }
}

/// Builds the price axis for the candlestick pane.
///
/// The domain is `[min(low) - pad, max(high) + pad]` with
/// `pad = (max(high) - min(low)) * padding_ratio`, mapped onto
/// `[pane_height, 0]`. Returns `None` for an empty window or a zero-height
/// pane.
pub fn build_price_scale(window: &ChartWindow, pane_height: f64, padding_ratio: f64) -> Option<Scale> {
    if !(pane_height.is_finite() && pane_height > 0.0) {
        return None;
    }
    let (low, high) = window.price_range()?;
    let pad = (high - low) * padding_ratio;
    Some(Scale::new(low - pad, high + pad, pane_height, 0.0))
}

/// Builds the bar index axis shared by every renderer of a pane.
///
/// Index `0` lands on `padding.left` and index `len - 1` on
/// `pane_width - padding.right`. With a single bar the domain collapses
/// and the bar sits at the middle of that span. Returns `None` when
/// there are no bars or the pane has no width.
pub fn build_index_scale(len: usize, pane_width: f64, padding: IndexPadding) -> Option<Scale> {
    if len == 0 || !(pane_width.is_finite() && pane_width > 0.0) {
        return None;
    }
    let left = padding.left.clamp(0.0, pane_width);
    let right = (pane_width - padding.right).max(left);
    Some(Scale::new(0.0, (len - 1) as f64, left, right))
}

/// Builds the volume axis: `[0, max(volume)]` onto `[pane_height, 0]`,
/// without padding.
///
/// A window whose volumes are all zero keeps a unit domain so every bar
/// sits on the baseline instead of floating at mid-height.
pub fn build_volume_scale(window: &ChartWindow, pane_height: f64) -> Option<Scale> {
    if !(pane_height.is_finite() && pane_height > 0.0) {
        return None;
    }
    let max_volume = window.max_volume()?;
    let domain_max = if max_volume > 0.0 { max_volume } else { 1.0 };
    Some(Scale::new(0.0, domain_max, pane_height, 0.0))
}
