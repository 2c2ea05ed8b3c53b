//! Chart colors and layout parameters.

use std::path::Path;

use serde::Deserialize;

use super::scale::{DEFAULT_PADDING_RATIO, IndexPadding};
use super::surface::Rgba;

/// Color assigned to one moving-average overlay.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct OverlayStyle {
    pub period: usize,
    pub color: Rgba,
}

/// Visual configuration for the price and volume panes, loaded from
/// an optional JSON file. Every field is optional in the file; missing
/// fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub background: Rgba,
    pub grid: Rgba,
    pub text: Rgba,
    pub bullish: Rgba,
    pub bearish: Rgba,
    /// Number of horizontal grid lines in the price pane.
    pub grid_lines: usize,
    /// Fraction of the price range added above and below the data.
    pub padding_ratio: f64,
    /// Pixels left of the first bar.
    pub padding_left: f64,
    /// Pixels right of the last bar, reserved for price labels.
    pub padding_right: f64,
    /// Candle body width as a fraction of the per-bar slot.
    pub body_ratio: f64,
    /// Alpha applied to bullish/bearish colors in the volume pane.
    pub volume_alpha: u8,
    /// `(dash, gap)` pattern of the live-price guide line.
    pub price_line_dash: (f64, f64),
    pub moving_averages: Vec<OverlayStyle>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            background: Rgba::rgb(11, 14, 17),
            grid: Rgba::rgb(43, 49, 57),
            text: Rgba::rgb(132, 142, 156),
            bullish: Rgba::rgb(14, 203, 129),
            bearish: Rgba::rgb(246, 70, 93),
            grid_lines: 5,
            padding_ratio: DEFAULT_PADDING_RATIO,
            padding_left: 8.0,
            padding_right: 24.0,
            body_ratio: 0.8,
            volume_alpha: 128,
            price_line_dash: (4.0, 4.0),
            moving_averages: vec![
                OverlayStyle {
                    period: 7,
                    color: Rgba::rgb(240, 185, 11),
                },
                OverlayStyle {
                    period: 25,
                    color: Rgba::rgb(232, 67, 147),
                },
                OverlayStyle {
                    period: 99,
                    color: Rgba::rgb(130, 90, 255),
                },
            ],
        }
    }
}

impl ChartStyle {
    /// Loads a style from a JSON file, filling gaps with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON,
    /// or holds values no chart can be drawn with.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            crate::WicklineError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let style: Self = serde_json::from_str(&contents)?;
        style.validate()?;
        Ok(style)
    }

    fn validate(&self) -> crate::Result<()> {
        if !(self.padding_ratio.is_finite() && self.padding_ratio >= 0.0) {
            return Err(crate::WicklineError::Config(format!(
                "padding_ratio must be a non-negative number, got {}",
                self.padding_ratio
            )));
        }
        if !(self.body_ratio > 0.0 && self.body_ratio <= 1.0) {
            return Err(crate::WicklineError::Config(format!(
                "body_ratio must be in (0, 1], got {}",
                self.body_ratio
            )));
        }
        if let Some(overlay) = self.moving_averages.iter().find(|o| o.period == 0) {
            return Err(crate::WicklineError::Config(format!(
                "moving average period must be positive, got {}",
                overlay.period
            )));
        }
        Ok(())
    }

    /// Configured SMA periods in overlay order.
    pub fn periods(&self) -> Vec<usize> {
        self.moving_averages.iter().map(|o| o.period).collect()
    }

    /// Color for an SMA period, or the text color if it has none.
    pub fn overlay_color(&self, period: usize) -> Rgba {
        self.moving_averages
            .iter()
            .find(|o| o.period == period)
            .map_or(self.text, |o| o.color)
    }

    pub fn index_padding(&self) -> IndexPadding {
        IndexPadding {
            left: self.padding_left,
            right: self.padding_right,
        }
    }

    /// Candle/volume color for a bar direction.
    pub fn direction_color(&self, bullish: bool) -> Rgba {
        if bullish { self.bullish } else { self.bearish }
    }
}
