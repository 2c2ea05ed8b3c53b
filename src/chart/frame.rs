//! One frozen frame of chart state and the full redraw pipeline.

use std::collections::BTreeMap;

use super::candles::render_candles;
use super::indicator::MovingAverageSeries;
use super::overlay::render_overlays;
use super::scale::{PaneSize, Scale, build_index_scale, build_price_scale, build_volume_scale};
use super::style::ChartStyle;
use super::surface::DrawingSurface;
use super::volume::render_volume;
use super::window::ChartWindow;
use crate::models::Ticker;

/// Everything a redraw reads, borrowed immutably for the duration of
/// one frame. Scales are recomputed from the window and the current pane
/// sizes every time a frame is built.
#[derive(Debug, Clone)]
pub struct ChartFrame<'a> {
    pub window: &'a ChartWindow,
    pub ticker: Option<&'a Ticker>,
    pub moving_averages: &'a BTreeMap<usize, MovingAverageSeries>,
    pub price_scale: Option<Scale>,
    pub price_index: Option<Scale>,
    pub volume_scale: Option<Scale>,
    pub volume_index: Option<Scale>,
}

impl<'a> ChartFrame<'a> {
    /// Runs the scale step for both panes.
    ///
    /// A pane without area gets `None` scales, which every renderer
    /// treats as "draw nothing".
    pub fn build(
        window: &'a ChartWindow,
        ticker: Option<&'a Ticker>,
        moving_averages: &'a BTreeMap<usize, MovingAverageSeries>,
        price_pane: PaneSize,
        volume_pane: PaneSize,
        style: &ChartStyle,
    ) -> Self {
        let padding = style.index_padding();
        let (price_scale, price_index) = if price_pane.has_area() {
            (
                build_price_scale(window, price_pane.height, style.padding_ratio),
                build_index_scale(window.len(), price_pane.width, padding),
            )
        } else {
            (None, None)
        };
        let (volume_scale, volume_index) = if volume_pane.has_area() {
            (
                build_volume_scale(window, volume_pane.height),
                build_index_scale(window.len(), volume_pane.width, padding),
            )
        } else {
            (None, None)
        };

        Self {
            window,
            ticker,
            moving_averages,
            price_scale,
            price_index,
            volume_scale,
            volume_index,
        }
    }

    /// Whether at least one pane has scales to draw with.
    pub fn is_drawable(&self) -> bool {
        (self.price_scale.is_some() && self.price_index.is_some())
            || (self.volume_scale.is_some() && self.volume_index.is_some())
    }

    /// Draws candlesticks, then overlays, then volume.
    pub fn render(
        &self,
        style: &ChartStyle,
        price_surface: &mut dyn DrawingSurface,
        volume_surface: &mut dyn DrawingSurface,
    ) {
        render_candles(
            self.window,
            self.price_scale.as_ref(),
            self.price_index.as_ref(),
            self.ticker,
            style,
            price_surface,
        );
        render_overlays(
            self.moving_averages,
            self.window,
            self.price_scale.as_ref(),
            self.price_index.as_ref(),
            style,
            price_surface,
        );
        render_volume(
            self.window,
            self.volume_scale.as_ref(),
            self.volume_index.as_ref(),
            style,
            volume_surface,
        );
    }
}
