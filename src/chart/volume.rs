//! Companion volume pane.

use super::candles::candle_width;
use super::scale::Scale;
use super::style::ChartStyle;
use super::surface::{DrawingSurface, Fill, PixelRect};
use super::window::ChartWindow;

/// Draws one translucent bar per window entry, growing up from the
/// bottom edge, colored by that bar's direction.
///
/// Bars line up with the candles above them (same index scale convention
/// and body width). Zero-volume bars produce no rectangle.
pub fn render_volume(
    window: &ChartWindow,
    volume_scale: Option<&Scale>,
    index_scale: Option<&Scale>,
    style: &ChartStyle,
    surface: &mut dyn DrawingSurface,
) {
    let (Some(volume_scale), Some(index_scale)) = (volume_scale, index_scale) else {
        return;
    };
    let size = surface.size();
    if window.is_empty() || !size.has_area() {
        return;
    }

    surface.clear(style.background);

    let baseline = volume_scale.map(0.0);
    let width = candle_width(size.width, window.len(), style.body_ratio);

    for (i, bar) in window.bars().iter().enumerate() {
        let top = volume_scale.map(bar.volume);
        let height = baseline - top;
        if height <= 0.0 {
            continue;
        }
        let color = style
            .direction_color(bar.is_bullish())
            .with_alpha(style.volume_alpha);
        surface.rect(
            PixelRect {
                x: index_scale.map(i as f64) - width / 2.0,
                y: top,
                width,
                height,
            },
            Fill::Solid(color),
        );
    }
}
