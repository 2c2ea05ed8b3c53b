//! Moving-average polylines drawn over the candlesticks.

use std::collections::BTreeMap;

use super::indicator::MovingAverageSeries;
use super::scale::Scale;
use super::style::ChartStyle;
use super::surface::{DrawingSurface, Point, Stroke};
use super::window::ChartWindow;

/// Draws one polyline per non-empty series, in the series' assigned color.
///
/// Series shorter than two points are skipped: a window shorter than the
/// period has no line to draw, and a lone point is not drawn either.
pub fn render_overlays(
    moving_averages: &BTreeMap<usize, MovingAverageSeries>,
    window: &ChartWindow,
    price_scale: Option<&Scale>,
    index_scale: Option<&Scale>,
    style: &ChartStyle,
    surface: &mut dyn DrawingSurface,
) {
    let (Some(price_scale), Some(index_scale)) = (price_scale, index_scale) else {
        return;
    };
    if window.is_empty() || !surface.size().has_area() {
        return;
    }

    for series in moving_averages.values() {
        if series.is_empty() || series.period > window.len() {
            continue;
        }
        let points: Vec<Point> = series
            .values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                Point::new(
                    index_scale.map(series.bar_index(i) as f64),
                    price_scale.map(value),
                )
            })
            .collect();
        if points.len() < 2 {
            continue;
        }
        surface.polyline(&points, Stroke::solid(style.overlay_color(series.period), 1.0));
    }
}
