//! Candlestick pane: grid, axis labels, wicks, bodies and the live-price line.

use chrono::DateTime;

use super::scale::Scale;
use super::style::ChartStyle;
use super::surface::{Anchor, DrawingSurface, Fill, PixelRect, Point, Stroke, TextStyle};
use super::window::ChartWindow;
use crate::models::{OhlcvBar, Ticker, Timeframe};

/// Narrowest body drawn, in pixels.
const MIN_BODY_WIDTH: f64 = 2.0;

/// Bodies shorter than this are drawn as a flat doji tick.
const DOJI_THRESHOLD: f64 = 1.0;

/// Target number of vertical grid lines.
const VERTICAL_GRID_TARGET: usize = 10;

/// Body width shared by candles and volume bars:
/// `max(2, pane_width / len * body_ratio)`.
pub fn candle_width(pane_width: f64, len: usize, body_ratio: f64) -> f64 {
    if len == 0 {
        return MIN_BODY_WIDTH;
    }
    (pane_width / len as f64 * body_ratio).max(MIN_BODY_WIDTH)
}

/// Bullish candles (close >= open) are filled, bearish ones hollow.
pub fn candle_fill(bar: &OhlcvBar, style: &ChartStyle) -> Fill {
    if bar.is_bullish() {
        Fill::Solid(style.bullish)
    } else {
        Fill::Outline(style.bearish)
    }
}

/// Formats a price with precision chosen from its magnitude.
pub fn format_price(price: f64) -> String {
    let magnitude = price.abs();
    if magnitude >= 100.0 {
        format!("{price:.2}")
    } else if magnitude >= 1.0 {
        format!("{price:.4}")
    } else {
        format!("{price:.6}")
    }
}

/// Formats a bar's open time for the time axis.
pub fn format_time(open_time_ms: i64, timeframe: Timeframe) -> String {
    let Some(time) = DateTime::from_timestamp_millis(open_time_ms) else {
        return String::new();
    };
    if timeframe.is_intraday() {
        time.format("%H:%M").to_string()
    } else {
        time.format("%m-%d").to_string()
    }
}

/// Draws the full candlestick pane.
///
/// Does nothing at all (not even a clear) when either scale is missing,
/// the window is empty, or the surface has no area, so the previous
/// frame stays on screen.
pub fn render_candles(
    window: &ChartWindow,
    price_scale: Option<&Scale>,
    index_scale: Option<&Scale>,
    ticker: Option<&Ticker>,
    style: &ChartStyle,
    surface: &mut dyn DrawingSurface,
) {
    let (Some(price_scale), Some(index_scale)) = (price_scale, index_scale) else {
        return;
    };
    let size = surface.size();
    if window.is_empty() || !size.has_area() {
        return;
    }

    surface.clear(style.background);
    draw_price_grid(price_scale, style, surface);
    draw_time_grid(window, index_scale, style, surface);

    let body_width = candle_width(size.width, window.len(), style.body_ratio);
    for (i, bar) in window.bars().iter().enumerate() {
        draw_candle(bar, index_scale.map(i as f64), body_width, price_scale, style, surface);
    }

    if let Some(ticker) = ticker {
        draw_price_line(ticker, price_scale, style, surface);
    }
}

fn draw_price_grid(price_scale: &Scale, style: &ChartStyle, surface: &mut dyn DrawingSurface) {
    let width = surface.size().width;
    let grid = Stroke::solid(style.grid, 1.0);
    let label = TextStyle {
        color: style.text,
        background: None,
        anchor: Anchor::Right,
    };

    for (y, price) in price_scale.ticks(style.grid_lines) {
        surface.line(Point::new(0.0, y), Point::new(width, y), grid);
        surface.text(Point::new(width, y), &format_price(price), label);
    }
}

fn draw_time_grid(
    window: &ChartWindow,
    index_scale: &Scale,
    style: &ChartStyle,
    surface: &mut dyn DrawingSurface,
) {
    let height = surface.size().height;
    let grid = Stroke::solid(style.grid, 1.0);
    let label = TextStyle {
        color: style.text,
        background: None,
        anchor: Anchor::Center,
    };
    let stride = (window.len() / VERTICAL_GRID_TARGET).max(1);
    let timeframe = window.key().timeframe;

    for (i, bar) in window.bars().iter().enumerate().step_by(stride) {
        let x = index_scale.map(i as f64);
        surface.line(Point::new(x, 0.0), Point::new(x, height), grid);
        surface.text(
            Point::new(x, height),
            &format_time(bar.open_time, timeframe),
            label,
        );
    }
}

fn draw_candle(
    bar: &OhlcvBar,
    x: f64,
    body_width: f64,
    price_scale: &Scale,
    style: &ChartStyle,
    surface: &mut dyn DrawingSurface,
) {
    let fill = candle_fill(bar, style);
    let color = fill.color();
    let open_y = price_scale.map(bar.open);
    let close_y = price_scale.map(bar.close);
    let half = body_width / 2.0;

    surface.line(
        Point::new(x, price_scale.map(bar.high)),
        Point::new(x, price_scale.map(bar.low)),
        Stroke::solid(color, 1.0),
    );

    if (close_y - open_y).abs() < DOJI_THRESHOLD {
        surface.line(
            Point::new(x - half, open_y),
            Point::new(x + half, open_y),
            Stroke::solid(color, 1.0),
        );
        return;
    }

    let top = open_y.min(close_y);
    surface.rect(
        PixelRect {
            x: x - half,
            y: top,
            width: body_width,
            height: (close_y - open_y).abs(),
        },
        fill,
    );
}

fn draw_price_line(
    ticker: &Ticker,
    price_scale: &Scale,
    style: &ChartStyle,
    surface: &mut dyn DrawingSurface,
) {
    if !ticker.last_price.is_finite() {
        return;
    }
    let size = surface.size();
    let y = price_scale.map(ticker.last_price).clamp(0.0, size.height);
    let color = style.direction_color(ticker.is_up());

    surface.line(
        Point::new(0.0, y),
        Point::new(size.width, y),
        Stroke::dashed(color, 1.0, style.price_line_dash),
    );
    surface.text(
        Point::new(size.width, y),
        &format_price(ticker.last_price),
        TextStyle {
            color: style.background,
            background: Some(color),
            anchor: Anchor::Right,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::scale::{PaneSize, build_index_scale, build_price_scale};
    use crate::chart::surface::{DrawCall, DrawList};
    use crate::chart::window::ingest;
    use crate::models::{ChartKey, RawBar};

    fn window(bars: &[(f64, f64, f64, f64)]) -> ChartWindow {
        let raws: Vec<RawBar> = bars
            .iter()
            .enumerate()
            .map(|(i, &(open, high, low, close))| RawBar {
                open_time: i as i64 * 3_600_000,
                open,
                high,
                low,
                close,
                volume: 1.0,
                close_time: (i as i64 + 1) * 3_600_000 - 1,
            })
            .collect();
        ingest(ChartKey::new("BTCUSDT", Timeframe::H1), &raws, 200).0
    }

    fn draw(window: &ChartWindow, ticker: Option<&Ticker>) -> DrawList {
        let style = ChartStyle::default();
        let size = PaneSize::new(600.0, 300.0);
        let price = build_price_scale(window, size.height, style.padding_ratio);
        let index = build_index_scale(window.len(), size.width, style.index_padding());
        let mut list = DrawList::new(size);
        render_candles(
            window,
            price.as_ref(),
            index.as_ref(),
            ticker,
            &style,
            &mut list,
        );
        list
    }

    #[test]
    fn bullish_filled_bearish_hollow() {
        let style = ChartStyle::default();
        let w = window(&[(10.0, 12.0, 9.0, 11.0), (12.0, 12.5, 10.0, 10.5)]);
        let list = draw(&w, None);

        let bodies: Vec<_> = list.rects().collect();
        assert_eq!(bodies.len(), 2);
        assert_eq!(*bodies[0].1, Fill::Solid(style.bullish));
        assert_eq!(*bodies[1].1, Fill::Outline(style.bearish));
    }

    #[test]
    fn doji_draws_tick_instead_of_body() {
        let style = ChartStyle::default();
        let w = window(&[(10.0, 12.0, 8.0, 10.0), (10.0, 11.0, 9.0, 10.5)]);
        let list = draw(&w, None);

        assert_eq!(list.rects().count(), 1);
        let open_y = build_price_scale(&w, 300.0, style.padding_ratio)
            .unwrap()
            .map(10.0);
        let tick = list.calls().iter().any(|call| {
            matches!(call, DrawCall::Line { from, to, stroke }
                if from.y == open_y && to.y == open_y && from.x < to.x && stroke.color == style.bullish)
        });
        assert!(tick, "expected a horizontal doji tick at the open price");
    }

    #[test]
    fn body_width_has_floor() {
        assert_eq!(candle_width(100.0, 200, 0.8), 2.0);
        assert_eq!(candle_width(1000.0, 10, 0.8), 80.0);
    }

    #[test]
    fn frame_starts_with_clear_and_labels_grid() {
        let w = window(&[(10.0, 12.0, 9.0, 11.0), (11.0, 13.0, 10.0, 12.0)]);
        let list = draw(&w, None);

        assert!(matches!(list.calls()[0], DrawCall::Clear(_)));
        let labels: Vec<&str> = list.texts().collect();
        // Top grid line carries max(high) + pad.
        assert!(labels.contains(&"13.4000"));
        assert!(labels.contains(&"00:00"));
    }

    #[test]
    fn price_line_is_dashed_and_colored_by_change() {
        let style = ChartStyle::default();
        let w = window(&[(10.0, 12.0, 9.0, 11.0), (11.0, 13.0, 10.0, 12.0)]);
        let ticker = Ticker {
            last_price: 11.5,
            change: -0.5,
            ..Ticker::default()
        };
        let list = draw(&w, Some(&ticker));

        let dashed = list.calls().iter().find_map(|call| match call {
            DrawCall::Line { stroke, .. } if stroke.dash.is_some() => Some(*stroke),
            _ => None,
        });
        assert_eq!(dashed.map(|s| s.color), Some(style.bearish));
        assert_eq!(list.texts().last(), Some("11.5000"));
    }

    #[test]
    fn missing_scale_draws_nothing() {
        let w = window(&[(10.0, 12.0, 9.0, 11.0)]);
        let mut list = DrawList::new(PaneSize::new(600.0, 300.0));
        render_candles(&w, None, None, None, &ChartStyle::default(), &mut list);
        assert!(list.is_empty());
    }

    #[test]
    fn formats_prices_by_magnitude() {
        assert_eq!(format_price(64_123.456), "64123.46");
        assert_eq!(format_price(2.5), "2.5000");
        assert_eq!(format_price(0.000123), "0.000123");
    }

    #[test]
    fn formats_time_by_timeframe() {
        assert_eq!(format_time(3_600_000, Timeframe::H1), "01:00");
        assert_eq!(format_time(86_400_000, Timeframe::D1), "01-02");
    }
}
