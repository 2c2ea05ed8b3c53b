//! Paints a recorded [`DrawList`] onto a ratatui braille canvas.
//!
//! One terminal cell holds a 2x4 grid of braille dots, so a pane of
//! `cols x rows` cells is a `2*cols x 4*rows` pixel surface. Surface
//! coordinates grow downward; canvas coordinates grow upward, so every
//! `y` is flipped.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::canvas::{Canvas, Context, Line as CanvasLine, Rectangle},
};
use unicode_width::UnicodeWidthStr;

use crate::chart::scale::PaneSize;
use crate::chart::surface::{
    Anchor, DrawCall, DrawList, DrawingSurface, Fill, PixelRect, Point, Rgba, Stroke, TextStyle,
};

/// Horizontal dots per terminal cell.
const DOTS_PER_COLUMN: f64 = 2.0;
/// Vertical dots per terminal cell.
const DOTS_PER_ROW: f64 = 4.0;

/// Pixel size of the drawing surface backing `area`.
pub fn pane_size(area: Rect) -> PaneSize {
    PaneSize::new(
        f64::from(area.width) * DOTS_PER_COLUMN,
        f64::from(area.height) * DOTS_PER_ROW,
    )
}

fn to_color(color: Rgba, background: Rgba) -> Color {
    let c = color.over(background);
    Color::Rgb(c.r, c.g, c.b)
}

/// Splits a line into its visible dash segments.
pub fn dash_segments(from: Point, to: Point, dash: Option<(f64, f64)>) -> Vec<(Point, Point)> {
    let Some((on, off)) = dash.filter(|(on, _)| *on > 0.0) else {
        return vec![(from, to)];
    };
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let length = dx.hypot(dy);
    if length == 0.0 {
        return vec![(from, to)];
    }
    let (ux, uy) = (dx / length, dy / length);
    let period = on + off.max(0.0);

    let mut segments = Vec::new();
    let mut start = 0.0;
    while start < length {
        let end = (start + on).min(length);
        segments.push((
            Point::new(from.x + ux * start, from.y + uy * start),
            Point::new(from.x + ux * end, from.y + uy * end),
        ));
        start += period;
    }
    segments
}

/// Leftmost pixel of a label of `text` anchored at `x`.
pub fn label_left(x: f64, text: &str, anchor: Anchor) -> f64 {
    let width = text.width() as f64 * DOTS_PER_COLUMN;
    match anchor {
        Anchor::Left => x,
        Anchor::Center => x - width / 2.0,
        Anchor::Right => x - width,
    }
}

/// Builds a canvas widget that replays `list`.
///
/// The first `Clear` call sets the canvas background; an empty list
/// renders as a blank pane in `fallback` color.
pub fn chart_canvas(list: &DrawList, fallback: Rgba) -> Canvas<'_, impl Fn(&mut Context) + '_> {
    let size = list.size();
    let background = list
        .calls()
        .iter()
        .find_map(|call| match call {
            DrawCall::Clear(color) => Some(*color),
            _ => None,
        })
        .unwrap_or(fallback);

    Canvas::default()
        .marker(Marker::Braille)
        .background_color(to_color(background, background))
        .x_bounds([0.0, size.width])
        .y_bounds([0.0, size.height])
        .paint(move |ctx| {
            let painter = Painter {
                height: size.height,
                width: size.width,
                background,
            };
            for call in list.calls() {
                painter.replay(ctx, call);
            }
        })
}

struct Painter {
    width: f64,
    height: f64,
    background: Rgba,
}

impl Painter {
    fn replay(&self, ctx: &mut Context, call: &DrawCall) {
        match call {
            DrawCall::Clear(_) => {}
            DrawCall::Line { from, to, stroke } => self.line(ctx, *from, *to, *stroke),
            DrawCall::Rect { rect, fill } => self.rect(ctx, *rect, *fill),
            DrawCall::Text { at, text, style } => self.text(ctx, *at, text, *style),
            DrawCall::Polyline { points, stroke } => {
                for pair in points.windows(2) {
                    self.line(ctx, pair[0], pair[1], *stroke);
                }
            }
        }
    }

    fn line(&self, ctx: &mut Context, from: Point, to: Point, stroke: Stroke) {
        let color = to_color(stroke.color, self.background);
        for (a, b) in dash_segments(from, to, stroke.dash) {
            ctx.draw(&CanvasLine {
                x1: a.x,
                y1: self.height - a.y,
                x2: b.x,
                y2: self.height - b.y,
                color,
            });
        }
    }

    fn rect(&self, ctx: &mut Context, rect: PixelRect, fill: Fill) {
        let color = to_color(fill.color(), self.background);
        let bottom = self.height - (rect.y + rect.height);
        if !fill.is_solid() {
            ctx.draw(&Rectangle {
                x: rect.x,
                y: bottom,
                width: rect.width,
                height: rect.height,
                color,
            });
            return;
        }
        // Braille has no area fill; one vertical line per dot column.
        let mut x = rect.x;
        let right = rect.x + rect.width.max(1.0);
        while x < right {
            ctx.draw(&CanvasLine {
                x1: x,
                y1: bottom,
                x2: x,
                y2: bottom + rect.height,
                color,
            });
            x += 1.0;
        }
    }

    fn text(&self, ctx: &mut Context, at: Point, text: &str, style: TextStyle) {
        let left = label_left(at.x, text, style.anchor).clamp(0.0, self.width);
        let y = (self.height - at.y).clamp(0.0, self.height);
        let mut span_style = Style::default().fg(to_color(style.color, self.background));
        if let Some(bg) = style.background {
            span_style = span_style.bg(to_color(bg, self.background));
        }
        ctx.print(left, y, Span::styled(text.to_string(), span_style));
    }
}
