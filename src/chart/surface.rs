//! Drawing surface abstraction and the recording [`DrawList`].
//!
//! Renderers only talk to [`DrawingSurface`]. The terminal front end
//! paints a [`DrawList`] onto a ratatui canvas, and tests inspect the
//! recorded [`DrawCall`]s directly.

use serde::{Deserialize, Serialize};

use super::scale::PaneSize;

/// An sRGB color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Composites this color over an opaque background.
    pub fn over(self, background: Rgba) -> Rgba {
        let alpha = f64::from(self.a) / 255.0;
        let mix = |fg: u8, bg: u8| {
            (f64::from(fg) * alpha + f64::from(bg) * (1.0 - alpha)).round() as u8
        };
        Rgba::rgb(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }
}

/// A pixel position inside a pane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Line styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
    /// `(dash, gap)` lengths in pixels for dashed lines.
    pub dash: Option<(f64, f64)>,
}

impl Stroke {
    pub fn solid(color: Rgba, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Rgba, width: f64, dash: (f64, f64)) -> Self {
        Self {
            color,
            width,
            dash: Some(dash),
        }
    }
}

/// How a rectangle is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    /// Interior painted in the color.
    Solid(Rgba),
    /// Only the border painted; interior left untouched.
    Outline(Rgba),
}

impl Fill {
    pub fn color(&self) -> Rgba {
        match self {
            Fill::Solid(c) | Fill::Outline(c) => *c,
        }
    }

    pub fn is_solid(&self) -> bool {
        matches!(self, Fill::Solid(_))
    }
}

/// An axis-aligned rectangle in pane pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Which side of the anchor point a label extends to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Left,
    Center,
    Right,
}

/// Label styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Rgba,
    /// Badge background behind the text.
    pub background: Option<Rgba>,
    pub anchor: Anchor,
}

/// A raster area renderers paint into.
///
/// There is no retained scene graph: every frame starts with
/// [`DrawingSurface::clear`] and repaints everything.
pub trait DrawingSurface {
    /// Pixel size of the pane.
    fn size(&self) -> PaneSize;

    /// Fills the whole surface with a color, discarding previous content.
    fn clear(&mut self, color: Rgba);

    fn line(&mut self, from: Point, to: Point, stroke: Stroke);

    fn rect(&mut self, rect: PixelRect, fill: Fill);

    fn text(&mut self, at: Point, text: &str, style: TextStyle);

    /// Connected line through `points`.
    fn polyline(&mut self, points: &[Point], stroke: Stroke) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], stroke);
        }
    }
}

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Rgba),
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Rect {
        rect: PixelRect,
        fill: Fill,
    },
    Text {
        at: Point,
        text: String,
        style: TextStyle,
    },
    Polyline {
        points: Vec<Point>,
        stroke: Stroke,
    },
}

/// A surface that records every call instead of rasterizing it.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    size: PaneSize,
    calls: Vec<DrawCall>,
}

impl DrawList {
    pub fn new(size: PaneSize) -> Self {
        Self {
            size,
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// All recorded rectangles.
    pub fn rects(&self) -> impl Iterator<Item = (&PixelRect, &Fill)> {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Rect { rect, fill } => Some((rect, fill)),
            _ => None,
        })
    }

    /// All recorded label strings.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl DrawingSurface for DrawList {
    fn size(&self) -> PaneSize {
        self.size
    }

    fn clear(&mut self, color: Rgba) {
        // Nothing drawn before a clear can be visible afterwards.
        self.calls.clear();
        self.calls.push(DrawCall::Clear(color));
    }

    fn line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.calls.push(DrawCall::Line { from, to, stroke });
    }

    fn rect(&mut self, rect: PixelRect, fill: Fill) {
        self.calls.push(DrawCall::Rect { rect, fill });
    }

    fn text(&mut self, at: Point, text: &str, style: TextStyle) {
        self.calls.push(DrawCall::Text {
            at,
            text: text.to_string(),
            style,
        });
    }

    fn polyline(&mut self, points: &[Point], stroke: Stroke) {
        self.calls.push(DrawCall::Polyline {
            points: points.to_vec(),
            stroke,
        });
    }
}
