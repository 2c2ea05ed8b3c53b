//! Market chart pipeline.
//!
//! Data flows one way through this module: a feed delivery is ingested
//! into a [`ChartWindow`], moving averages are derived from it, scales
//! are computed for the current pane sizes, and the candlestick, overlay
//! and volume renderers paint onto a [`DrawingSurface`]. Every stage is
//! a pure function of its inputs.

pub mod candles;
pub mod frame;
pub mod indicator;
pub mod overlay;
pub mod scale;
pub mod style;
pub mod surface;
pub mod volume;
pub mod window;

pub use candles::{format_price, render_candles};
pub use frame::ChartFrame;
pub use indicator::{MovingAverageSeries, compute_moving_averages};
pub use overlay::render_overlays;
pub use scale::{PaneSize, Scale, build_index_scale, build_price_scale, build_volume_scale};
pub use style::ChartStyle;
pub use surface::{DrawCall, DrawList, DrawingSurface, Rgba};
pub use volume::render_volume;
pub use window::{ChartWindow, QualityReport, ingest};
