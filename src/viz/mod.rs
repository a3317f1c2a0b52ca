//! Chart rendering: build a [`Scene`] from chart state, then write it as **SVG** or
//! paint it in the desktop viewer.
//!
//! - Dark theme, fixed per-key colors (see [`crate::style`])
//! - Time axes with calendar ticks, value axes with SI dollar labels
//! - Legend in the right margin; clicking an entry toggles or focuses a series
//! - Hover crosshair, markers and tooltip; wheel zoom and drag pan on the x axis

pub mod axis;
pub mod frame;
pub mod gauge_chart;
pub mod geometry;
pub mod legend;
pub mod macro_rwa;
pub mod protocols;
pub mod scene;
pub mod stacked;
pub mod svg;
pub mod text;
pub mod types;

pub use gauge_chart::GaugeChart;
pub use macro_rwa::MacroChart;
pub use protocols::ProtocolConcentration;
pub use scene::{Anchor, LegendHit, Scene, Shape, Stroke};
pub use stacked::StackedChart;
pub use svg::{draw_scene, render_svg_string, write_svg};
pub use types::{ChartKind, DEFAULT_HEIGHT, DEFAULT_WIDTH, Margins};

use crate::interact::{ChartController, ChartEvent, Redraw};
use crate::models::Timestamp;
use crate::stats::Summary;

/// One interactive chart: owns its data and interaction state and draws itself.
pub trait Chart: Send {
    fn kind(&self) -> ChartKind;

    /// Surface size in pixels.
    fn size(&self) -> (u32, u32);

    /// Interaction state, for charts that have a time axis.
    fn controller(&self) -> Option<&ChartController>;

    fn controller_mut(&mut self) -> Option<&mut ChartController>;

    fn handle(&mut self, event: &ChartEvent) -> Redraw;

    fn scene(&self) -> Scene;

    /// Statistics over the chart's underlying columns.
    fn summaries(&self) -> Vec<Summary>;
}

/// Hover the chart as if the pointer were at time `t`, halfway down the plot.
pub fn hover_at_time(chart: &mut dyn Chart, t: Timestamp) -> Redraw {
    let Some(ctl) = chart.controller() else {
        return Redraw::NONE;
    };
    let plot = ctl.plot();
    let x = ctl.x_scale().map(t).clamp(plot.left, plot.right());
    let y = plot.top + plot.height / 2.0;
    chart.handle(&ChartEvent::PointerMove { x, y })
}

/// Zoom by `factor` around time `t`.
pub fn zoom_at_time(chart: &mut dyn Chart, factor: f64, t: Timestamp) -> Redraw {
    let Some(ctl) = chart.controller() else {
        return Redraw::NONE;
    };
    let x = ctl.x_scale().map(t);
    chart.handle(&ChartEvent::Zoom { factor, x })
}

/// Pan by `delta` seconds; positive moves the window later in time.
pub fn pan_by_time(chart: &mut dyn Chart, delta: f64) -> Redraw {
    let Some(ctl) = chart.controller() else {
        return Redraw::NONE;
    };
    let plot = ctl.plot();
    let span = ctl.window.span();
    if span <= 0.0 {
        return Redraw::NONE;
    }
    let dx = -(delta / span) as f32 * plot.width;
    chart.handle(&ChartEvent::Pan { dx })
}
