//! Interaction state shared by every time-series chart.
//!
//! A [`ChartController`] owns the visible time window, the legend state and the
//! hover state of one chart. Input arrives as [`ChartEvent`]s; each event is handled
//! to completion and answered with a [`Redraw`] saying which parts of the chart
//! depend on what changed. Scenes are always rebuilt from current state.

pub mod domain;
pub mod hover;
pub mod tooltip;
pub mod visibility;

pub use domain::{DomainWindow, ScaleExtent};
pub use hover::{HoverHit, HoverState, nearest_index};
pub use tooltip::{TOOLTIP_OFFSET, Tooltip};
pub use visibility::{LayerOpacity, LegendBehavior, VisibilityState};

use crate::models::{SeriesId, Timestamp};
use crate::scale::LinearScale;
use serde::{Deserialize, Serialize};

/// Per-chart interaction settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub scale_extent: ScaleExtent,
    pub legend: LegendBehavior,
    pub opacity: LayerOpacity,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            scale_extent: ScaleExtent::default(),
            legend: LegendBehavior::SingleFocus,
            opacity: LayerOpacity::default(),
        }
    }
}

/// Pointer and legend input, in chart-surface pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    PointerMove { x: f32, y: f32 },
    PointerLeave,
    /// Multiply the zoom scale by `factor` around surface x `x`.
    Zoom { factor: f64, x: f32 },
    /// Drag by `dx` pixels.
    Pan { dx: f32 },
    Reset,
    LegendClick(SeriesId),
}

/// What has to be redrawn after an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Redraw {
    /// Paths, areas and markers that depend on the x scale.
    pub geometry: bool,
    pub x_axis: bool,
    /// Crosshair, markers and tooltip.
    pub hover: bool,
    pub legend: bool,
}

impl Redraw {
    pub const NONE: Redraw = Redraw {
        geometry: false,
        x_axis: false,
        hover: false,
        legend: false,
    };

    fn window_changed() -> Self {
        Self {
            geometry: true,
            x_axis: true,
            hover: true,
            legend: false,
        }
    }

    pub fn any(&self) -> bool {
        self.geometry || self.x_axis || self.hover || self.legend
    }

    pub fn merge(self, other: Redraw) -> Redraw {
        Redraw {
            geometry: self.geometry || other.geometry,
            x_axis: self.x_axis || other.x_axis,
            hover: self.hover || other.hover,
            legend: self.legend || other.legend,
        }
    }
}

/// Plot area inside a chart surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl PlotRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

/// Zoom factor for a scroll of `delta` pixels (positive scrolls zoom in).
pub fn wheel_zoom_factor(delta: f32) -> f64 {
    2f64.powf(delta as f64 * 0.002)
}

#[derive(Debug, Clone)]
pub struct ChartController {
    pub window: DomainWindow,
    pub visibility: VisibilityState,
    pub hover: HoverState,
    plot: PlotRect,
}

impl ChartController {
    pub fn new(window: DomainWindow, visibility: VisibilityState, plot: PlotRect) -> Self {
        Self {
            window,
            visibility,
            hover: HoverState::Idle,
            plot,
        }
    }

    pub fn plot(&self) -> PlotRect {
        self.plot
    }

    /// Current time-to-pixel mapping across the plot width.
    pub fn x_scale(&self) -> LinearScale {
        self.window.scale((self.plot.left, self.plot.right()))
    }

    /// Apply one event. `tracks` are the sorted timestamp sequences hover looks up
    /// (one per series, or one for a shared row table).
    pub fn handle(&mut self, event: &ChartEvent, tracks: &[&[Timestamp]]) -> Redraw {
        match event {
            ChartEvent::PointerMove { x, y } => {
                if !self.plot.contains(*x, *y) {
                    return self.leave();
                }
                let time = self.x_scale().invert(*x);
                self.hover = HoverState::lookup(time, (*x, *y), tracks);
                Redraw {
                    hover: true,
                    ..Redraw::NONE
                }
            }
            ChartEvent::PointerLeave => self.leave(),
            ChartEvent::Zoom { factor, x } => {
                let focal = self.x_scale().invert(*x);
                let moved = self.window.zoom_by(*factor, focal);
                self.after_window_change(moved)
            }
            ChartEvent::Pan { dx } => {
                let moved = self.window.pan_by_pixels(*dx, self.plot.width);
                self.after_window_change(moved)
            }
            ChartEvent::Reset => {
                let moved = self.window.reset();
                self.after_window_change(moved)
            }
            ChartEvent::LegendClick(id) => {
                if self.visibility.toggle(id) {
                    Redraw {
                        geometry: true,
                        legend: true,
                        hover: self.hover.is_active(),
                        ..Redraw::NONE
                    }
                } else {
                    Redraw::NONE
                }
            }
        }
    }

    fn leave(&mut self) -> Redraw {
        Redraw {
            hover: self.hover.clear(),
            ..Redraw::NONE
        }
    }

    fn after_window_change(&mut self, moved: bool) -> Redraw {
        if !moved {
            return Redraw::NONE;
        }
        self.hover.clear();
        Redraw::window_changed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ChartController {
        let window = DomainWindow::new(0.0, 100.0, ScaleExtent::new(1.0, 4.0));
        let vis = VisibilityState::new(LegendBehavior::MultiToggle, vec!["a".into()]);
        ChartController::new(window, vis, PlotRect::new(10.0, 0.0, 100.0, 50.0))
    }

    #[test]
    fn pointer_move_inside_plot_sets_hover() {
        let mut c = controller();
        let times = [0.0, 50.0, 100.0];
        let r = c.handle(&ChartEvent::PointerMove { x: 62.0, y: 10.0 }, &[&times]);
        assert!(r.hover);
        assert!(!r.geometry);
        assert_eq!(c.hover.hit().and_then(|h| h.index(0)), Some(1));
    }

    #[test]
    fn pointer_outside_plot_counts_as_leave() {
        let mut c = controller();
        let times = [0.0, 100.0];
        c.handle(&ChartEvent::PointerMove { x: 20.0, y: 10.0 }, &[&times]);
        let r = c.handle(&ChartEvent::PointerMove { x: 5.0, y: 10.0 }, &[&times]);
        assert!(r.hover);
        assert!(!c.hover.is_active());
        assert_eq!(c.handle(&ChartEvent::PointerLeave, &[&times]), Redraw::NONE);
    }

    #[test]
    fn zoom_clears_hover_and_redraws_axis() {
        let mut c = controller();
        let times = [0.0, 100.0];
        c.handle(&ChartEvent::PointerMove { x: 20.0, y: 10.0 }, &[&times]);
        let r = c.handle(&ChartEvent::Zoom { factor: 2.0, x: 60.0 }, &[&times]);
        assert!(r.geometry && r.x_axis && r.hover);
        assert!(!c.hover.is_active());
        assert_eq!(c.window.span(), 50.0);
    }

    #[test]
    fn no_op_gestures_request_nothing() {
        let mut c = controller();
        assert_eq!(c.handle(&ChartEvent::Reset, &[]), Redraw::NONE);
        assert_eq!(c.handle(&ChartEvent::Pan { dx: 30.0 }, &[]), Redraw::NONE);
        assert_eq!(c.handle(&ChartEvent::Zoom { factor: 0.5, x: 50.0 }, &[]), Redraw::NONE);
        assert!(!c.handle(&ChartEvent::LegendClick("nope".into()), &[]).any());
    }

    #[test]
    fn legend_click_redraws_legend_and_geometry() {
        let mut c = controller();
        let r = c.handle(&ChartEvent::LegendClick("a".into()), &[]);
        assert!(r.legend && r.geometry);
        assert!(!c.visibility.is_shown(&"a".into()));
    }

    #[test]
    fn wheel_factor_is_symmetric() {
        assert_eq!(wheel_zoom_factor(0.0), 1.0);
        let f = wheel_zoom_factor(120.0) * wheel_zoom_factor(-120.0);
        assert!((f - 1.0).abs() < 1e-12);
        assert!(wheel_zoom_factor(120.0) > 1.0);
    }
}
