//! Visible time window with clamped zoom and pan.
//!
//! The window is described by the zoom scale `k = full_span / visible_span`. `k`
//! stays inside the configured [`ScaleExtent`] and the window is always translated
//! back inside the full data extent, so it can never be empty or leave the data.

use crate::models::{SECONDS_PER_DAY, Timestamp};
use crate::scale::LinearScale;
use serde::{Deserialize, Serialize};

/// Span used when the data has zero or one distinct timestamp.
pub const DEGENERATE_SPAN: f64 = SECONDS_PER_DAY;

/// Allowed zoom scale range. `min` below 1 is treated as 1: the window can never
/// be wider than the data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleExtent {
    pub min: f64,
    pub max: f64,
}

impl ScaleExtent {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, k: f64) -> f64 {
        let lo = if self.min.is_finite() { self.min.max(1.0) } else { 1.0 };
        let hi = if self.max.is_finite() { self.max.max(lo) } else { lo };
        if k.is_nan() { lo } else { k.max(lo).min(hi) }
    }
}

impl Default for ScaleExtent {
    fn default() -> Self {
        Self::new(1.0, 8.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomainWindow {
    full: (Timestamp, Timestamp),
    start: Timestamp,
    end: Timestamp,
    extent: ScaleExtent,
}

impl DomainWindow {
    /// Window over `[first, last]`, initially showing everything.
    pub fn new(first: Timestamp, last: Timestamp, extent: ScaleExtent) -> Self {
        let full = normalize(first, last);
        Self {
            full,
            start: full.0,
            end: full.1,
            extent,
        }
    }

    /// Window over the min/max of `times`; no finite times gives `[0, DEGENERATE_SPAN]`.
    pub fn from_times(times: impl IntoIterator<Item = Timestamp>, extent: ScaleExtent) -> Self {
        let bounds = times
            .into_iter()
            .filter(|t| t.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, t| match acc {
                None => Some((t, t)),
                Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
            });
        match bounds {
            Some((lo, hi)) => Self::new(lo, hi, extent),
            None => Self::new(0.0, DEGENERATE_SPAN, extent),
        }
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    pub fn full_extent(&self) -> (Timestamp, Timestamp) {
        self.full
    }

    pub fn full_span(&self) -> f64 {
        self.full.1 - self.full.0
    }

    pub fn scale_extent(&self) -> ScaleExtent {
        self.extent
    }

    /// Current zoom scale `k`.
    pub fn scale_factor(&self) -> f64 {
        self.full_span() / self.span()
    }

    pub fn is_full(&self) -> bool {
        (self.start, self.end) == self.full
    }

    pub fn contains(&self, t: Timestamp) -> bool {
        t >= self.start && t <= self.end
    }

    /// Pixel mapping for the current window.
    pub fn scale(&self, range: (f32, f32)) -> LinearScale {
        LinearScale::new((self.start, self.end), range)
    }

    /// Multiply the zoom scale by `factor`, keeping `focal` at the same relative
    /// position in the window. Returns whether the window moved.
    pub fn zoom_by(&mut self, factor: f64, focal: Timestamp) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let wanted = self.scale_factor() * factor;
        let k = self.extent.clamp(wanted);
        if k != wanted {
            log::trace!("zoom scale {wanted:.3} clamped to {k:.3}");
        }
        let focal = if focal.is_finite() {
            focal.max(self.start).min(self.end)
        } else {
            self.start + self.span() / 2.0
        };
        let ratio = (focal - self.start) / self.span();
        let new_span = self.full_span() / k;
        self.place(focal - ratio * new_span, new_span)
    }

    /// Shift the window by `delta` seconds.
    pub fn pan_by(&mut self, delta: f64) -> bool {
        if !delta.is_finite() {
            return false;
        }
        self.place(self.start + delta, self.span())
    }

    /// Shift the window by a pointer drag of `dx` pixels over a plot `width` pixels
    /// wide. Dragging right reveals earlier data.
    pub fn pan_by_pixels(&mut self, dx: f32, width: f32) -> bool {
        if width <= 0.0 {
            return false;
        }
        self.pan_by(-(dx as f64) / width as f64 * self.span())
    }

    /// Back to the full extent.
    pub fn reset(&mut self) -> bool {
        let changed = !self.is_full();
        self.start = self.full.0;
        self.end = self.full.1;
        changed
    }

    fn place(&mut self, start: Timestamp, span: f64) -> bool {
        let (lo, hi) = self.full;
        let (start, end) = if span >= hi - lo {
            (lo, hi)
        } else {
            let start = start.max(lo).min((hi - span).max(lo));
            (start, (start + span).min(hi))
        };
        let changed = start != self.start || end != self.end;
        self.start = start;
        self.end = end;
        changed
    }
}

fn normalize(a: Timestamp, b: Timestamp) -> (Timestamp, Timestamp) {
    match (a.is_finite(), b.is_finite()) {
        (false, false) => (0.0, DEGENERATE_SPAN),
        (true, false) => around(a),
        (false, true) => around(b),
        (true, true) => {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            if hi > lo { (lo, hi) } else { around(lo) }
        }
    }
}

fn around(t: Timestamp) -> (Timestamp, Timestamp) {
    (t - DEGENERATE_SPAN / 2.0, t + DEGENERATE_SPAN / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> DomainWindow {
        DomainWindow::new(0.0, 1000.0, ScaleExtent::new(1.0, 8.0))
    }

    #[test]
    fn starts_at_full_extent() {
        let w = window();
        assert!(w.is_full());
        assert_eq!(w.scale_factor(), 1.0);
    }

    #[test]
    fn zoom_keeps_focal_point_in_place() {
        let mut w = window();
        assert!(w.zoom_by(2.0, 250.0));
        assert_eq!(w.span(), 500.0);
        // 250 was a quarter of the way in, and still is
        assert!(((250.0 - w.start()) / w.span() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn zoom_is_clamped_to_scale_extent() {
        let mut w = window();
        w.zoom_by(100.0, 500.0);
        assert!((w.scale_factor() - 8.0).abs() < 1e-9);
        w.zoom_by(0.001, 500.0);
        assert!(w.is_full());
        assert!(!w.zoom_by(0.5, 500.0), "already fully zoomed out");
    }

    #[test]
    fn pan_stays_inside_full_extent() {
        let mut w = window();
        w.zoom_by(4.0, 0.0);
        assert_eq!(w.start(), 0.0);
        assert!(!w.pan_by(-50.0), "pinned at the left edge");
        w.pan_by(10_000.0);
        assert_eq!(w.end(), 1000.0);
        assert_eq!(w.span(), 250.0);
    }

    #[test]
    fn pixel_drag_moves_opposite_to_time() {
        let mut w = window();
        w.zoom_by(2.0, 500.0);
        let before = w.start();
        w.pan_by_pixels(100.0, 500.0);
        assert!(w.start() < before);
        assert!(!w.pan_by_pixels(10.0, 0.0));
    }

    #[test]
    fn reset_restores_exact_extent_and_is_idempotent() {
        let mut w = window();
        w.zoom_by(3.3, 123.0);
        w.pan_by(77.7);
        w.zoom_by(1.7, 900.0);
        assert!(w.reset());
        let once = w.clone();
        assert!(!w.reset());
        assert_eq!(w, once);
        assert_eq!((w.start(), w.end()), (0.0, 1000.0));
    }

    #[test]
    fn degenerate_extents_get_a_nonzero_span() {
        let single = DomainWindow::new(500.0, 500.0, ScaleExtent::default());
        assert_eq!(single.span(), DEGENERATE_SPAN);
        let empty = DomainWindow::from_times(Vec::new(), ScaleExtent::default());
        assert_eq!(empty.full_extent(), (0.0, DEGENERATE_SPAN));
        let mut w = single.clone();
        assert!(w.zoom_by(2.0, 500.0));
        assert!(w.scale((0.0, 100.0)).map(500.0).is_finite());
    }

    #[test]
    fn scale_extent_never_allows_zooming_out_past_data() {
        let e = ScaleExtent::new(0.25, 4.0);
        assert_eq!(e.clamp(0.5), 1.0);
        assert_eq!(e.clamp(9.0), 4.0);
        assert_eq!(e.clamp(f64::NAN), 1.0);
    }
}
