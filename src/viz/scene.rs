//! Renderer-agnostic display list.
//!
//! Charts describe a frame as an ordered list of [`Shape`]s in surface pixels
//! (origin top-left, y down). The same scene is written to SVG through plotters
//! or painted by the desktop viewer.

use crate::models::SeriesId;
use crate::style::Rgba;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f32,
    /// `(on, off)` lengths in pixels.
    pub dash: Option<(f32, f32)>,
}

impl Stroke {
    pub const fn solid(color: Rgba, width: f32) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub const fn dashed(color: Rgba, width: f32, on: f32, off: f32) -> Self {
        Self {
            color,
            width,
            dash: Some((on, off)),
        }
    }
}

pub type Point = (f32, f32);

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
        opacity: f32,
    },
    Polyline {
        points: Vec<Point>,
        stroke: Stroke,
        opacity: f32,
    },
    /// Filled band between two outlines sampled at the same x positions.
    Area {
        upper: Vec<Point>,
        lower: Vec<Point>,
        fill: Rgba,
        opacity: f32,
    },
    Rect {
        min: Point,
        max: Point,
        fill: Rgba,
        opacity: f32,
        stroke: Option<Stroke>,
    },
    Circle {
        center: Point,
        radius: f32,
        fill: Rgba,
        opacity: f32,
        stroke: Option<Stroke>,
    },
    /// `pos` is the vertical center of the text at the anchor edge.
    Text {
        pos: Point,
        text: String,
        size: f32,
        color: Rgba,
        anchor: Anchor,
        bold: bool,
    },
}

impl Shape {
    pub fn text(pos: Point, text: impl Into<String>, size: f32, color: Rgba, anchor: Anchor) -> Self {
        Shape::Text {
            pos,
            text: text.into(),
            size,
            color,
            anchor,
            bold: false,
        }
    }

    pub fn rect(min: Point, max: Point, fill: Rgba, opacity: f32) -> Self {
        Shape::Rect {
            min,
            max,
            fill,
            opacity,
            stroke: None,
        }
    }
}

/// Clickable legend entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendHit {
    pub id: SeriesId,
    pub min: Point,
    pub max: Point,
}

impl LegendHit {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.min.0 && x <= self.max.0 && y >= self.min.1 && y <= self.max.1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub background: Rgba,
    pub shapes: Vec<Shape>,
    pub legend_hits: Vec<LegendHit>,
    /// Text shown under the chart (the gauge's status line).
    pub caption: Option<String>,
}

impl Scene {
    pub fn new(width: u32, height: u32, background: Rgba) -> Self {
        Self {
            width,
            height,
            background,
            shapes: Vec::new(),
            legend_hits: Vec::new(),
            caption: None,
        }
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn legend_hit_at(&self, x: f32, y: f32) -> Option<&SeriesId> {
        self.legend_hits.iter().find(|h| h.contains(x, y)).map(|h| &h.id)
    }

    /// All text in drawing order; handy for assertions.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Split a polyline into the "on" segments of a dash pattern.
pub fn dash_segments(points: &[Point], on: f32, off: f32) -> Vec<(Point, Point)> {
    let mut out = Vec::new();
    if on <= 0.0 || off < 0.0 {
        return points.windows(2).map(|w| (w[0], w[1])).collect();
    }
    let period = on + off;
    // distance travelled within the current period
    let mut phase = 0.0f32;
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        let len = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();
        if len <= f32::EPSILON {
            continue;
        }
        let at = |d: f32| (a.0 + (b.0 - a.0) * d / len, a.1 + (b.1 - a.1) * d / len);
        let mut d = 0.0f32;
        while d < len {
            let step;
            if phase < on {
                step = (on - phase).min(len - d);
                out.push((at(d), at(d + step)));
            } else {
                step = (period - phase).min(len - d);
            }
            d += step;
            phase = (phase + step) % period;
        }
    }
    out
}
