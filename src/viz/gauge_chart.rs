//! Half-dial gauge for the latest M2 growth reading.

use super::scene::{Anchor, Scene, Shape, Stroke};
use super::text::wrap_text_to_width;
use super::types::ChartKind;
use super::Chart;
use crate::gauge::{Band, GaugeSnapshot, LOAD_ERROR_CAPTION, REGIMES, TITLE};
use crate::interact::{ChartController, ChartEvent, Redraw};
use crate::models::GaugeRow;
use crate::stats::{Summary, summarize};
use crate::style;

pub const GAUGE_WIDTH: u32 = 480;
/// Height of the dial itself; the legend row and caption go below.
pub const DIAL_HEIGHT: u32 = 260;
pub const RADIUS: f32 = 170.0;
const CENTER: (f32, f32) = (GAUGE_WIDTH as f32 / 2.0, DIAL_HEIGHT as f32 * 0.9);

const INNER: f32 = 0.65;
const RING_OUTER: f32 = 0.67;
const NEEDLE_LEN: f32 = 0.8;
const HUB_RADIUS: f32 = 18.0;
const ARC_STEPS: usize = 32;

const LEGEND_TOP: f32 = DIAL_HEIGHT as f32 + 10.0;
const LEGEND_SWATCH: f32 = 18.0;
const LEGEND_STEP: f32 = 105.0;
const CAPTION_TOP: f32 = DIAL_HEIGHT as f32 + 40.0;
const CAPTION_LINE: f32 = 16.0;
const CAPTION_FONT: f32 = 13.0;

#[derive(Debug, Clone, PartialEq)]
enum GaugeState {
    Ready(GaugeSnapshot),
    /// The source could not be loaded.
    Failed,
    /// Loaded, but no row had a growth value.
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GaugeChart {
    state: GaugeState,
    growth: Vec<f64>,
}

/// Point at `angle_deg` (clockwise from straight up) and distance `r` from the
/// dial center.
fn polar(angle_deg: f64, r: f32) -> (f32, f32) {
    let a = angle_deg.to_radians();
    (CENTER.0 + r * a.sin() as f32, CENTER.1 - r * a.cos() as f32)
}

fn pct_to_angle(pct: f64) -> f64 {
    -90.0 + pct * 1.8
}

/// Ring sector between two percentages.
fn sector(start_pct: f64, end_pct: f64, inner: f32, outer: f32) -> (Vec<(f32, f32)>, Vec<(f32, f32)>) {
    let (a0, a1) = (pct_to_angle(start_pct), pct_to_angle(end_pct));
    let angles: Vec<f64> = (0..=ARC_STEPS)
        .map(|i| a0 + (a1 - a0) * i as f64 / ARC_STEPS as f64)
        .collect();
    let outer_pts = angles.iter().map(|&a| polar(a, outer)).collect();
    let inner_pts = angles.iter().map(|&a| polar(a, inner)).collect();
    (outer_pts, inner_pts)
}

impl GaugeChart {
    pub fn from_rows(rows: &[GaugeRow]) -> Self {
        let growth = rows.iter().filter_map(|r| r.m2_growth).collect();
        let state = match GaugeSnapshot::from_rows(rows) {
            Some(s) => GaugeState::Ready(s),
            None => GaugeState::Empty,
        };
        Self { state, growth }
    }

    /// Gauge for a source that failed to load: only the error caption is shown.
    pub fn failed() -> Self {
        Self {
            state: GaugeState::Failed,
            growth: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> Option<&GaugeSnapshot> {
        match &self.state {
            GaugeState::Ready(s) => Some(s),
            _ => None,
        }
    }

    pub fn caption(&self) -> Option<String> {
        match &self.state {
            GaugeState::Ready(s) => Some(s.caption()),
            GaugeState::Failed => Some(LOAD_ERROR_CAPTION.to_string()),
            GaugeState::Empty => None,
        }
    }

    fn caption_lines(&self) -> Vec<String> {
        self.caption()
            .map(|c| wrap_text_to_width(&c, CAPTION_FONT, GAUGE_WIDTH as f32 - 20.0))
            .unwrap_or_default()
    }

    fn draw_dial(scene: &mut Scene, snapshot: &GaugeSnapshot) {
        for band in &REGIMES {
            let (upper, lower) = sector(band.start, band.end, RADIUS * INNER, RADIUS);
            scene.push(Shape::Area {
                upper,
                lower,
                fill: band.color,
                opacity: 0.9,
            });
        }
        let (upper, lower) = sector(0.0, 100.0, RADIUS * INNER, RADIUS * RING_OUTER);
        scene.push(Shape::Area {
            upper,
            lower,
            fill: style::PANEL,
            opacity: 1.0,
        });

        scene.push(Shape::Line {
            from: CENTER,
            to: polar(snapshot.reading.angle_deg, RADIUS * NEEDLE_LEN),
            stroke: Stroke::solid(style::NEEDLE, 4.0),
            opacity: 1.0,
        });
        scene.push(Shape::Circle {
            center: CENTER,
            radius: HUB_RADIUS,
            fill: style::PANEL,
            opacity: 1.0,
            stroke: Some(Stroke::solid(style::GAUGE_HUB_RING, 1.0)),
        });
        scene.push(Shape::Text {
            pos: CENTER,
            text: format!("{:.1}%", snapshot.reading.latest),
            size: 12.0,
            color: style::NEEDLE,
            anchor: Anchor::Middle,
            bold: true,
        });
        scene.push(Shape::text(
            (CENTER.0, CENTER.1 - RADIUS - 16.0),
            TITLE,
            13.0,
            style::MUTED_TEXT,
            Anchor::Middle,
        ));
    }

    fn draw_legend(scene: &mut Scene, bands: &[Band]) {
        for (i, band) in bands.iter().enumerate() {
            let x = 10.0 + i as f32 * LEGEND_STEP;
            scene.push(Shape::Rect {
                min: (x, LEGEND_TOP),
                max: (x + LEGEND_SWATCH, LEGEND_TOP + LEGEND_SWATCH),
                fill: band.color,
                opacity: 1.0,
                stroke: Some(Stroke::solid(style::GAUGE_HUB_RING, 1.0)),
            });
            scene.push(Shape::text(
                (x + 26.0, LEGEND_TOP + LEGEND_SWATCH / 2.0),
                band.label,
                13.0,
                style::TEXT,
                Anchor::Start,
            ));
        }
    }
}

impl Chart for GaugeChart {
    fn kind(&self) -> ChartKind {
        ChartKind::Gauge
    }

    fn size(&self) -> (u32, u32) {
        let lines = self.caption_lines().len() as u32;
        (GAUGE_WIDTH, CAPTION_TOP as u32 + lines * CAPTION_LINE as u32 + 8)
    }

    fn controller(&self) -> Option<&ChartController> {
        None
    }

    fn controller_mut(&mut self) -> Option<&mut ChartController> {
        None
    }

    fn handle(&mut self, _event: &ChartEvent) -> Redraw {
        Redraw::NONE
    }

    fn scene(&self) -> Scene {
        let (w, h) = self.size();
        let mut scene = Scene::new(w, h, style::BACKGROUND);
        if let GaugeState::Ready(snapshot) = &self.state {
            Self::draw_dial(&mut scene, snapshot);
            Self::draw_legend(&mut scene, &REGIMES);
        }
        for (i, line) in self.caption_lines().into_iter().enumerate() {
            scene.push(Shape::text(
                (10.0, CAPTION_TOP + (i as f32 + 0.5) * CAPTION_LINE),
                line,
                CAPTION_FONT,
                style::MUTED_TEXT,
                Anchor::Start,
            ));
        }
        scene.caption = self.caption();
        scene
    }

    fn summaries(&self) -> Vec<Summary> {
        if self.growth.is_empty() {
            return Vec::new();
        }
        vec![summarize("m2_growth", &self.growth)]
    }
}
