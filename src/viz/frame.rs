//! Chart furniture shared by all time-series charts: plot layout, title,
//! crosshair and tooltip box.

use super::scene::{Anchor, Scene, Shape, Stroke};
use super::text::estimate_text_width_px;
use super::types::Margins;
use crate::interact::{PlotRect, Tooltip};
use crate::style::{self, Rgba};

const TOOLTIP_FONT: f32 = 12.0;
const TOOLTIP_LINE: f32 = 16.0;
const TOOLTIP_PAD: f32 = 8.0;

/// Plot rectangle of a `width` x `height` region whose top edge is at `top`.
pub fn plot_rect(width: u32, height: u32, top: f32, margins: Margins) -> PlotRect {
    PlotRect::new(
        margins.left,
        top + margins.top,
        width as f32 - margins.left - margins.right,
        height as f32 - margins.top - margins.bottom,
    )
}

/// Dashed vertical line across the plot at `x`.
pub fn crosshair(scene: &mut Scene, plot: PlotRect, x: f32) {
    scene.push(Shape::Line {
        from: (x, plot.top),
        to: (x, plot.bottom()),
        stroke: Stroke::dashed(style::CROSSHAIR, 1.0, 3.0, 3.0),
        opacity: 1.0,
    });
}

pub fn marker(scene: &mut Scene, center: (f32, f32), color: Rgba) {
    scene.push(Shape::Circle {
        center,
        radius: 4.0,
        fill: color,
        opacity: 1.0,
        stroke: None,
    });
}

/// Box size for a tooltip.
pub fn tooltip_size(tip: &Tooltip) -> (f32, f32) {
    let widest = std::iter::once(&tip.header)
        .chain(tip.lines.iter())
        .map(|l| estimate_text_width_px(l, TOOLTIP_FONT))
        .fold(0.0, f32::max);
    let rows = 1 + tip.lines.len();
    (
        widest + 2.0 * TOOLTIP_PAD,
        rows as f32 * TOOLTIP_LINE + 2.0 * TOOLTIP_PAD - 4.0,
    )
}

/// Tooltip box at its anchor. A box that would run off the surface is moved back
/// inside it.
pub fn tooltip_box(scene: &mut Scene, tip: &Tooltip) {
    let (w, h) = tooltip_size(tip);
    let max_x = (scene.width as f32 - w).max(0.0);
    let max_y = (scene.height as f32 - h).max(0.0);
    let x = tip.anchor.0.min(max_x);
    let y = tip.anchor.1.min(max_y);

    scene.push(Shape::Rect {
        min: (x, y),
        max: (x + w, y + h),
        fill: style::TOOLTIP_BG,
        opacity: 1.0,
        stroke: Some(Stroke::solid(style::TOOLTIP_BORDER, 1.0)),
    });
    let text_x = x + TOOLTIP_PAD;
    let first_y = y + TOOLTIP_PAD + TOOLTIP_LINE / 2.0 - 2.0;
    scene.push(Shape::Text {
        pos: (text_x, first_y),
        text: tip.header.clone(),
        size: TOOLTIP_FONT,
        color: style::TEXT,
        anchor: Anchor::Start,
        bold: true,
    });
    for (i, line) in tip.lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        scene.push(Shape::text(
            (text_x, first_y + (i + 1) as f32 * TOOLTIP_LINE),
            line.clone(),
            TOOLTIP_FONT,
            style::TEXT,
            Anchor::Start,
        ));
    }
}

/// Chart title in the top-left corner of a region starting at `top`.
pub fn title(scene: &mut Scene, text: &str, top: f32) {
    scene.push(Shape::Text {
        pos: (8.0, top + 9.0),
        text: text.to_string(),
        size: 13.0,
        color: style::MUTED_TEXT,
        anchor: Anchor::Start,
        bold: true,
    });
}
