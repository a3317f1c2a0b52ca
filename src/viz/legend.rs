//! Legend layout: a vertical list of color swatches and labels.
//!
//! Every entry also registers a hit rectangle on the scene so pointer clicks can
//! be mapped back to a series id.

use super::scene::{Anchor, LegendHit, Scene, Shape};
use super::text::{estimate_text_width_px, truncate_to_width};
use crate::interact::VisibilityState;
use crate::models::SeriesId;
use crate::style::{self, Rgba};

pub const SWATCH: f32 = 10.0;
pub const FONT_PX: f32 = 12.0;

#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub id: SeriesId,
    pub label: String,
    pub color: Rgba,
}

impl LegendItem {
    pub fn new(id: impl Into<SeriesId>, label: impl Into<String>, color: Rgba) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color,
        }
    }
}

/// Vertical legend layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendLayout {
    /// Top-left of the first swatch.
    pub origin: (f32, f32),
    pub row_height: f32,
    /// Label offset from the swatch's left edge.
    pub text_dx: f32,
    /// Labels longer than this are truncated.
    pub max_label_px: f32,
}

impl LegendLayout {
    pub fn at(origin: (f32, f32)) -> Self {
        Self {
            origin,
            row_height: 18.0,
            text_dx: 16.0,
            max_label_px: 160.0,
        }
    }
}

/// Draw `items` and register their hit rectangles. Swatch opacity follows the
/// visibility state so hidden series are visibly dimmed.
pub fn draw_legend(
    scene: &mut Scene,
    items: &[LegendItem],
    layout: LegendLayout,
    visibility: &VisibilityState,
) {
    let (x0, y0) = layout.origin;
    for (i, item) in items.iter().enumerate() {
        let top = y0 + i as f32 * layout.row_height;
        scene.push(Shape::rect(
            (x0, top),
            (x0 + SWATCH, top + SWATCH),
            item.color,
            visibility.swatch_opacity(&item.id),
        ));
        let label = truncate_to_width(&item.label, FONT_PX, layout.max_label_px);
        let text_w = estimate_text_width_px(&label, FONT_PX);
        scene.push(Shape::text(
            (x0 + layout.text_dx, top + SWATCH / 2.0),
            label,
            FONT_PX,
            style::TEXT,
            Anchor::Start,
        ));
        if visibility.is_interactive(&item.id) {
            scene.legend_hits.push(LegendHit {
                id: item.id.clone(),
                min: (x0, top - 2.0),
                max: (x0 + layout.text_dx + text_w, top + layout.row_height - 2.0),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interact::LegendBehavior;

    #[test]
    fn hidden_series_swatch_is_dimmed_and_fixed_entries_are_not_clickable() {
        let mut vis = VisibilityState::new(
            LegendBehavior::MultiToggle,
            vec!["a".into(), "b".into()],
        )
        .with_fixed("b");
        vis.toggle(&"a".into());
        let items = vec![
            LegendItem::new("a", "Alpha", Rgba::hex(0xff0000)),
            LegendItem::new("b", "Beta", Rgba::hex(0x00ff00)),
        ];
        let mut scene = Scene::new(300, 100, style::BACKGROUND);
        draw_legend(&mut scene, &items, LegendLayout::at((10.0, 10.0)), &vis);

        let swatch_opacity = scene.shapes.iter().find_map(|s| match s {
            Shape::Rect { opacity, .. } => Some(*opacity),
            _ => None,
        });
        assert_eq!(swatch_opacity, Some(0.3));
        assert_eq!(scene.legend_hits.len(), 1);
        assert_eq!(scene.legend_hit_at(15.0, 14.0), Some(&SeriesId::from("a")));
        assert_eq!(scene.legend_hit_at(15.0, 32.0), None);
    }
}
