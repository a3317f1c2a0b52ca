//! Protocol concentration: TVL history per protocol as lines, with the latest
//! snapshot as a bar chart underneath.
//!
//! Both panels live on one surface and share one legend. Focusing a protocol in
//! the legend dims the other lines and the other bars.

use super::axis::{Side, TICK_FONT, draw_time_axis, draw_value_axis};
use super::frame::{self, crosshair, plot_rect, tooltip_box};
use super::geometry::{clip_samples, line_samples};
use super::legend::{LegendItem, LegendLayout, draw_legend};
use super::scene::{Anchor, Scene, Shape, Stroke};
use super::text::truncate_to_width;
use super::types::{ChartKind, PROTOCOL_BAR_HEIGHT, PROTOCOL_BAR_MARGINS, PROTOCOL_MARGINS};
use super::Chart;
use crate::interact::tooltip::{axis_dollars, format_date, format_share, tooltip_dollars};
use crate::interact::{
    ChartController, ChartEvent, DomainWindow, InteractionConfig, LayerOpacity, PlotRect, Redraw,
    Tooltip, VisibilityState,
};
use crate::models::{ProtocolLatestRow, ProtocolTvlRow, SeriesId, date_to_ts};
use crate::prep::{ProtocolHistory, protocol_history, sort_latest};
use crate::scale::LinearScale;
use crate::stats::{Summary, series_summary, summarize};
use crate::style::{self, Rgba, tableau_color};

const LINE_STROKE: f32 = 1.7;
/// Inner and outer padding of the bar band, as a fraction of the step.
const BAR_PADDING: f32 = 0.2;

/// Bar opacity when normal and when another protocol is focused.
pub const DEFAULT_BAR_OPACITY: LayerOpacity = LayerOpacity::new(0.9, 0.25);

pub struct ProtocolConcentration {
    width: u32,
    height: u32,
    history: ProtocolHistory,
    latest: Vec<ProtocolLatestRow>,
    latest_total: f64,
    bar_colors: Vec<Rgba>,
    y: LinearScale,
    bar_plot: PlotRect,
    bar_y: LinearScale,
    opacity: LayerOpacity,
    bar_opacity: LayerOpacity,
    bar_hover: Option<(usize, (f32, f32))>,
    ctl: ChartController,
}

impl ProtocolConcentration {
    /// `width` x `height` is the line panel; the bar panel is added below it.
    pub fn new(
        history: &[ProtocolTvlRow],
        latest: Vec<ProtocolLatestRow>,
        width: u32,
        height: u32,
        cfg: InteractionConfig,
        bar_opacity: LayerOpacity,
    ) -> Self {
        let history = protocol_history(history);
        let latest = sort_latest(latest);
        let latest_total = latest.iter().map(|r| r.tvl).sum();

        // Bars reuse the line colors; protocols without a line continue the palette.
        let keys = history.table.keys();
        let mut extra = keys.len();
        let bar_colors = latest
            .iter()
            .map(|r| match keys.iter().position(|k| *k == r.protocol) {
                Some(i) => tableau_color(i),
                None => {
                    extra += 1;
                    tableau_color(extra - 1)
                }
            })
            .collect();

        let plot = plot_rect(width, height, 0.0, PROTOCOL_MARGINS);
        let y = LinearScale::new((0.0, history.max_tvl * 1.1), (plot.bottom(), plot.top));
        let bar_plot = plot_rect(width, PROTOCOL_BAR_HEIGHT, height as f32, PROTOCOL_BAR_MARGINS);
        let bar_max = latest.iter().map(|r| r.tvl).fold(0.0, f64::max);
        let bar_y = LinearScale::new((0.0, bar_max * 1.1), (bar_plot.bottom(), bar_plot.top));

        let window = DomainWindow::from_times(history.table.times().iter().copied(), cfg.scale_extent);
        let visibility = VisibilityState::new(
            cfg.legend,
            history.lines.iter().map(|s| s.id.clone()),
        );
        Self {
            width,
            height,
            history,
            latest,
            latest_total,
            bar_colors,
            y,
            bar_plot,
            bar_y,
            opacity: cfg.opacity,
            bar_opacity,
            bar_hover: None,
            ctl: ChartController::new(window, visibility, plot),
        }
    }

    /// Latest snapshot, largest first.
    pub fn latest(&self) -> &[ProtocolLatestRow] {
        &self.latest
    }

    /// Bar chart plot area.
    pub fn bar_plot(&self) -> PlotRect {
        self.bar_plot
    }

    /// Left edge and width of bar `i`.
    fn band(&self, i: usize) -> (f32, f32) {
        let n = self.latest.len() as f32;
        let w = self.bar_plot.width;
        let step = w / (n + BAR_PADDING).max(1.0);
        let start = (w - step * (n - BAR_PADDING)) / 2.0;
        (
            self.bar_plot.left + start + i as f32 * step,
            step * (1.0 - BAR_PADDING),
        )
    }

    fn bar_rect(&self, i: usize) -> Option<((f32, f32), (f32, f32))> {
        let row = self.latest.get(i)?;
        let (x, w) = self.band(i);
        Some(((x, self.bar_y.map(row.tvl)), (x + w, self.bar_plot.bottom())))
    }

    /// Bar under the pointer, if any.
    pub fn bar_at(&self, x: f32, y: f32) -> Option<usize> {
        (0..self.latest.len()).find(|&i| {
            self.bar_rect(i)
                .is_some_and(|(min, max)| x >= min.0 && x <= max.0 && y >= min.1 && y <= max.1)
        })
    }

    /// Center of bar `i`, for driving hover without a pointer.
    pub fn bar_center(&self, i: usize) -> Option<(f32, f32)> {
        let (min, max) = self.bar_rect(i)?;
        Some(((min.0 + max.0) / 2.0, (min.1 + max.1) / 2.0))
    }

    fn draw_lines(&self, scene: &mut Scene) {
        let plot = self.ctl.plot();
        let x = self.ctl.x_scale();
        let (lo, hi) = (self.ctl.window.start(), self.ctl.window.end());
        let vis = &self.ctl.visibility;

        for series in &self.history.lines {
            let opacity = vis.opacity(&series.id, self.opacity);
            if opacity <= 0.0 {
                continue;
            }
            let samples = clip_samples(&line_samples(series.times(), series.values()), lo, hi);
            scene.push(Shape::Polyline {
                points: samples.iter().map(|&(t, (v, _))| (x.map(t), self.y.map(v))).collect(),
                stroke: Stroke::solid(series.color, LINE_STROKE),
                opacity,
            });
        }

        draw_time_axis(scene, plot, &x);
        draw_value_axis(scene, plot, &self.y, Side::Left, 6, axis_dollars, "Protocol TVL (USD)");

        let items: Vec<LegendItem> = self
            .history
            .lines
            .iter()
            .map(|s| LegendItem::new(s.id.clone(), s.label.clone(), s.color))
            .collect();
        let layout = LegendLayout {
            row_height: 16.0,
            text_dx: 14.0,
            ..LegendLayout::at((plot.right() + 12.0, plot.top + 4.0))
        };
        draw_legend(scene, &items, layout, vis);

        let Some(hit) = self.ctl.hover.hit() else {
            return;
        };
        let table = &self.history.table;
        let Some(row) = hit.index(0).and_then(|i| table.row(i)) else {
            return;
        };
        let t = date_to_ts(row.date);
        let px = x.map(t);
        if px >= plot.left && px <= plot.right() {
            crosshair(scene, plot, px);
        }
        let mut lines = vec![format!("Total protocol TVL: {}", tooltip_dollars(row.total_tvl))];
        for (key, v) in table.keys().iter().zip(&row.values) {
            let share = if row.total_tvl > 0.0 { v / row.total_tvl } else { 0.0 };
            lines.push(format!("{key}: {} ({})", tooltip_dollars(*v), format_share(share)));
        }
        tooltip_box(scene, &Tooltip::at_pointer(hit.pointer, format_date(t), lines));
    }

    fn draw_bars(&self, scene: &mut Scene) {
        let plot = self.bar_plot;
        let vis = &self.ctl.visibility;
        for (i, (row, color)) in self.latest.iter().zip(&self.bar_colors).enumerate() {
            let Some((min, max)) = self.bar_rect(i) else {
                continue;
            };
            let opacity = vis.opacity(&SeriesId::from(row.protocol.as_str()), self.bar_opacity);
            scene.push(Shape::rect(min, max, *color, opacity));

            let (x, w) = self.band(i);
            scene.push(Shape::text(
                (x + w / 2.0, plot.bottom() + 14.0),
                truncate_to_width(&row.protocol, TICK_FONT, w / 0.8),
                TICK_FONT,
                style::AXIS,
                Anchor::Middle,
            ));
        }
        scene.push(Shape::Line {
            from: (plot.left, plot.bottom()),
            to: (plot.right(), plot.bottom()),
            stroke: Stroke::solid(style::AXIS, 1.0),
            opacity: 1.0,
        });
        draw_value_axis(scene, plot, &self.bar_y, Side::Left, 6, axis_dollars, "");

        if let Some((i, pointer)) = self.bar_hover {
            if let Some(row) = self.latest.get(i) {
                let share = if self.latest_total > 0.0 { row.tvl / self.latest_total } else { 0.0 };
                let of_rwa = if row.share_of_rwa.is_finite() {
                    format_share(row.share_of_rwa)
                } else {
                    "n/a".to_string()
                };
                let lines = vec![
                    format!("TVL: {}", tooltip_dollars(row.tvl)),
                    format!("Share of these protocols: {}", format_share(share)),
                    format!("Share of RWA: {of_rwa}"),
                ];
                tooltip_box(scene, &Tooltip::at_pointer(pointer, row.protocol.clone(), lines));
            }
        }
    }
}

impl Chart for ProtocolConcentration {
    fn kind(&self) -> ChartKind {
        ChartKind::Protocols
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height + PROTOCOL_BAR_HEIGHT)
    }

    fn controller(&self) -> Option<&ChartController> {
        Some(&self.ctl)
    }

    fn controller_mut(&mut self) -> Option<&mut ChartController> {
        Some(&mut self.ctl)
    }

    fn handle(&mut self, event: &ChartEvent) -> Redraw {
        let bar_changed = match event {
            ChartEvent::PointerMove { x, y } => {
                let bar = self.bar_at(*x, *y).map(|i| (i, (*x, *y)));
                let changed = bar != self.bar_hover;
                self.bar_hover = bar;
                changed
            }
            ChartEvent::PointerLeave => self.bar_hover.take().is_some(),
            _ => false,
        };
        let redraw = self.ctl.handle(event, &[self.history.table.times()]);
        if bar_changed {
            redraw.merge(Redraw {
                hover: true,
                ..Redraw::NONE
            })
        } else {
            redraw
        }
    }

    fn scene(&self) -> Scene {
        let (w, h) = self.size();
        let mut scene = Scene::new(w, h, style::BACKGROUND);
        self.draw_lines(&mut scene);
        self.draw_bars(&mut scene);
        frame::title(&mut scene, ChartKind::Protocols.title(), 0.0);
        frame::title(&mut scene, "Latest snapshot", self.height as f32);
        scene
    }

    fn summaries(&self) -> Vec<Summary> {
        let mut out = series_summary(&self.history.lines);
        let latest: Vec<f64> = self.latest.iter().map(|r| r.tvl).collect();
        out.push(summarize("latest_tvl", &latest));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interact::LegendBehavior;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn history() -> Vec<ProtocolTvlRow> {
        let mut rows = Vec::new();
        for day in 1..=5 {
            rows.push(ProtocolTvlRow { date: d(day), protocol: "Ondo".into(), tvl: 60e6 });
            rows.push(ProtocolTvlRow { date: d(day), protocol: "Maple".into(), tvl: 40e6 });
        }
        rows
    }

    fn latest() -> Vec<ProtocolLatestRow> {
        vec![
            ProtocolLatestRow { protocol: "Maple".into(), tvl: 40e6, share_of_rwa: 0.04 },
            ProtocolLatestRow { protocol: "Centrifuge".into(), tvl: 20e6, share_of_rwa: f64::NAN },
            ProtocolLatestRow { protocol: "Ondo".into(), tvl: 60e6, share_of_rwa: 0.06 },
        ]
    }

    fn chart() -> ProtocolConcentration {
        let cfg = InteractionConfig {
            legend: LegendBehavior::SingleFocus,
            opacity: LayerOpacity::new(1.0, 0.15),
            ..InteractionConfig::default()
        };
        ProtocolConcentration::new(&history(), latest(), 900, 420, cfg, DEFAULT_BAR_OPACITY)
    }

    fn bar_opacities(scene: &Scene, bar_plot: PlotRect) -> Vec<f32> {
        scene
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Rect { min, opacity, stroke: None, .. } if min.1 >= bar_plot.top => Some(*opacity),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn bars_sorted_and_colored_like_their_lines() {
        let c = chart();
        let names: Vec<&str> = c.latest().iter().map(|r| r.protocol.as_str()).collect();
        assert_eq!(names, vec!["Ondo", "Maple", "Centrifuge"]);
        assert_eq!(c.bar_colors[0], tableau_color(0));
        assert_eq!(c.bar_colors[1], tableau_color(1));
        assert_eq!(c.bar_colors[2], tableau_color(2));
        assert_eq!(c.size(), (900, 420 + PROTOCOL_BAR_HEIGHT));
    }

    #[test]
    fn bars_fill_the_band_with_padding() {
        let c = chart();
        let (x0, w) = c.band(0);
        let (x2, _) = c.band(2);
        let plot = c.bar_plot();
        let step = plot.width / 3.2;
        assert!((w - step * 0.8).abs() < 1e-3);
        assert!((x0 - plot.left - step * 0.2).abs() < 1e-3);
        assert!((plot.right() - (x2 + w) - step * 0.2).abs() < 1e-3);
    }

    #[test]
    fn legend_focus_dims_other_bars() {
        let mut c = chart();
        let plot = c.bar_plot();
        assert_eq!(bar_opacities(&c.scene(), plot), vec![0.9, 0.9, 0.9]);
        c.handle(&ChartEvent::LegendClick("Maple".into()));
        assert_eq!(bar_opacities(&c.scene(), plot), vec![0.25, 0.9, 0.25]);
    }

    #[test]
    fn hovering_a_bar_shows_its_tooltip() {
        let mut c = chart();
        let (x, y) = c.bar_center(1).unwrap();
        let r = c.handle(&ChartEvent::PointerMove { x, y });
        assert!(r.hover);
        let texts: Vec<String> = c.scene().texts().map(str::to_string).collect();
        assert!(texts.contains(&"TVL: $40.0M".to_string()));
        assert!(texts.contains(&"Share of these protocols: 33.3%".to_string()));
        assert!(texts.contains(&"Share of RWA: 4.0%".to_string()));

        let (x, y) = c.bar_center(2).unwrap();
        c.handle(&ChartEvent::PointerMove { x, y });
        let texts: Vec<String> = c.scene().texts().map(str::to_string).collect();
        assert!(texts.contains(&"Share of RWA: n/a".to_string()));

        c.handle(&ChartEvent::PointerLeave);
        assert!(!c.scene().texts().any(|t| t.starts_with("TVL:")));
    }

    #[test]
    fn line_tooltip_lists_every_protocol_with_share() {
        let mut c = chart();
        super::super::hover_at_time(&mut c, date_to_ts(d(3)));
        let texts: Vec<String> = c.scene().texts().map(str::to_string).collect();
        assert!(texts.contains(&"Total protocol TVL: $100M".to_string()));
        assert!(texts.contains(&"Ondo: $60.0M (60.0%)".to_string()));
        assert!(texts.contains(&"Maple: $40.0M (40.0%)".to_string()));
    }
}
