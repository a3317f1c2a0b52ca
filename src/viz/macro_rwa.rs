//! Macro liquidity vs RWA TVL: two lines on independent dollar axes.

use super::axis::{Side, draw_time_axis, draw_value_axis};
use super::frame::{self, crosshair, marker, plot_rect, tooltip_box};
use super::geometry::{clip_samples, line_samples};
use super::legend::{LegendItem, LegendLayout, draw_legend};
use super::scene::{Scene, Shape, Stroke};
use super::types::{ChartKind, MACRO_MARGINS};
use super::Chart;
use crate::interact::tooltip::{axis_dollars, format_date, format_percent, tooltip_dollars};
use crate::interact::{
    ChartController, ChartEvent, DomainWindow, InteractionConfig, LayerOpacity, Redraw, Tooltip,
    VisibilityState,
};
use crate::models::{MacroRow, Series, SeriesId, Timestamp, date_to_ts};
use crate::prep::macro_rows;
use crate::scale::LinearScale;
use crate::stats::{Summary, summarize};
use crate::style;

pub const RWA_ID: &str = "rwa";
pub const STABLE_ID: &str = "stable";

pub struct MacroChart {
    width: u32,
    height: u32,
    rows: Vec<MacroRow>,
    times: Vec<Timestamp>,
    rwa: Series,
    stable: Series,
    y_left: LinearScale,
    y_right: LinearScale,
    opacity: LayerOpacity,
    ctl: ChartController,
}

impl MacroChart {
    pub fn new(rows: Vec<MacroRow>, width: u32, height: u32, cfg: InteractionConfig) -> Self {
        let rows = macro_rows(rows);
        let times: Vec<Timestamp> = rows.iter().map(|r| date_to_ts(r.date)).collect();
        let column = |f: fn(&MacroRow) -> f64| -> Vec<(Timestamp, f64)> {
            rows.iter()
                .map(|r| (date_to_ts(r.date), f(r)))
                .filter(|(_, v)| v.is_finite())
                .collect()
        };
        let rwa = Series::new(RWA_ID, "RWA TVL", style::RWA_TVL, column(|r| r.rwa_tvl));
        let stable = Series::new(
            STABLE_ID,
            "Total stablecoin mcap",
            style::STABLECOINS,
            column(|r| r.total_stablecoin_mcap),
        );

        let plot = plot_rect(width, height, 0.0, MACRO_MARGINS);
        let y_range = (plot.bottom(), plot.top);
        let y_left = LinearScale::new((0.0, rwa.max_value().unwrap_or(0.0) * 1.1), y_range);
        let y_right = LinearScale::new((0.0, stable.max_value().unwrap_or(0.0) * 1.1), y_range);

        let window = DomainWindow::from_times(times.iter().copied(), cfg.scale_extent);
        let visibility =
            VisibilityState::new(cfg.legend, [SeriesId::from(RWA_ID), SeriesId::from(STABLE_ID)]);
        Self {
            width,
            height,
            rows,
            times,
            rwa,
            stable,
            y_left,
            y_right,
            opacity: cfg.opacity,
            ctl: ChartController::new(window, visibility, plot),
        }
    }

    fn lines(&self) -> [(&Series, &LinearScale); 2] {
        [(&self.rwa, &self.y_left), (&self.stable, &self.y_right)]
    }

    fn tooltip(&self, row: &MacroRow, pointer: (f32, f32)) -> Tooltip {
        let vis = &self.ctl.visibility;
        let mut lines = Vec::new();
        if vis.is_shown(&self.rwa.id) {
            lines.push(format!("RWA TVL: {}", tooltip_dollars(row.rwa_tvl)));
        }
        if vis.is_shown(&self.stable.id) {
            lines.push(format!("Stablecoins: {}", tooltip_dollars(row.total_stablecoin_mcap)));
        }
        lines.push(format!("Yield: {}", format_percent(row.treasury_yield, 2)));
        lines.push(format!("M2: {}", tooltip_dollars(row.m2_supply)));
        Tooltip::at_pointer(pointer, format_date(date_to_ts(row.date)), lines)
    }
}

impl Chart for MacroChart {
    fn kind(&self) -> ChartKind {
        ChartKind::Macro
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn controller(&self) -> Option<&ChartController> {
        Some(&self.ctl)
    }

    fn controller_mut(&mut self) -> Option<&mut ChartController> {
        Some(&mut self.ctl)
    }

    fn handle(&mut self, event: &ChartEvent) -> Redraw {
        self.ctl.handle(event, &[self.times.as_slice()])
    }

    fn scene(&self) -> Scene {
        let mut scene = Scene::new(self.width, self.height, style::BACKGROUND);
        let plot = self.ctl.plot();
        let x = self.ctl.x_scale();
        let (lo, hi) = (self.ctl.window.start(), self.ctl.window.end());
        let vis = &self.ctl.visibility;

        for (series, y) in self.lines() {
            let opacity = vis.opacity(&series.id, self.opacity);
            if opacity <= 0.0 {
                continue;
            }
            let samples = clip_samples(&line_samples(series.times(), series.values()), lo, hi);
            scene.push(Shape::Polyline {
                points: samples.iter().map(|&(t, (v, _))| (x.map(t), y.map(v))).collect(),
                stroke: Stroke::solid(series.color, 2.0),
                opacity,
            });
        }

        draw_time_axis(&mut scene, plot, &x);
        draw_value_axis(&mut scene, plot, &self.y_left, Side::Left, 6, axis_dollars, "RWA TVL (USD)");
        draw_value_axis(
            &mut scene,
            plot,
            &self.y_right,
            Side::Right,
            6,
            axis_dollars,
            "Total stablecoin mcap (USD)",
        );

        let items: Vec<LegendItem> = self
            .lines()
            .iter()
            .map(|(s, _)| LegendItem::new(s.id.clone(), s.label.clone(), s.color))
            .collect();
        draw_legend(
            &mut scene,
            &items,
            LegendLayout::at((plot.right() - 210.0, plot.top - 4.0)),
            vis,
        );

        if let Some(hit) = self.ctl.hover.hit() {
            if let Some(row) = hit.index(0).and_then(|i| self.rows.get(i)) {
                let px = x.map(date_to_ts(row.date));
                let in_plot = px >= plot.left && px <= plot.right();
                if in_plot && vis.any_shown() {
                    crosshair(&mut scene, plot, px);
                }
                for ((series, y), value) in self
                    .lines()
                    .into_iter()
                    .zip([row.rwa_tvl, row.total_stablecoin_mcap])
                {
                    if in_plot && vis.is_shown(&series.id) && value.is_finite() {
                        marker(&mut scene, (px, y.map(value)), series.color);
                    }
                }
                tooltip_box(&mut scene, &self.tooltip(row, hit.pointer));
            }
        }
        frame::title(&mut scene, ChartKind::Macro.title(), 0.0);
        scene
    }

    fn summaries(&self) -> Vec<Summary> {
        let col = |f: fn(&MacroRow) -> f64| -> Vec<f64> { self.rows.iter().map(f).collect() };
        vec![
            summarize("rwa_tvl", &col(|r| r.rwa_tvl)),
            summarize("total_stablecoin_mcap", &col(|r| r.total_stablecoin_mcap)),
            summarize("treasury_yield", &col(|r| r.treasury_yield)),
            summarize("m2_supply", &col(|r| r.m2_supply)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interact::LegendBehavior;
    use chrono::NaiveDate;

    fn row(day: u32, rwa: f64, stable: f64) -> MacroRow {
        MacroRow {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            rwa_tvl: rwa,
            total_stablecoin_mcap: stable,
            treasury_yield: 4.1,
            m2_supply: 21e12,
        }
    }

    fn chart() -> MacroChart {
        let cfg = InteractionConfig {
            legend: LegendBehavior::MultiToggle,
            ..InteractionConfig::default()
        };
        MacroChart::new(
            vec![row(3, 3e9, 150e9), row(1, 1e9, 130e9), row(2, 2e9, 140e9)],
            900,
            420,
            cfg,
        )
    }

    #[test]
    fn tooltip_lists_only_visible_lines() {
        let mut c = chart();
        let t = date_to_ts(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        super::super::hover_at_time(&mut c, t);
        let texts: Vec<String> = c.scene().texts().map(str::to_string).collect();
        assert!(texts.contains(&"2024-01-02".to_string()));
        assert!(texts.contains(&"RWA TVL: $2.00B".to_string()));
        assert!(texts.contains(&"Stablecoins: $140B".to_string()));
        assert!(texts.contains(&"Yield: 4.10%".to_string()));
        assert!(texts.contains(&"M2: $21.0T".to_string()));

        c.handle(&ChartEvent::LegendClick(STABLE_ID.into()));
        let texts: Vec<String> = c.scene().texts().map(str::to_string).collect();
        assert!(!texts.iter().any(|t| t.starts_with("Stablecoins:")));
    }

    #[test]
    fn hidden_line_is_not_drawn() {
        let mut c = chart();
        let lines = |c: &MacroChart| {
            c.scene()
                .shapes
                .iter()
                .filter(|s| matches!(s, Shape::Polyline { .. }))
                .count()
        };
        assert_eq!(lines(&c), 2);
        c.handle(&ChartEvent::LegendClick(RWA_ID.into()));
        c.handle(&ChartEvent::LegendClick(STABLE_ID.into()));
        assert_eq!(lines(&c), 0);
    }

    #[test]
    fn hover_on_duplicated_date_matches_drawn_line() {
        let cfg = InteractionConfig {
            legend: LegendBehavior::MultiToggle,
            ..InteractionConfig::default()
        };
        let rows = vec![row(1, 1e9, 130e9), row(2, 2e9, 140e9), row(2, 5e9, 145e9), row(3, 3e9, 150e9)];
        let mut c = MacroChart::new(rows, 900, 420, cfg);
        assert_eq!(c.rwa.values(), &[1e9, 5e9, 3e9]);

        let t = date_to_ts(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()) - 3600.0;
        super::super::hover_at_time(&mut c, t);
        let texts: Vec<String> = c.scene().texts().map(str::to_string).collect();
        assert!(texts.contains(&"RWA TVL: $5.00B".to_string()));
        assert!(texts.contains(&"Stablecoins: $145B".to_string()));
    }

    #[test]
    fn rows_are_sorted_and_summarized() {
        let c = chart();
        let s = c.summaries();
        assert_eq!(s[0].series, "rwa_tvl");
        assert_eq!(s[0].last, Some(3e9));
        assert_eq!(s[0].min, Some(1e9));
    }
}
