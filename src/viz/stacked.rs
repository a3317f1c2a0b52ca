//! Stacked area charts over a [`WideTable`]: asset-type shares, chain allocation,
//! and the asset shares again with the 10Y yield overlaid on a second axis.
//!
//! Legends use single focus: clicking a layer dims the others, clicking it again
//! restores them. The yield entry is informational and ignores clicks.

use super::axis::{Side, draw_time_axis, draw_value_axis, share_tick};
use super::frame::{self, crosshair, plot_rect, tooltip_box};
use super::geometry::{band_samples, clip_samples, line_samples};
use super::legend::{LegendItem, LegendLayout, draw_legend};
use super::scene::{Scene, Shape, Stroke};
use super::types::{ASSET_MARGINS, CHAIN_MARGINS, ChartKind, Margins, YIELD_MARGINS};
use super::Chart;
use crate::interact::tooltip::{axis_dollars, format_date, format_percent, format_share, tooltip_dollars};
use crate::interact::{
    ChartController, ChartEvent, DomainWindow, InteractionConfig, LayerOpacity, Redraw, Tooltip,
    VisibilityState,
};
use crate::models::{AssetShareRow, ChainAllocationRow, SeriesId, Timestamp, YieldRow, date_to_ts};
use crate::prep::{WideRow, WideTable, asset_share_table, chain_allocation_table, join_yield};
use crate::scale::LinearScale;
use crate::stats::{Summary, summarize};
use crate::style::{self, Rgba};

/// Legend id of the yield line.
pub const YIELD_ID: &str = "yield_10y";

const YIELD_STROKE: f32 = 1.8;
const YIELD_OPACITY: f32 = 0.95;

pub struct StackedChart {
    kind: ChartKind,
    width: u32,
    height: u32,
    table: WideTable,
    colors: Vec<Rgba>,
    /// `(lower, upper)` per key, per row.
    layers: Vec<Vec<(f64, f64)>>,
    y: LinearScale,
    y_yield: Option<LinearScale>,
    opacity: LayerOpacity,
    ctl: ChartController,
}

impl StackedChart {
    /// Shares of RWA TVL by asset type, stacked to 100%.
    pub fn asset_shares(rows: &[AssetShareRow], width: u32, height: u32, cfg: InteractionConfig) -> Self {
        let table = asset_share_table(rows);
        let colors = table.keys().iter().map(|k| style::asset_type_color(k)).collect();
        Self::build(ChartKind::AssetShares, table, colors, 1.0, width, height, ASSET_MARGINS, cfg)
    }

    /// TVL of the largest chains, stacked.
    pub fn chains(rows: &[ChainAllocationRow], width: u32, height: u32, cfg: InteractionConfig) -> Self {
        let table = chain_allocation_table(rows);
        let colors = (0..table.keys().len()).map(style::tableau_color).collect();
        let y_max = table.max_total() * 1.1;
        Self::build(ChartKind::Chains, table, colors, y_max, width, height, CHAIN_MARGINS, cfg)
    }

    /// Asset-type shares with the 10Y Treasury yield on the right axis.
    pub fn yield_overlay(
        shares: &[AssetShareRow],
        yields: &[YieldRow],
        width: u32,
        height: u32,
        cfg: InteractionConfig,
    ) -> Self {
        let mut table = asset_share_table(shares);
        join_yield(&mut table, yields);
        let colors = table.keys().iter().map(|k| style::asset_type_color(k)).collect();
        let mut chart = Self::build(ChartKind::Yield, table, colors, 1.0, width, height, YIELD_MARGINS, cfg);

        let plot = chart.ctl.plot();
        chart.y_yield = Some(LinearScale::new(
            (0.0, chart.table.max_yield() * 1.1),
            (plot.bottom(), plot.top),
        ));
        let mut ids: Vec<SeriesId> = chart.ctl.visibility.ids().to_vec();
        ids.push(SeriesId::from(YIELD_ID));
        chart.ctl.visibility = VisibilityState::new(cfg.legend, ids).with_fixed(YIELD_ID);
        chart
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        kind: ChartKind,
        table: WideTable,
        colors: Vec<Rgba>,
        y_max: f64,
        width: u32,
        height: u32,
        margins: Margins,
        cfg: InteractionConfig,
    ) -> Self {
        let plot = plot_rect(width, height, 0.0, margins);
        let y = LinearScale::new((0.0, y_max), (plot.bottom(), plot.top));
        let window = DomainWindow::from_times(table.times().iter().copied(), cfg.scale_extent);
        let visibility = VisibilityState::new(
            cfg.legend,
            table.keys().iter().map(|k| SeriesId::from(k.as_str())),
        );
        let layers = table.stack();
        Self {
            kind,
            width,
            height,
            table,
            colors,
            layers,
            y,
            y_yield: None,
            opacity: cfg.opacity,
            ctl: ChartController::new(window, visibility, plot),
        }
    }

    pub fn table(&self) -> &WideTable {
        &self.table
    }

    fn legend_items(&self) -> Vec<LegendItem> {
        let mut items: Vec<LegendItem> = self
            .table
            .keys()
            .iter()
            .zip(&self.colors)
            .map(|(k, c)| LegendItem::new(k.as_str(), k.as_str(), *c))
            .collect();
        if self.y_yield.is_some() {
            items.push(LegendItem::new(YIELD_ID, "10Y Yield", style::YIELD_LINE));
        }
        items
    }

    fn legend_layout(&self) -> LegendLayout {
        let plot = self.ctl.plot();
        if self.y_yield.is_some() {
            LegendLayout {
                max_label_px: 120.0,
                ..LegendLayout::at((plot.right() + 50.0, plot.top + 6.0))
            }
        } else {
            LegendLayout::at((plot.right() + 12.0, plot.top + 6.0))
        }
    }

    fn tooltip_lines(&self, row: &WideRow) -> Vec<String> {
        let keys = self.table.keys();
        let mut lines = Vec::new();
        match self.kind {
            ChartKind::Chains => {
                lines.push(format!("Total TVL: {}", tooltip_dollars(row.total_tvl)));
                for (key, v) in keys.iter().zip(&row.values) {
                    let share = if row.total_tvl > 0.0 { v / row.total_tvl } else { 0.0 };
                    lines.push(format!("{key}: {} ({})", tooltip_dollars(*v), format_share(share)));
                }
            }
            _ => {
                if self.y_yield.is_some() {
                    lines.push(match row.yield_10y {
                        Some(y) => format!("10Y yield: {}", format_percent(y, 2)),
                        None => "10Y yield: n/a".to_string(),
                    });
                    lines.push(String::new());
                }
                lines.push(format!("Total RWA TVL: {}", tooltip_dollars(row.total_tvl)));
                for (key, v) in keys.iter().zip(&row.values) {
                    lines.push(format!("{key}: {} of RWA TVL", format_share(*v)));
                }
            }
        }
        lines
    }

    fn draw_yield_line(&self, scene: &mut Scene, x: &LinearScale, lo: Timestamp, hi: Timestamp) {
        let Some(y) = &self.y_yield else {
            return;
        };
        let (times, values): (Vec<Timestamp>, Vec<f64>) = self
            .table
            .rows()
            .iter()
            .zip(self.table.times())
            .filter_map(|(r, &t)| r.yield_10y.map(|v| (t, v)))
            .unzip();
        let samples = clip_samples(&line_samples(&times, &values), lo, hi);
        scene.push(Shape::Polyline {
            points: samples.iter().map(|&(t, (v, _))| (x.map(t), y.map(v))).collect(),
            stroke: Stroke::solid(style::YIELD_LINE, YIELD_STROKE),
            opacity: YIELD_OPACITY,
        });
    }
}

impl Chart for StackedChart {
    fn kind(&self) -> ChartKind {
        self.kind
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
        self.ctl.handle(event, &[self.table.times()])
    }

    fn scene(&self) -> Scene {
        let mut scene = Scene::new(self.width, self.height, style::BACKGROUND);
        let plot = self.ctl.plot();
        let x = self.ctl.x_scale();
        let (lo, hi) = (self.ctl.window.start(), self.ctl.window.end());
        let vis = &self.ctl.visibility;
        let times = self.table.times();

        for ((key, layer), color) in self.table.keys().iter().zip(&self.layers).zip(&self.colors) {
            let opacity = vis.opacity(&SeriesId::from(key.as_str()), self.opacity);
            let samples = clip_samples(&band_samples(times, layer), lo, hi);
            if samples.len() < 2 || opacity <= 0.0 {
                continue;
            }
            scene.push(Shape::Area {
                upper: samples.iter().map(|&(t, (_, up))| (x.map(t), self.y.map(up))).collect(),
                lower: samples.iter().map(|&(t, (low, _))| (x.map(t), self.y.map(low))).collect(),
                fill: *color,
                opacity,
            });
        }
        self.draw_yield_line(&mut scene, &x, lo, hi);

        draw_time_axis(&mut scene, plot, &x);
        match self.kind {
            ChartKind::Chains => {
                draw_value_axis(&mut scene, plot, &self.y, Side::Left, 6, axis_dollars, "RWA TVL (USD)")
            }
            _ => draw_value_axis(&mut scene, plot, &self.y, Side::Left, 5, share_tick, "Share of RWA TVL"),
        }
        if let Some(y) = &self.y_yield {
            draw_value_axis(&mut scene, plot, y, Side::Right, 5, |v| format_percent(v, 2), "");
        }
        draw_legend(&mut scene, &self.legend_items(), self.legend_layout(), vis);

        if let Some(hit) = self.ctl.hover.hit() {
            if let Some(row) = hit.index(0).and_then(|i| self.table.row(i)) {
                let t = date_to_ts(row.date);
                let px = x.map(t);
                if px >= plot.left && px <= plot.right() {
                    crosshair(&mut scene, plot, px);
                }
                let tip = Tooltip::at_pointer(hit.pointer, format_date(t), self.tooltip_lines(row));
                tooltip_box(&mut scene, &tip);
            }
        }
        frame::title(&mut scene, self.kind.title(), 0.0);
        scene
    }

    fn summaries(&self) -> Vec<Summary> {
        let rows = self.table.rows();
        let mut out: Vec<Summary> = self
            .table
            .keys()
            .iter()
            .enumerate()
            .map(|(i, key)| {
                let col: Vec<f64> = rows.iter().map(|r| r.values.get(i).copied().unwrap_or(f64::NAN)).collect();
                summarize(key, &col)
            })
            .collect();
        let totals: Vec<f64> = rows.iter().map(|r| r.total_tvl).collect();
        out.push(summarize("total_tvl", &totals));
        if self.y_yield.is_some() {
            let yields: Vec<f64> = rows.iter().map(|r| r.yield_10y.unwrap_or(f64::NAN)).collect();
            out.push(summarize(YIELD_ID, &yields));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interact::{LegendBehavior, ScaleExtent};
    use crate::models::SECONDS_PER_DAY;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn share(day: u32, ty: &str, tvl: f64, share: f64) -> AssetShareRow {
        AssetShareRow {
            date: d(day),
            asset_type: ty.into(),
            tvl,
            share,
        }
    }

    fn shares() -> Vec<AssetShareRow> {
        let mut rows = Vec::new();
        for day in 1..=10 {
            rows.push(share(day, "Diversified", 1e8, 0.1));
            rows.push(share(day, "Private Credit", 3e8, 0.3));
            rows.push(share(day, "Treasury", 6e8, 0.6));
        }
        rows
    }

    fn cfg() -> InteractionConfig {
        InteractionConfig {
            scale_extent: ScaleExtent::new(1.0, 8.0),
            legend: LegendBehavior::SingleFocus,
            opacity: LayerOpacity::new(0.85, 0.2),
        }
    }

    fn area_opacities(scene: &Scene) -> Vec<f32> {
        scene
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Area { opacity, .. } => Some(*opacity),
                _ => None,
            })
            .collect()
    }

    fn texts(chart: &dyn Chart) -> Vec<String> {
        chart.scene().texts().map(str::to_string).collect()
    }

    #[test]
    fn focus_dims_other_layers() {
        let mut c = StackedChart::asset_shares(&shares(), 900, 420, cfg());
        assert_eq!(area_opacities(&c.scene()), vec![0.85, 0.85, 0.85]);

        let r = c.handle(&ChartEvent::LegendClick("Treasury".into()));
        assert!(r.geometry && r.legend);
        assert_eq!(area_opacities(&c.scene()), vec![0.2, 0.2, 0.85]);

        c.handle(&ChartEvent::LegendClick("Treasury".into()));
        assert_eq!(area_opacities(&c.scene()), vec![0.85, 0.85, 0.85]);
    }

    #[test]
    fn asset_share_tooltip() {
        let mut c = StackedChart::asset_shares(&shares(), 900, 420, cfg());
        super::super::hover_at_time(&mut c, date_to_ts(d(4)));
        let t = texts(&c);
        assert!(t.contains(&"2024-01-04".to_string()));
        assert!(t.contains(&"Total RWA TVL: $1.00B".to_string()));
        assert!(t.contains(&"Private Credit: 30.0% of RWA TVL".to_string()));
    }

    #[test]
    fn chain_tooltip_shows_value_and_share() {
        let rows: Vec<ChainAllocationRow> = [("Ethereum", 75e6), ("Polygon", 25e6)]
            .iter()
            .map(|(chain, tvl)| ChainAllocationRow {
                date: d(1),
                chain: chain.to_string(),
                tvl: *tvl,
                share_within_chains: f64::NAN,
            })
            .collect();
        let mut c = StackedChart::chains(&rows, 900, 420, cfg());
        super::super::hover_at_time(&mut c, date_to_ts(d(1)));
        let t = texts(&c);
        assert!(t.contains(&"Total TVL: $100M".to_string()));
        assert!(t.contains(&"Ethereum: $75.0M (75.0%)".to_string()));
        assert!(t.contains(&"Polygon: $25.0M (25.0%)".to_string()));
    }

    #[test]
    fn yield_entry_is_not_clickable_and_missing_yield_reads_na() {
        let yields = vec![
            YieldRow { date: d(1), yield_10y: Some(4.0) },
            YieldRow { date: d(2), yield_10y: None },
        ];
        let mut c = StackedChart::yield_overlay(&shares(), &yields, 900, 420, cfg());
        let scene = c.scene();
        assert_eq!(scene.legend_hits.len(), 3);
        assert!(scene.texts().any(|t| t == "10Y Yield"));
        assert!(!c.handle(&ChartEvent::LegendClick(YIELD_ID.into())).any());

        super::super::hover_at_time(&mut c, date_to_ts(d(2)));
        let t = texts(&c);
        assert!(t.contains(&"10Y yield: n/a".to_string()));
        super::super::hover_at_time(&mut c, date_to_ts(d(1)));
        let t = texts(&c);
        assert!(t.contains(&"10Y yield: 4.00%".to_string()));
    }

    #[test]
    fn zoomed_areas_stay_inside_the_plot() {
        let mut c = StackedChart::asset_shares(&shares(), 900, 420, cfg());
        super::super::zoom_at_time(&mut c, 3.0, date_to_ts(d(5)) + SECONDS_PER_DAY / 3.0);
        let plot = c.controller().unwrap().plot();
        for shape in &c.scene().shapes {
            if let Shape::Area { upper, lower, .. } = shape {
                for p in upper.iter().chain(lower) {
                    assert!(p.0 >= plot.left - 0.01 && p.0 <= plot.right() + 0.01);
                }
            }
        }
    }

    #[test]
    fn summaries_cover_every_column() {
        let c = StackedChart::asset_shares(&shares(), 900, 420, cfg());
        let names: Vec<String> = c.summaries().into_iter().map(|s| s.series).collect();
        assert_eq!(names, vec!["Diversified", "Private Credit", "Treasury", "total_tvl"]);
    }
}
