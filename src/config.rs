//! Per-chart settings: size, zoom limits, legend behaviour and layer opacities.
//!
//! Every chart has built-in defaults. An optional JSON file overrides any subset
//! of them per chart:
//!
//! ```json
//! {
//!   "charts": {
//!     "macro": { "scale_extent": { "min": 1, "max": 10 } },
//!     "asset-shares": { "legend": "multi-toggle", "height": 480 }
//!   }
//! }
//! ```

use crate::interact::{InteractionConfig, LayerOpacity, LegendBehavior, ScaleExtent};
use crate::viz::protocols::DEFAULT_BAR_OPACITY;
use crate::viz::{ChartKind, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Effective settings for one chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub interaction: InteractionConfig,
    /// Protocol bar chart only.
    pub bar_opacity: LayerOpacity,
}

impl ChartConfig {
    pub fn defaults(kind: ChartKind) -> Self {
        let (legend, scale, opacity) = match kind {
            ChartKind::Macro => (LegendBehavior::MultiToggle, (1.0, 20.0), (1.0, 0.15)),
            ChartKind::AssetShares | ChartKind::Yield => {
                (LegendBehavior::SingleFocus, (1.0, 8.0), (0.85, 0.2))
            }
            ChartKind::Chains => (LegendBehavior::SingleFocus, (1.0, 8.0), (0.9, 0.15)),
            ChartKind::Protocols => (LegendBehavior::SingleFocus, (1.0, 12.0), (1.0, 0.15)),
            ChartKind::Gauge => (LegendBehavior::SingleFocus, (1.0, 1.0), (1.0, 0.15)),
        };
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            interaction: InteractionConfig {
                scale_extent: ScaleExtent::new(scale.0, scale.1),
                legend,
                opacity: LayerOpacity::new(opacity.0, opacity.1),
            },
            bar_opacity: DEFAULT_BAR_OPACITY,
        }
    }
}

/// Optional overrides for one chart; unset fields keep the default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartOverride {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub scale_extent: Option<ScaleExtent>,
    pub legend: Option<LegendBehavior>,
    pub opacity: Option<LayerOpacity>,
    pub bar_opacity: Option<LayerOpacity>,
}

impl ChartOverride {
    fn apply(&self, mut cfg: ChartConfig) -> ChartConfig {
        if let Some(w) = self.width {
            cfg.width = w;
        }
        if let Some(h) = self.height {
            cfg.height = h;
        }
        if let Some(e) = self.scale_extent {
            cfg.interaction.scale_extent = e;
        }
        if let Some(l) = self.legend {
            cfg.interaction.legend = l;
        }
        if let Some(o) = self.opacity {
            cfg.interaction.opacity = o;
        }
        if let Some(o) = self.bar_opacity {
            cfg.bar_opacity = o;
        }
        cfg
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub charts: BTreeMap<ChartKind, ChartOverride>,
}

impl DashboardConfig {
    /// Read a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: DashboardConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::debug!("loaded overrides for {} chart(s) from {}", cfg.charts.len(), path.display());
        Ok(cfg)
    }

    /// Set the size of every time-series chart, on top of what the file says.
    pub fn override_size(&mut self, width: Option<u32>, height: Option<u32>) {
        for kind in ChartKind::ALL {
            if kind == ChartKind::Gauge {
                continue;
            }
            let entry = self.charts.entry(kind).or_default();
            entry.width = width.or(entry.width);
            entry.height = height.or(entry.height);
        }
    }

    /// Defaults for `kind` with this config's overrides applied.
    pub fn for_chart(&self, kind: ChartKind) -> ChartConfig {
        let defaults = ChartConfig::defaults(kind);
        match self.charts.get(&kind) {
            Some(o) => o.apply(defaults),
            None => defaults,
        }
    }
}
