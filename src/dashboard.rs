//! Loading sources and assembling charts.

use crate::config::DashboardConfig;
use crate::loader::{DataDir, LoadError, sources};
use crate::models::{
    AssetShareRow, ChainAllocationRow, GaugeRow, MacroRow, ProtocolLatestRow, ProtocolTvlRow,
    YieldRow,
};
use crate::viz::{Chart, ChartKind, GaugeChart, MacroChart, ProtocolConcentration, StackedChart};

/// Load the sources of `kind` and build its chart.
///
/// A failed gauge source is not an error: the gauge is built in its failed state
/// and only shows the error caption.
pub fn build_chart(
    kind: ChartKind,
    data: &DataDir,
    config: &DashboardConfig,
) -> Result<Box<dyn Chart>, LoadError> {
    let cfg = config.for_chart(kind);
    let (w, h, ic) = (cfg.width, cfg.height, cfg.interaction);
    let chart: Box<dyn Chart> = match kind {
        ChartKind::Macro => {
            let rows: Vec<MacroRow> = data.load(sources::MACRO_VS_RWA)?;
            Box::new(MacroChart::new(rows, w, h, ic))
        }
        ChartKind::AssetShares => {
            let rows: Vec<AssetShareRow> = data.load(sources::ASSET_TYPE_SHARES)?;
            Box::new(StackedChart::asset_shares(&rows, w, h, ic))
        }
        ChartKind::Chains => {
            let rows: Vec<ChainAllocationRow> = data.load(sources::CHAIN_ALLOCATION)?;
            Box::new(StackedChart::chains(&rows, w, h, ic))
        }
        ChartKind::Protocols => {
            let history: Vec<ProtocolTvlRow> = data.load(sources::PROTOCOL_TIMESERIES)?;
            let latest: Vec<ProtocolLatestRow> = data.load(sources::PROTOCOL_LATEST)?;
            Box::new(ProtocolConcentration::new(&history, latest, w, h, ic, cfg.bar_opacity))
        }
        ChartKind::Yield => {
            let shares: Vec<AssetShareRow> = data.load(sources::ASSET_TYPE_SHARES)?;
            let yields: Vec<YieldRow> = data.load(sources::YIELD_TIMESERIES)?;
            Box::new(StackedChart::yield_overlay(&shares, &yields, w, h, ic))
        }
        ChartKind::Gauge => match data.load::<GaugeRow>(sources::M2_GAUGE) {
            Ok(rows) => Box::new(GaugeChart::from_rows(&rows)),
            Err(err) => {
                log::error!("{err}");
                Box::new(GaugeChart::failed())
            }
        },
    };
    Ok(chart)
}

/// Build every chart in `kinds`. Failures are logged and returned alongside the
/// charts that did load.
pub fn build_all(
    kinds: &[ChartKind],
    data: &DataDir,
    config: &DashboardConfig,
) -> Vec<(ChartKind, Result<Box<dyn Chart>, LoadError>)> {
    log::debug!("building {} chart(s) from {}", kinds.len(), data.root().display());
    kinds
        .iter()
        .map(|&kind| {
            let chart = build_chart(kind, data, config);
            if let Err(err) = &chart {
                log::error!("{} chart not loaded: {err}", kind.name());
            }
            (kind, chart)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gauge::LOAD_ERROR_CAPTION;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_gauge_source_yields_error_caption() {
        let dir = tempdir().unwrap();
        let chart = build_chart(ChartKind::Gauge, &DataDir::new(dir.path()), &DashboardConfig::default())
            .unwrap();
        assert_eq!(chart.scene().caption.as_deref(), Some(LOAD_ERROR_CAPTION));
    }

    #[test]
    fn missing_source_fails_other_charts() {
        let dir = tempdir().unwrap();
        let data = DataDir::new(dir.path());
        let results = build_all(&[ChartKind::Macro, ChartKind::Gauge], &data, &DashboardConfig::default());
        assert!(matches!(results[0].1, Err(LoadError::Io { .. })));
        assert!(results[1].1.is_ok());
    }

    #[test]
    fn yield_needs_both_sources() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(sources::ASSET_TYPE_SHARES),
            "date,asset_type,tvl,share\n2024-01-01,Treasury,1,1\n",
        )
        .unwrap();
        let data = DataDir::new(dir.path());
        let cfg = DashboardConfig::default();
        assert!(build_chart(ChartKind::AssetShares, &data, &cfg).is_ok());
        assert!(build_chart(ChartKind::Yield, &data, &cfg).is_err());
    }
}
