//! Public types and constants for the visualization module.

use serde::{Deserialize, Serialize};

/// The dashboard's charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    /// Dual-axis RWA TVL vs stablecoin market cap.
    Macro,
    /// Stacked shares of RWA TVL by asset type.
    AssetShares,
    /// Stacked TVL of the largest chains.
    Chains,
    /// Protocol TVL lines plus the latest snapshot as bars.
    Protocols,
    /// Asset-type shares with the 10Y Treasury yield on a second axis.
    Yield,
    /// M2 growth liquidity gauge.
    Gauge,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::Gauge,
        ChartKind::Macro,
        ChartKind::AssetShares,
        ChartKind::Chains,
        ChartKind::Protocols,
        ChartKind::Yield,
    ];

    /// Short name used on the command line and in config files.
    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::Macro => "macro",
            ChartKind::AssetShares => "asset-shares",
            ChartKind::Chains => "chains",
            ChartKind::Protocols => "protocols",
            ChartKind::Yield => "yield",
            ChartKind::Gauge => "gauge",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Macro => "Macro Liquidity vs RWA TVL",
            ChartKind::AssetShares => "Capital Allocation by Asset Type",
            ChartKind::Chains => "Chain Allocation Over Time",
            ChartKind::Protocols => "Protocol Concentration",
            ChartKind::Yield => "Yield vs RWA Asset Composition",
            ChartKind::Gauge => "M2 Liquidity Gauge",
        }
    }

    /// Output file name without extension.
    pub fn file_stem(&self) -> String {
        self.name().replace('-', "_")
    }
}

/// Space around the plot area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Line overlays with axes on both sides.
pub const MACRO_MARGINS: Margins = Margins::new(24.0, 70.0, 40.0, 70.0);
/// Stacked charts keep their legend in a wide right margin.
pub const ASSET_MARGINS: Margins = Margins::new(24.0, 190.0, 40.0, 60.0);
pub const CHAIN_MARGINS: Margins = Margins::new(24.0, 190.0, 40.0, 70.0);
pub const PROTOCOL_MARGINS: Margins = Margins::new(24.0, 190.0, 40.0, 70.0);
pub const PROTOCOL_BAR_MARGINS: Margins = Margins::new(20.0, 20.0, 60.0, 90.0);
pub const YIELD_MARGINS: Margins = Margins::new(24.0, 190.0, 40.0, 60.0);

pub const DEFAULT_WIDTH: u32 = 900;
pub const DEFAULT_HEIGHT: u32 = 420;
/// Extra height below the protocol lines for the snapshot bars.
pub const PROTOCOL_BAR_HEIGHT: u32 = 320;
