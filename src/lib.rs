//! rwa_dash
//!
//! Interactive charts for a real-world-asset (RWA) and macro liquidity dashboard.
//! Pairs with the `rwa-dash` CLI (SVG output) and the `rwa-dash-gui` desktop viewer.
//!
//! ### Features
//! - Load the dashboard's CSV sources into typed rows
//! - Macro lines, stacked allocations, protocol concentration, yield overlay and
//!   an M2 liquidity gauge
//! - Horizontal zoom and pan with clamped scale, legend toggle or focus, nearest
//!   point hover with tooltips
//! - Summary statistics per series
//!
//! ### Example
//! ```no_run
//! use rwa_dash::{DashboardConfig, DataDir, build_chart};
//! use rwa_dash::interact::ChartEvent;
//! use rwa_dash::viz::{ChartKind, write_svg};
//!
//! let data = DataDir::new("data");
//! let mut chart = build_chart(ChartKind::Macro, &data, &DashboardConfig::default())?;
//! chart.handle(&ChartEvent::LegendClick("stable".into()));
//! write_svg(&chart.scene(), "macro.svg")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod dashboard;
pub mod gauge;
pub mod interact;
pub mod loader;
pub mod models;
pub mod prep;
pub mod scale;
pub mod stats;
pub mod style;
pub mod viz;

pub use config::{ChartConfig, DashboardConfig};
pub use dashboard::{build_all, build_chart};
pub use loader::{DataDir, LoadError};
pub use models::{Series, SeriesId, Timestamp};
pub use viz::Chart;
