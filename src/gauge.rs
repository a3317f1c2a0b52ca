//! Liquidity gauge: maps the latest M2 growth reading onto a half-dial.

use crate::models::GaugeRow;
use crate::style::Rgba;
use chrono::NaiveDate;

/// A labelled percentage range on the dial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub label: &'static str,
    pub start: f64,
    pub end: f64,
    pub color: Rgba,
}

/// The four liquidity regimes, left to right.
pub const REGIMES: [Band; 4] = [
    Band { label: "Contraction", start: 0.0, end: 25.0, color: Rgba::hex(0xef4444) },
    Band { label: "Neutral", start: 25.0, end: 50.0, color: Rgba::hex(0xeab308) },
    Band { label: "Growth", start: 50.0, end: 75.0, color: Rgba::hex(0x4ade80) },
    Band { label: "Expansion", start: 75.0, end: 100.0, color: Rgba::hex(0x22c55e) },
];

pub const LOAD_ERROR_CAPTION: &str = "Error: could not load M2 liquidity data.";

pub const TITLE: &str = "Current Liquidity Regime";

/// Needle position for the latest reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeReading {
    pub latest: f64,
    pub min: f64,
    pub max: f64,
    /// `0..=100`
    pub percentage: f64,
    /// Degrees from vertical, `-90..=90`; negative is left.
    pub angle_deg: f64,
    pub band: Band,
}

/// Band containing `pct`. Bands are `[start, end)` except the last, which also
/// holds its end. Out-of-range percentages fall into the nearest band.
pub fn band_for(pct: f64, bands: &[Band]) -> Option<Band> {
    let last = bands.len().checked_sub(1)?;
    bands
        .iter()
        .enumerate()
        .find(|(i, b)| pct >= b.start && (pct < b.end || (*i == last && pct <= b.end)))
        .map(|(_, b)| *b)
        .or_else(|| {
            let nearest = if pct < bands[0].start { bands.first() } else { bands.last() };
            nearest.copied()
        })
}

/// Map the last finite value of `values` onto the dial, relative to the min and max
/// of all finite values. `None` when there is nothing to show.
pub fn needle(values: &[f64], bands: &[Band]) -> Option<GaugeReading> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let latest = *finite.last()?;
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let span = max - min;
    let percentage = if span > 0.0 {
        ((latest - min) / span * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };
    let angle_deg = -90.0 + percentage * 180.0 / 100.0;
    let band = band_for(percentage, bands)?;
    Some(GaugeReading {
        latest,
        min,
        max,
        percentage,
        angle_deg,
        band,
    })
}

/// Gauge state built from the M2 source: the reading plus what the caption needs.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeSnapshot {
    pub reading: GaugeReading,
    pub date: NaiveDate,
    pub environment: String,
}

impl GaugeSnapshot {
    /// Rows in file order; the latest reading is the last row with a growth value.
    pub fn from_rows(rows: &[GaugeRow]) -> Option<Self> {
        let values: Vec<f64> = rows.iter().filter_map(|r| r.m2_growth).collect();
        let reading = needle(&values, &REGIMES)?;
        let latest_row = rows.iter().rev().find(|r| r.m2_growth.is_some())?;
        let environment = latest_row
            .liquidity_environment
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("Unknown")
            .to_string();
        Some(Self {
            reading,
            date: latest_row.date,
            environment,
        })
    }

    pub fn caption(&self) -> String {
        format!(
            "As of {}, M2 is growing at {:.1}% and we classify the liquidity environment as \"{}\".",
            self.date.format("%Y-%m-%d"),
            self.reading.latest,
            self.environment
        )
    }
}
