//! Reshaping loaded rows into what the charts draw.
//!
//! Long-format sources (one row per date and key) become [`WideTable`]s: one row
//! per date, one column per key, missing keys filled with 0. When a source has
//! several rows for the same (date, key) the last one wins.

use crate::models::{
    AssetShareRow, ChainAllocationRow, MacroRow, ProtocolLatestRow, ProtocolTvlRow, Series,
    Timestamp, YieldRow, date_to_ts,
};
use crate::style::tableau_color;
use ahash::{AHashMap, AHashSet};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Stack and legend order of the RWA asset types.
pub const ASSET_TYPE_ORDER: [&str; 3] = ["Diversified", "Private Credit", "Treasury"];

/// Number of chains kept for the chain allocation chart.
pub const TOP_CHAINS: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub date: NaiveDate,
    /// One value per [`WideTable::keys`] entry.
    pub values: Vec<f64>,
    pub total_tvl: f64,
    /// Joined 10Y yield, if any.
    pub yield_10y: Option<f64>,
}

impl WideRow {
    fn empty(date: NaiveDate, width: usize) -> Self {
        Self {
            date,
            values: vec![0.0; width],
            total_tvl: 0.0,
            yield_10y: None,
        }
    }
}

/// Rows sorted by date, columns named by `keys`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideTable {
    keys: Vec<String>,
    rows: Vec<WideRow>,
    times: Vec<Timestamp>,
}

impl WideTable {
    fn from_dates(keys: Vec<String>, by_date: BTreeMap<NaiveDate, WideRow>) -> Self {
        let rows: Vec<WideRow> = by_date.into_values().collect();
        let times = rows.iter().map(|r| date_to_ts(r.date)).collect();
        Self { keys, rows, times }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn rows(&self) -> &[WideRow] {
        &self.rows
    }

    pub fn row(&self, idx: usize) -> Option<&WideRow> {
        self.rows.get(idx)
    }

    /// Row timestamps, ascending. This is the hover track for the table.
    pub fn times(&self) -> &[Timestamp] {
        &self.times
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Stacked layers in key order: for each key, `(lower, upper)` per row.
    pub fn stack(&self) -> Vec<Vec<(f64, f64)>> {
        let mut layers: Vec<Vec<(f64, f64)>> = vec![Vec::with_capacity(self.rows.len()); self.keys.len()];
        for row in &self.rows {
            let mut base = 0.0;
            for (layer, v) in layers.iter_mut().zip(&row.values) {
                let top = base + v;
                layer.push((base, top));
                base = top;
            }
        }
        layers
    }

    pub fn max_total(&self) -> f64 {
        self.rows
            .iter()
            .map(|r| r.total_tvl)
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }

    pub fn max_yield(&self) -> f64 {
        self.rows
            .iter()
            .filter_map(|r| r.yield_10y)
            .fold(0.0, f64::max)
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// Keys in order of first appearance.
fn first_seen<'a>(keys: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = AHashSet::new();
    keys.into_iter()
        .filter(|k| seen.insert(*k))
        .map(str::to_string)
        .collect()
}

fn key_index(keys: &[String]) -> AHashMap<&str, usize> {
    keys.iter().enumerate().map(|(i, k)| (k.as_str(), i)).collect()
}

/// Macro rows in date order, one per date; the last row of a date wins.
pub fn macro_rows(rows: Vec<MacroRow>) -> Vec<MacroRow> {
    let mut by_date: BTreeMap<NaiveDate, MacroRow> = BTreeMap::new();
    for r in rows {
        by_date.insert(r.date, r);
    }
    by_date.into_values().collect()
}

/// Asset-type shares, one row per date.
///
/// Columns are the known asset types present in the data, in [`ASSET_TYPE_ORDER`].
/// Values are shares of total RWA TVL; `total_tvl` sums every row of the date,
/// including asset types that have no column.
pub fn asset_share_table(rows: &[AssetShareRow]) -> WideTable {
    let present: AHashSet<&str> = rows.iter().map(|r| r.asset_type.as_str()).collect();
    let keys: Vec<String> = ASSET_TYPE_ORDER
        .iter()
        .filter(|t| present.contains(*t))
        .map(|t| t.to_string())
        .collect();
    let index = key_index(&keys);

    let mut by_date: BTreeMap<NaiveDate, WideRow> = BTreeMap::new();
    for r in rows {
        let row = by_date
            .entry(r.date)
            .or_insert_with(|| WideRow::empty(r.date, keys.len()));
        row.total_tvl += finite_or_zero(r.tvl);
        if let Some(&i) = index.get(r.asset_type.as_str()) {
            row.values[i] = finite_or_zero(r.share);
        }
    }
    WideTable::from_dates(keys, by_date)
}

/// The `TOP_CHAINS` chains with the largest peak TVL, largest first. Chains with
/// equal peaks keep their order of first appearance.
pub fn top_chains(rows: &[ChainAllocationRow]) -> Vec<String> {
    let mut peak: AHashMap<&str, f64> = AHashMap::new();
    for r in rows {
        let tvl = finite_or_zero(r.tvl);
        peak.entry(r.chain.as_str())
            .and_modify(|m| *m = m.max(tvl))
            .or_insert(tvl);
    }
    let mut chains = first_seen(rows.iter().map(|r| r.chain.as_str()));
    chains.sort_by(|a, b| {
        let pa = peak.get(a.as_str()).copied().unwrap_or(0.0);
        let pb = peak.get(b.as_str()).copied().unwrap_or(0.0);
        pb.total_cmp(&pa)
    });
    chains.truncate(TOP_CHAINS);
    chains
}

/// Chain TVL per date for the top chains; `total_tvl` sums the kept chains only.
pub fn chain_allocation_table(rows: &[ChainAllocationRow]) -> WideTable {
    let keys = top_chains(rows);
    let index = key_index(&keys);

    let mut by_date: BTreeMap<NaiveDate, WideRow> = BTreeMap::new();
    for r in rows {
        let Some(&i) = index.get(r.chain.as_str()) else {
            continue;
        };
        let row = by_date
            .entry(r.date)
            .or_insert_with(|| WideRow::empty(r.date, keys.len()));
        row.values[i] = finite_or_zero(r.tvl);
    }
    for row in by_date.values_mut() {
        row.total_tvl = row.values.iter().sum();
    }
    WideTable::from_dates(keys, by_date)
}

/// Protocol TVL history: one line per protocol and the per-date wide table used by
/// the shared tooltip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProtocolHistory {
    pub lines: Vec<Series>,
    pub table: WideTable,
    /// Largest single protocol TVL.
    pub max_tvl: f64,
}

/// Protocols are ordered by first appearance and colored by that position.
pub fn protocol_history(rows: &[ProtocolTvlRow]) -> ProtocolHistory {
    let keys = first_seen(rows.iter().map(|r| r.protocol.as_str()));
    let index = key_index(&keys);

    let mut points: Vec<Vec<(Timestamp, f64)>> = vec![Vec::new(); keys.len()];
    let mut by_date: BTreeMap<NaiveDate, WideRow> = BTreeMap::new();
    let mut max_tvl: f64 = 0.0;
    for r in rows {
        let Some(&i) = index.get(r.protocol.as_str()) else {
            continue;
        };
        let tvl = finite_or_zero(r.tvl);
        max_tvl = max_tvl.max(tvl);
        points[i].push((date_to_ts(r.date), tvl));
        let row = by_date
            .entry(r.date)
            .or_insert_with(|| WideRow::empty(r.date, keys.len()));
        row.values[i] = tvl;
    }
    for row in by_date.values_mut() {
        row.total_tvl = row.values.iter().sum();
    }

    let lines = keys
        .iter()
        .zip(points)
        .enumerate()
        .map(|(i, (key, pts))| Series::new(key.as_str(), key.as_str(), tableau_color(i), pts))
        .collect();
    ProtocolHistory {
        lines,
        table: WideTable::from_dates(keys, by_date),
        max_tvl,
    }
}

/// Latest protocol snapshot sorted by TVL, largest first. Rows without a usable
/// TVL are dropped.
pub fn sort_latest(mut rows: Vec<ProtocolLatestRow>) -> Vec<ProtocolLatestRow> {
    let before = rows.len();
    rows.retain(|r| r.tvl.is_finite());
    if rows.len() != before {
        log::warn!("dropped {} protocol snapshot rows without TVL", before - rows.len());
    }
    rows.sort_by(|a, b| b.tvl.total_cmp(&a.tvl));
    rows
}

/// Attach the 10Y yield to each row of `table` with the same date. Dates without a
/// yield keep `None`.
pub fn join_yield(table: &mut WideTable, yields: &[YieldRow]) {
    let by_date: AHashMap<NaiveDate, Option<f64>> =
        yields.iter().map(|y| (y.date, y.yield_10y)).collect();
    for row in &mut table.rows {
        row.yield_10y = by_date.get(&row.date).copied().flatten();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn chain(day: u32, name: &str, tvl: f64) -> ChainAllocationRow {
        ChainAllocationRow {
            date: d(day),
            chain: name.into(),
            tvl,
            share_within_chains: f64::NAN,
        }
    }

    #[test]
    fn macro_rows_sorted_with_last_duplicate_kept() {
        let row = |day, rwa| MacroRow {
            date: d(day),
            rwa_tvl: rwa,
            total_stablecoin_mcap: 1.0,
            treasury_yield: 4.0,
            m2_supply: 1.0,
        };
        let rows = macro_rows(vec![row(3, 3.0), row(2, 2.0), row(1, 1.0), row(2, 5.0)]);
        let got: Vec<(NaiveDate, f64)> = rows.iter().map(|r| (r.date, r.rwa_tvl)).collect();
        assert_eq!(got, vec![(d(1), 1.0), (d(2), 5.0), (d(3), 3.0)]);
    }

    #[test]
    fn asset_shares_use_fixed_order_and_fill_missing() {
        let rows = vec![
            share(2, "Treasury", 30.0, 0.6),
            share(1, "Treasury", 10.0, 0.5),
            share(1, "Diversified", 10.0, 0.5),
            share(2, "Other", 20.0, 0.4),
        ];
        let t = asset_share_table(&rows);
        assert_eq!(t.keys(), &["Diversified".to_string(), "Treasury".to_string()]);
        assert_eq!(t.rows().len(), 2);
        assert_eq!(t.rows()[0].date, d(1));
        assert_eq!(t.rows()[0].values, vec![0.5, 0.5]);
        assert_eq!(t.rows()[1].values, vec![0.0, 0.6]);
        // totals include types without a column
        assert_eq!(t.rows()[1].total_tvl, 50.0);
        assert!(t.times()[0] < t.times()[1]);
    }

    #[test]
    fn duplicate_date_and_key_last_row_wins() {
        let rows = vec![share(1, "Treasury", 1.0, 0.2), share(1, "Treasury", 1.0, 0.9)];
        let t = asset_share_table(&rows);
        assert_eq!(t.rows()[0].values, vec![0.9]);
    }

    #[test]
    fn stack_accumulates_in_key_order() {
        let rows = vec![share(1, "Diversified", 1.0, 0.25), share(1, "Treasury", 3.0, 0.75)];
        let layers = asset_share_table(&rows).stack();
        assert_eq!(layers[0], vec![(0.0, 0.25)]);
        assert_eq!(layers[1], vec![(0.25, 1.0)]);
    }

    #[test]
    fn keeps_top_six_chains_by_peak() {
        let mut rows = Vec::new();
        for (i, name) in ["a", "b", "c", "d", "e", "f", "g", "h"].iter().enumerate() {
            rows.push(chain(1, name, i as f64));
        }
        rows.push(chain(2, "a", 100.0));
        let keys = top_chains(&rows);
        assert_eq!(keys, vec!["a", "h", "g", "f", "e", "d"]);

        let t = chain_allocation_table(&rows);
        assert_eq!(t.rows()[0].total_tvl, 0.0 + 7.0 + 6.0 + 5.0 + 4.0 + 3.0);
        assert_eq!(t.rows()[1].values, vec![100.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(t.max_total(), 100.0);
    }

    #[test]
    fn protocol_history_orders_by_first_appearance() {
        let rows = vec![
            ProtocolTvlRow { date: d(2), protocol: "Ondo".into(), tvl: 5.0 },
            ProtocolTvlRow { date: d(1), protocol: "Maple".into(), tvl: 7.0 },
            ProtocolTvlRow { date: d(1), protocol: "Ondo".into(), tvl: 3.0 },
        ];
        let h = protocol_history(&rows);
        assert_eq!(h.table.keys(), &["Ondo".to_string(), "Maple".to_string()]);
        assert_eq!(h.lines[0].values(), &[3.0, 5.0]);
        assert_eq!(h.lines[1].len(), 1);
        assert_eq!(h.table.rows()[0].total_tvl, 10.0);
        assert_eq!(h.max_tvl, 7.0);
    }

    #[test]
    fn latest_snapshot_sorted_descending() {
        let rows = vec![
            ProtocolLatestRow { protocol: "a".into(), tvl: 1.0, share_of_rwa: 0.1 },
            ProtocolLatestRow { protocol: "b".into(), tvl: 9.0, share_of_rwa: 0.9 },
            ProtocolLatestRow { protocol: "c".into(), tvl: f64::NAN, share_of_rwa: 0.0 },
        ];
        let sorted = sort_latest(rows);
        let names: Vec<&str> = sorted.iter().map(|r| r.protocol.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn yield_join_leaves_gaps_as_none() {
        let mut t = asset_share_table(&[share(1, "Treasury", 1.0, 1.0), share(2, "Treasury", 1.0, 1.0)]);
        join_yield(
            &mut t,
            &[YieldRow { date: d(1), yield_10y: Some(4.2) }, YieldRow { date: d(9), yield_10y: Some(1.0) }],
        );
        assert_eq!(t.rows()[0].yield_10y, Some(4.2));
        assert_eq!(t.rows()[1].yield_10y, None);
        assert_eq!(t.max_yield(), 4.2);
    }
}
