use crate::style::Rgba;
use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds since the Unix epoch. All x positions in the dashboard are timestamps.
pub type Timestamp = f64;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Midnight UTC of `date` as a timestamp.
pub fn date_to_ts(date: NaiveDate) -> Timestamp {
    date.and_time(NaiveTime::MIN).and_utc().timestamp() as f64
}

/// Calendar date (UTC) containing `ts`.
pub fn ts_to_date(ts: Timestamp) -> NaiveDate {
    if !ts.is_finite() {
        return NaiveDate::default();
    }
    DateTime::from_timestamp(ts.floor() as i64, 0)
        .map(|dt| dt.date_naive())
        .unwrap_or_default()
}

/// Parse `YYYY-MM-DD`, also accepting datetime strings that start with a date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let head = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Serde helper: dates like `2024-03-31` or `2024-03-31T00:00:00Z`.
fn de_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct DateVisitor;

    impl Visitor<'_> for DateVisitor {
        type Value = NaiveDate;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a date formatted as YYYY-MM-DD")
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            parse_date(s).ok_or_else(|| E::custom(format!("invalid date: {s:?}")))
        }
    }

    deserializer.deserialize_str(DateVisitor)
}

/// Serde helper: loosely-typed numeric cells. Empty or unparseable cells become NaN
/// so callers can filter them the same way as missing values.
fn de_lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(f64::NAN))
}

/// Serde helper: like [`de_lenient_f64`] but non-finite values are `None`.
fn de_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    de_lenient_f64(deserializer).map(|v| v.is_finite().then_some(v))
}

fn nan() -> f64 {
    f64::NAN
}

/// `viz1_macro_vs_rwa.csv`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MacroRow {
    #[serde(deserialize_with = "de_date")]
    pub date: NaiveDate,
    #[serde(deserialize_with = "de_lenient_f64")]
    pub rwa_tvl: f64,
    #[serde(deserialize_with = "de_lenient_f64")]
    pub total_stablecoin_mcap: f64,
    #[serde(deserialize_with = "de_lenient_f64")]
    pub treasury_yield: f64,
    #[serde(deserialize_with = "de_lenient_f64")]
    pub m2_supply: f64,
}

/// `viz2_asset_type_shares.csv`: one row per (date, asset type).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssetShareRow {
    #[serde(deserialize_with = "de_date")]
    pub date: NaiveDate,
    pub asset_type: String,
    #[serde(deserialize_with = "de_lenient_f64")]
    pub tvl: f64,
    /// Fraction of total RWA TVL on that date.
    #[serde(deserialize_with = "de_lenient_f64")]
    pub share: f64,
}

/// `viz3_chain_allocation.csv`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChainAllocationRow {
    #[serde(deserialize_with = "de_date")]
    pub date: NaiveDate,
    pub chain: String,
    #[serde(deserialize_with = "de_lenient_f64")]
    pub tvl: f64,
    #[serde(default = "nan", deserialize_with = "de_lenient_f64")]
    pub share_within_chains: f64,
}

/// `viz4_protocol_timeseries.csv`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProtocolTvlRow {
    #[serde(deserialize_with = "de_date")]
    pub date: NaiveDate,
    pub protocol: String,
    #[serde(deserialize_with = "de_lenient_f64")]
    pub tvl: f64,
}

/// `viz4_protocol_latest.csv`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProtocolLatestRow {
    pub protocol: String,
    #[serde(deserialize_with = "de_lenient_f64")]
    pub tvl: f64,
    #[serde(default = "nan", deserialize_with = "de_lenient_f64")]
    pub share_of_rwa: f64,
}

/// `viz5_yield_timeseries.csv`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct YieldRow {
    #[serde(deserialize_with = "de_date")]
    pub date: NaiveDate,
    #[serde(deserialize_with = "de_opt_f64")]
    pub yield_10y: Option<f64>,
}

/// `m2_liquidity_gauge.csv`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GaugeRow {
    #[serde(deserialize_with = "de_date")]
    pub date: NaiveDate,
    #[serde(deserialize_with = "de_opt_f64")]
    pub m2_growth: Option<f64>,
    #[serde(default)]
    pub liquidity_environment: Option<String>,
}

/// Identifier of one drawable series (a line, a stacked layer, a bar).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeriesId(pub String);

impl SeriesId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SeriesId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SeriesId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ordered `(timestamp, value)` sequence with a display color.
///
/// Points are kept sorted by timestamp; when several points share a timestamp only
/// the last one seen survives.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub id: SeriesId,
    pub label: String,
    pub color: Rgba,
    times: Vec<Timestamp>,
    values: Vec<f64>,
}

impl Series {
    pub fn new(
        id: impl Into<SeriesId>,
        label: impl Into<String>,
        color: Rgba,
        points: impl IntoIterator<Item = (Timestamp, f64)>,
    ) -> Self {
        let mut pts: Vec<(Timestamp, f64)> = points.into_iter().filter(|(t, _)| t.is_finite()).collect();
        // stable: equal timestamps keep input order, so "last" below is the last seen
        pts.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut times: Vec<Timestamp> = Vec::with_capacity(pts.len());
        let mut values: Vec<f64> = Vec::with_capacity(pts.len());
        for (t, v) in pts {
            match times.last() {
                Some(&last) if last == t => {
                    if let Some(slot) = values.last_mut() {
                        *slot = v;
                    }
                }
                _ => {
                    times.push(t);
                    values.push(v);
                }
            }
        }
        Self {
            id: id.into(),
            label: label.into(),
            color,
            times,
            values,
        }
    }

    pub fn times(&self) -> &[Timestamp] {
        &self.times
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn point(&self, idx: usize) -> Option<(Timestamp, f64)> {
        Some((*self.times.get(idx)?, *self.values.get(idx)?))
    }

    pub fn points(&self) -> impl Iterator<Item = (Timestamp, f64)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }

    /// First and last timestamp.
    pub fn extent(&self) -> Option<(Timestamp, Timestamp)> {
        Some((*self.times.first()?, *self.times.last()?))
    }

    /// Largest finite value.
    pub fn max_value(&self) -> Option<f64> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn date_timestamp_roundtrip() {
        let date = d(2024, 2, 29);
        assert_eq!(ts_to_date(date_to_ts(date)), date);
        assert_eq!(date_to_ts(d(1970, 1, 2)), SECONDS_PER_DAY);
    }

    #[test]
    fn parse_date_accepts_datetime_prefix() {
        assert_eq!(parse_date("2023-06-01"), Some(d(2023, 6, 1)));
        assert_eq!(parse_date("2023-06-01T00:00:00Z"), Some(d(2023, 6, 1)));
        assert_eq!(parse_date("06/01/2023"), None);
    }

    #[test]
    fn series_sorts_and_collapses_duplicates_last_wins() {
        let s = Series::new(
            "a",
            "A",
            Rgba::hex(0),
            vec![(3.0, 30.0), (1.0, 10.0), (3.0, 31.0), (2.0, 20.0), (1.0, 11.0)],
        );
        assert_eq!(s.times(), &[1.0, 2.0, 3.0]);
        assert_eq!(s.values(), &[11.0, 20.0, 31.0]);
        assert_eq!(s.extent(), Some((1.0, 3.0)));
        assert_eq!(s.max_value(), Some(31.0));
    }

    #[test]
    fn rows_parse_with_loose_numbers() {
        let csv = "date,m2_growth,liquidity_environment\n2024-01-31,4.2,Expansion\n2024-02-29,,\n";
        let mut rdr = csv::Reader::from_reader(csv.as_bytes());
        let rows: Vec<GaugeRow> = rdr.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].m2_growth, Some(4.2));
        assert_eq!(rows[0].liquidity_environment.as_deref(), Some("Expansion"));
        assert_eq!(rows[1].m2_growth, None);
        assert_eq!(rows[1].liquidity_environment, None);
    }
}
