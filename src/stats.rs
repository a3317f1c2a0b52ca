use crate::models::Series;
use serde::{Deserialize, Serialize};

/// Summary statistics for one series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub series: String,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Value at the latest timestamp.
    pub last: Option<f64>,
}

/// Summarize `values`; non-finite values count as missing.
pub fn summarize(name: &str, values: &[f64]) -> Summary {
    let mut vals: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let missing = values.len() - vals.len();
    let last = values.iter().rev().copied().find(|v| v.is_finite());
    vals.sort_by(|a, b| a.total_cmp(b));

    let count = vals.len();
    let min = vals.first().copied();
    let max = vals.last().copied();
    let mean = if count > 0 {
        Some(vals.iter().sum::<f64>() / count as f64)
    } else {
        None
    };
    let median = if count == 0 {
        None
    } else if count % 2 == 1 {
        Some(vals[count / 2])
    } else {
        Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
    };
    Summary {
        series: name.to_string(),
        count,
        missing,
        min,
        max,
        mean,
        median,
        last,
    }
}

/// One summary per series, in input order.
pub fn series_summary(series: &[Series]) -> Vec<Summary> {
    series.iter().map(|s| summarize(&s.label, s.values())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Rgba;

    #[test]
    fn odd_and_even_medians() {
        let s = summarize("x", &[3.0, 1.0, 2.0]);
        assert_eq!(s.median, Some(2.0));
        assert_eq!(s.mean, Some(2.0));
        let s = summarize("x", &[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(s.median, Some(2.5));
        assert_eq!((s.min, s.max), (Some(1.0), Some(4.0)));
    }

    #[test]
    fn missing_values_are_counted_not_summarized() {
        let s = summarize("x", &[1.0, f64::NAN, 5.0, f64::NAN]);
        assert_eq!(s.count, 2);
        assert_eq!(s.missing, 2);
        assert_eq!(s.last, Some(5.0));
        let empty = summarize("e", &[]);
        assert_eq!(empty.mean, None);
        assert_eq!(empty.median, None);
    }

    #[test]
    fn summary_per_series_uses_label() {
        let a = Series::new("a", "Alpha", Rgba::hex(0), vec![(1.0, 1.0), (2.0, 3.0)]);
        let out = series_summary(&[a]);
        assert_eq!(out[0].series, "Alpha");
        assert_eq!(out[0].last, Some(3.0));
    }
}
