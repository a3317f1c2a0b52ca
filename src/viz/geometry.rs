//! Clipping sampled geometry to the visible time window.
//!
//! Samples are `(t, (lower, upper))`; a plain line uses the same value twice. The
//! visible part is every sample inside `[lo, hi]` plus an interpolated sample on
//! each window edge, so lines and areas run exactly to the plot border.

use crate::models::Timestamp;

pub type Sample = (Timestamp, (f64, f64));

fn lerp(a: Sample, b: Sample, t: Timestamp) -> Sample {
    let span = b.0 - a.0;
    if span <= 0.0 {
        return (t, a.1);
    }
    let f = (t - a.0) / span;
    (
        t,
        (
            a.1.0 + (b.1.0 - a.1.0) * f,
            a.1.1 + (b.1.1 - a.1.1) * f,
        ),
    )
}

/// Samples of `samples` (sorted by time) visible in `[lo, hi]`.
pub fn clip_samples(samples: &[Sample], lo: Timestamp, hi: Timestamp) -> Vec<Sample> {
    if samples.is_empty() || hi < lo {
        return Vec::new();
    }
    let first = samples.partition_point(|s| s.0 < lo);
    let end = samples.partition_point(|s| s.0 <= hi);
    let mut out = Vec::with_capacity(end.saturating_sub(first) + 2);

    if first > 0 && first < samples.len() {
        out.push(lerp(samples[first - 1], samples[first], lo));
    }
    if first < end {
        out.extend_from_slice(&samples[first..end]);
    }
    if end > 0 && end < samples.len() && samples[end - 1].0 < hi {
        out.push(lerp(samples[end - 1], samples[end], hi));
    }
    out
}

/// Line samples from parallel time/value slices, skipping non-finite values.
pub fn line_samples(times: &[Timestamp], values: &[f64]) -> Vec<Sample> {
    times
        .iter()
        .zip(values)
        .filter(|(_, v)| v.is_finite())
        .map(|(&t, &v)| (t, (v, v)))
        .collect()
}

/// Band samples from parallel time/band slices.
pub fn band_samples(times: &[Timestamp], bands: &[(f64, f64)]) -> Vec<Sample> {
    times.iter().copied().zip(bands.iter().copied()).collect()
}
