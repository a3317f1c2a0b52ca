//! Tooltip content and number formatting.
//!
//! Dollar amounts use SI prefixes with a fixed number of significant digits,
//! matching what the dashboard has always shown (`$1.23M`, `$12.3B`). Billions are
//! written `B`, not `G`.

use crate::models::{Timestamp, ts_to_date};

/// Tooltip box offset from the pointer, in pixels.
pub const TOOLTIP_OFFSET: (f32, f32) = (10.0, 10.0);

/// A tooltip: bold header line plus body lines, anchored at a surface position.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub header: String,
    pub lines: Vec<String>,
    /// Top-left corner of the box.
    pub anchor: (f32, f32),
}

impl Tooltip {
    /// Tooltip placed at the pointer plus [`TOOLTIP_OFFSET`].
    pub fn at_pointer(pointer: (f32, f32), header: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            header: header.into(),
            lines,
            anchor: (pointer.0 + TOOLTIP_OFFSET.0, pointer.1 + TOOLTIP_OFFSET.1),
        }
    }

    /// Header and lines joined with newlines.
    pub fn text(&self) -> String {
        std::iter::once(self.header.as_str())
            .chain(self.lines.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn format_date(ts: Timestamp) -> String {
    ts_to_date(ts).format("%Y-%m-%d").to_string()
}

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "\u{b5}", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

/// `value` with `sig` significant digits and an SI prefix, e.g. `1.23M`.
///
/// The prefix is chosen after rounding, so `999_999` with three digits is `1.00M`.
/// Trailing zeros are kept (`0` is `0.00` at three digits).
pub fn format_si(value: f64, sig: usize) -> String {
    if !value.is_finite() {
        return "NaN".to_string();
    }
    let sig = sig.max(1);
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();

    let sci = format!("{:.*e}", sig - 1, abs);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    let prefix_exp = (exp.div_euclid(3)).clamp(-8, 8);
    let prefix = SI_PREFIXES[(prefix_exp + 8) as usize];
    // digits before the decimal point
    let int_len = exp - prefix_exp * 3 + 1;
    let n = digits.len() as i32;

    let body = if int_len == n {
        digits
    } else if int_len > n {
        format!("{digits}{}", "0".repeat((int_len - n) as usize))
    } else if int_len > 0 {
        let (a, b) = digits.split_at(int_len as usize);
        format!("{a}.{b}")
    } else {
        // below the smallest prefix
        let scaled = abs / 10f64.powi(prefix_exp * 3);
        format!("{:.*}", sig.saturating_sub(1), scaled)
    };
    format!("{sign}{body}{prefix}")
}

/// `$` plus [`format_si`] with `G` written as `B`.
pub fn format_dollars(value: f64, sig: usize) -> String {
    format!("${}", format_si(value, sig).replace('G', "B"))
}

/// Dollar amount as shown in tooltips (three significant digits).
pub fn tooltip_dollars(value: f64) -> String {
    format_dollars(value, 3)
}

/// Dollar amount as shown on axis ticks (two significant digits).
pub fn axis_dollars(value: f64) -> String {
    format_dollars(value, 2)
}

/// A fraction in `0..=1` as a percentage with one decimal (`0.456` -> `45.6%`).
pub fn format_share(fraction: f64) -> String {
    format_percent(fraction * 100.0, 1)
}

/// A value already in percent, e.g. a yield.
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}%")
}
