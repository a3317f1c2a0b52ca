//! Tick generation and axis drawing.

use super::scene::{Anchor, Scene, Shape, Stroke};
use crate::interact::PlotRect;
use crate::models::{SECONDS_PER_DAY, Timestamp, date_to_ts, ts_to_date};
use crate::scale::LinearScale;
use crate::style;
use chrono::{Datelike, Days, Months, NaiveDate};

const TICK_LEN: f32 = 6.0;
pub const TICK_FONT: f32 = 11.0;

/// Step of "nice" ticks (1, 2 or 5 times a power of ten) giving about `count`
/// ticks over `[lo, hi]`.
pub fn tick_step(lo: f64, hi: f64, count: usize) -> f64 {
    let raw = (hi - lo).abs() / count.max(1) as f64;
    if !raw.is_finite() || raw <= 0.0 {
        return 0.0;
    }
    let power = 10f64.powf(raw.log10().floor());
    let err = raw / power;
    let factor = if err >= 50f64.sqrt() {
        10.0
    } else if err >= 10f64.sqrt() {
        5.0
    } else if err >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * power
}

/// Nice tick values inside `[lo, hi]`.
pub fn linear_ticks(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    if !lo.is_finite() || !hi.is_finite() {
        return Vec::new();
    }
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let step = tick_step(lo, hi, count);
    if step <= 0.0 {
        return vec![lo];
    }
    let start = (lo / step).ceil() as i64;
    let stop = (hi / step).floor() as i64;
    // dividing by the inverse keeps decimal steps exact (0.1 rather than 0.1000000002)
    let inv = if step < 1.0 { (1.0 / step).round() } else { 0.0 };
    (start..=stop)
        .map(|i| if inv > 0.0 { i as f64 / inv } else { i as f64 * step })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interval {
    Days(u64),
    Weeks,
    Months(u32),
    Years(i32),
}

impl Interval {
    fn approx_seconds(&self) -> f64 {
        match self {
            Interval::Days(n) => *n as f64 * SECONDS_PER_DAY,
            Interval::Weeks => 7.0 * SECONDS_PER_DAY,
            Interval::Months(n) => *n as f64 * 30.0 * SECONDS_PER_DAY,
            Interval::Years(n) => *n as f64 * 365.0 * SECONDS_PER_DAY,
        }
    }

    /// First tick date on or after `date`.
    fn align(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Interval::Days(n) => {
                let n = *n as i64;
                let rem = date.num_days_from_ce() as i64 % n;
                let skip = if rem == 0 { 0 } else { n - rem };
                date.checked_add_days(Days::new(skip as u64))
            }
            Interval::Weeks => {
                let to_sunday = (7 - date.weekday().num_days_from_sunday()) % 7;
                date.checked_add_days(Days::new(to_sunday as u64))
            }
            Interval::Months(n) => {
                let first = if date.day() == 1 {
                    date
                } else {
                    date.with_day(1)?.checked_add_months(Months::new(1))?
                };
                let rem = first.month0() % n;
                let skip = if rem == 0 { 0 } else { n - rem };
                first.checked_add_months(Months::new(skip))
            }
            Interval::Years(n) => {
                let jan1 = NaiveDate::from_ymd_opt(date.year(), 1, 1)?;
                let mut year = if jan1 == date { date.year() } else { date.year() + 1 };
                let rem = year.rem_euclid(*n);
                if rem != 0 {
                    year += n - rem;
                }
                NaiveDate::from_ymd_opt(year, 1, 1)
            }
        }
    }

    fn next(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Interval::Days(n) => date.checked_add_days(Days::new(*n)),
            Interval::Weeks => date.checked_add_days(Days::new(7)),
            Interval::Months(n) => date.checked_add_months(Months::new(*n)),
            Interval::Years(n) => NaiveDate::from_ymd_opt(date.year() + n, 1, 1),
        }
    }
}

const INTERVALS: [Interval; 11] = [
    Interval::Days(1),
    Interval::Days(2),
    Interval::Weeks,
    Interval::Months(1),
    Interval::Months(3),
    Interval::Months(6),
    Interval::Years(1),
    Interval::Years(2),
    Interval::Years(5),
    Interval::Years(10),
    Interval::Years(50),
];

/// Label for a calendar tick: the year on Jan 1, the month name on other month
/// starts, otherwise month and day.
pub fn time_tick_label(date: NaiveDate) -> String {
    if date.month() == 1 && date.day() == 1 {
        date.format("%Y").to_string()
    } else if date.day() == 1 {
        date.format("%B").to_string()
    } else {
        date.format("%b %d").to_string()
    }
}

/// Calendar-aligned ticks over `[start, end]`, about `count` of them.
pub fn time_ticks(start: Timestamp, end: Timestamp, count: usize) -> Vec<(Timestamp, String)> {
    if !start.is_finite() || !end.is_finite() || end < start {
        return Vec::new();
    }
    let span = end - start;
    let target = count.max(1) as f64;
    let interval = INTERVALS
        .iter()
        .copied()
        .find(|iv| span / iv.approx_seconds() <= target)
        .unwrap_or(Interval::Years(100));

    let mut out = Vec::new();
    let mut date = match interval.align(ts_to_date(start)) {
        Some(d) => d,
        None => return out,
    };
    if date_to_ts(date) < start {
        // ts_to_date floors; the aligned day may still be before a mid-day start
        date = match interval.next(date) {
            Some(d) => d,
            None => return out,
        };
    }
    while date_to_ts(date) <= end && out.len() < 64 {
        out.push((date_to_ts(date), time_tick_label(date)));
        date = match interval.next(date) {
            Some(d) => d,
            None => break,
        };
    }
    out
}

/// Bottom time axis along the plot.
pub fn draw_time_axis(scene: &mut Scene, plot: PlotRect, x: &LinearScale) {
    let y = plot.bottom();
    let axis = Stroke::solid(style::AXIS, 1.0);
    scene.push(Shape::Line {
        from: (plot.left, y),
        to: (plot.right(), y),
        stroke: axis,
        opacity: 1.0,
    });
    let (start, end) = x.domain();
    let count = ((plot.width / 90.0).floor() as usize).clamp(2, 10);
    for (t, label) in time_ticks(start, end, count) {
        let px = x.map(t);
        scene.push(Shape::Line {
            from: (px, y),
            to: (px, y + TICK_LEN),
            stroke: axis,
            opacity: 1.0,
        });
        scene.push(Shape::text(
            (px, y + TICK_LEN + 9.0),
            label,
            TICK_FONT,
            style::AXIS,
            Anchor::Middle,
        ));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Vertical value axis with a title above it.
pub fn draw_value_axis(
    scene: &mut Scene,
    plot: PlotRect,
    y: &LinearScale,
    side: Side,
    ticks: usize,
    format: impl Fn(f64) -> String,
    title: &str,
) {
    let x = match side {
        Side::Left => plot.left,
        Side::Right => plot.right(),
    };
    let (dir, anchor) = match side {
        Side::Left => (-1.0, Anchor::End),
        Side::Right => (1.0, Anchor::Start),
    };
    let axis = Stroke::solid(style::AXIS, 1.0);
    scene.push(Shape::Line {
        from: (x, plot.top),
        to: (x, plot.bottom()),
        stroke: axis,
        opacity: 1.0,
    });
    let (lo, hi) = y.domain();
    for v in linear_ticks(lo, hi, ticks) {
        let py = y.map(v);
        scene.push(Shape::Line {
            from: (x, py),
            to: (x + dir * TICK_LEN, py),
            stroke: axis,
            opacity: 1.0,
        });
        scene.push(Shape::text(
            (x + dir * (TICK_LEN + 3.0), py),
            format(v),
            TICK_FONT,
            style::AXIS,
            anchor,
        ));
    }
    if !title.is_empty() {
        let (tx, title_anchor) = match side {
            Side::Left => (x - 40.0, Anchor::Start),
            Side::Right => (x + 40.0, Anchor::End),
        };
        scene.push(Shape::text(
            (tx, plot.top - 12.0),
            title,
            TICK_FONT,
            style::TEXT,
            title_anchor,
        ));
    }
}

/// Percent label for a share tick (`0.25` -> `25%`).
pub fn share_tick(v: f64) -> String {
    format!("{:.0}%", v * 100.0)
}
