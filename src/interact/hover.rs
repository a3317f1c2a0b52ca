//! Nearest-point lookup for the hover crosshair.

use crate::models::Timestamp;

/// Index of the timestamp in `times` closest to `t`.
///
/// `times` must be sorted ascending. Queries before the first or after the last
/// timestamp clamp to the ends; an exact tie between two neighbours picks the
/// later one. Returns `None` for an empty slice or a non-finite query.
pub fn nearest_index(times: &[Timestamp], t: Timestamp) -> Option<usize> {
    if times.is_empty() || t.is_nan() {
        return None;
    }
    let right = times.partition_point(|&x| x < t);
    if right == 0 {
        return Some(0);
    }
    if right == times.len() {
        return Some(times.len() - 1);
    }
    let left = right - 1;
    if t - times[left] < times[right] - t {
        Some(left)
    } else {
        Some(right)
    }
}

/// Result of a hover lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverHit {
    /// Timestamp under the pointer, after inverse mapping.
    pub time: Timestamp,
    /// Pointer position in plot-surface pixels.
    pub pointer: (f32, f32),
    /// Nearest index per track, in the order the tracks were passed.
    pub indices: Vec<Option<usize>>,
}

impl HoverHit {
    pub fn index(&self, track: usize) -> Option<usize> {
        self.indices.get(track).copied().flatten()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum HoverState {
    #[default]
    Idle,
    Active(HoverHit),
}

impl HoverState {
    pub fn lookup(time: Timestamp, pointer: (f32, f32), tracks: &[&[Timestamp]]) -> Self {
        let indices = tracks.iter().map(|times| nearest_index(times, time)).collect();
        HoverState::Active(HoverHit {
            time,
            pointer,
            indices,
        })
    }

    pub fn hit(&self) -> Option<&HoverHit> {
        match self {
            HoverState::Active(hit) => Some(hit),
            HoverState::Idle => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, HoverState::Active(_))
    }

    /// Returns whether there was anything to clear.
    pub fn clear(&mut self) -> bool {
        let was_active = self.is_active();
        *self = HoverState::Idle;
        was_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SECONDS_PER_DAY as DAY;

    #[test]
    fn picks_closest_and_clamps_at_ends() {
        let times = [0.0, DAY, 2.0 * DAY];
        let values = [10.0, 20.0, 30.0];
        let at = |t: f64| nearest_index(&times, t).map(|i| values[i]);
        assert_eq!(at(DAY * 0.9), Some(20.0));
        assert_eq!(at(DAY * 1.2), Some(20.0));
        assert_eq!(at(-5.0 * DAY), Some(10.0));
        assert_eq!(at(9.0 * DAY), Some(30.0));
        assert_eq!(at(2.0 * DAY), Some(30.0));
    }

    #[test]
    fn exact_tie_prefers_later_point() {
        let times = [0.0, 10.0, 20.0];
        assert_eq!(nearest_index(&times, 5.0), Some(1));
        assert_eq!(nearest_index(&times, 15.0), Some(2));
    }

    #[test]
    fn empty_track_has_no_hit() {
        assert_eq!(nearest_index(&[], 1.0), None);
        assert_eq!(nearest_index(&[1.0], f64::NAN), None);
        assert_eq!(nearest_index(&[1.0], 99.0), Some(0));
    }

    #[test]
    fn lookup_covers_every_track_and_clear_resets() {
        let a = [0.0, 1.0, 2.0];
        let b: [f64; 0] = [];
        let mut hover = HoverState::lookup(1.4, (5.0, 6.0), &[&a, &b]);
        let hit = hover.hit().unwrap();
        assert_eq!(hit.index(0), Some(1));
        assert_eq!(hit.index(1), None);
        assert_eq!(hit.index(7), None);
        assert!(hover.clear());
        assert!(!hover.clear());
        assert_eq!(hover, HoverState::Idle);
    }
}
