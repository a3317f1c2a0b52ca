//! Legend-driven series visibility.
//!
//! Two legend behaviours exist and are chosen per chart:
//! - [`LegendBehavior::MultiToggle`]: each click flips one series between shown
//!   and hidden. Used for line overlays.
//! - [`LegendBehavior::SingleFocus`]: a click focuses one series (the others are
//!   dimmed, never hidden); clicking the focused series again clears the focus.
//!   Used for stacked layers.
//!
//! Neither behaviour touches the data, and hiding every series is allowed.

use crate::models::SeriesId;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegendBehavior {
    MultiToggle,
    SingleFocus,
}

/// Opacity of a layer when drawn normally and when dimmed by another series' focus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerOpacity {
    pub normal: f32,
    pub dimmed: f32,
}

impl LayerOpacity {
    pub const fn new(normal: f32, dimmed: f32) -> Self {
        Self { normal, dimmed }
    }
}

impl Default for LayerOpacity {
    fn default() -> Self {
        Self::new(1.0, 0.15)
    }
}

/// Legend swatch opacity for a hidden series (multi-toggle legends).
pub const HIDDEN_SWATCH_OPACITY: f32 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityState {
    behavior: LegendBehavior,
    order: Vec<SeriesId>,
    shown: AHashMap<SeriesId, bool>,
    focused: Option<SeriesId>,
    fixed: AHashSet<SeriesId>,
}

impl VisibilityState {
    /// Every series starts shown and nothing is focused.
    pub fn new(behavior: LegendBehavior, ids: impl IntoIterator<Item = SeriesId>) -> Self {
        let order: Vec<SeriesId> = ids.into_iter().collect();
        let shown = order.iter().map(|id| (id.clone(), true)).collect();
        Self {
            behavior,
            order,
            shown,
            focused: None,
            fixed: AHashSet::new(),
        }
    }

    /// Mark a legend entry as informational only; clicking it changes nothing.
    pub fn with_fixed(mut self, id: impl Into<SeriesId>) -> Self {
        self.fixed.insert(id.into());
        self
    }

    pub fn behavior(&self) -> LegendBehavior {
        self.behavior
    }

    /// Series ids in legend order.
    pub fn ids(&self) -> &[SeriesId] {
        &self.order
    }

    pub fn is_interactive(&self, id: &SeriesId) -> bool {
        self.shown.contains_key(id) && !self.fixed.contains(id)
    }

    /// Legend click. Returns whether anything changed.
    pub fn toggle(&mut self, id: &SeriesId) -> bool {
        if !self.is_interactive(id) {
            return false;
        }
        match self.behavior {
            LegendBehavior::MultiToggle => {
                if let Some(flag) = self.shown.get_mut(id) {
                    *flag = !*flag;
                }
            }
            LegendBehavior::SingleFocus => {
                self.focused = if self.focused.as_ref() == Some(id) {
                    None
                } else {
                    Some(id.clone())
                };
            }
        }
        true
    }

    /// Unknown ids count as shown.
    pub fn is_shown(&self, id: &SeriesId) -> bool {
        self.shown.get(id).copied().unwrap_or(true)
    }

    pub fn focused(&self) -> Option<&SeriesId> {
        self.focused.as_ref()
    }

    /// True when some other series holds the focus.
    pub fn is_dimmed(&self, id: &SeriesId) -> bool {
        self.focused.as_ref().is_some_and(|f| f != id)
    }

    /// Opacity to draw `id` with.
    pub fn opacity(&self, id: &SeriesId, layer: LayerOpacity) -> f32 {
        if !self.is_shown(id) {
            0.0
        } else if self.is_dimmed(id) {
            layer.dimmed
        } else {
            layer.normal
        }
    }

    pub fn swatch_opacity(&self, id: &SeriesId) -> f32 {
        if self.is_shown(id) { 1.0 } else { HIDDEN_SWATCH_OPACITY }
    }

    pub fn any_shown(&self) -> bool {
        self.order.iter().any(|id| self.is_shown(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> Vec<SeriesId> {
        vec!["a".into(), "b".into(), "c".into()]
    }

    #[test]
    fn multi_toggle_twice_restores() {
        let mut v = VisibilityState::new(LegendBehavior::MultiToggle, ids());
        assert_eq!(v.behavior(), LegendBehavior::MultiToggle);
        let a = SeriesId::from("a");
        assert!(v.toggle(&a));
        assert!(!v.is_shown(&a));
        assert_eq!(v.opacity(&a, LayerOpacity::new(1.0, 0.2)), 0.0);
        assert_eq!(v.swatch_opacity(&a), HIDDEN_SWATCH_OPACITY);
        assert!(v.toggle(&a));
        assert!(v.is_shown(&a));
    }

    #[test]
    fn all_hidden_is_allowed() {
        let mut v = VisibilityState::new(LegendBehavior::MultiToggle, ids());
        for id in ids() {
            v.toggle(&id);
        }
        assert!(!v.any_shown());
    }

    #[test]
    fn focus_same_series_twice_clears_focus() {
        let mut v = VisibilityState::new(LegendBehavior::SingleFocus, ids());
        let a = SeriesId::from("a");
        let b = SeriesId::from("b");
        v.toggle(&a);
        assert_eq!(v.focused(), Some(&a));
        assert!(v.is_dimmed(&b));
        assert!(v.is_shown(&b), "focus dims, never hides");
        let layer = LayerOpacity::new(0.85, 0.2);
        assert_eq!(v.opacity(&a, layer), 0.85);
        assert_eq!(v.opacity(&b, layer), 0.2);
        v.toggle(&a);
        assert_eq!(v.focused(), None);
    }

    #[test]
    fn focusing_another_series_moves_focus() {
        let mut v = VisibilityState::new(LegendBehavior::SingleFocus, ids());
        v.toggle(&"a".into());
        v.toggle(&"c".into());
        assert_eq!(v.focused(), Some(&SeriesId::from("c")));
    }

    #[test]
    fn fixed_and_unknown_entries_ignore_clicks() {
        let mut v =
            VisibilityState::new(LegendBehavior::SingleFocus, ids()).with_fixed("c");
        assert!(!v.toggle(&"c".into()));
        assert!(!v.toggle(&"zzz".into()));
        assert_eq!(v.focused(), None);
    }
}
