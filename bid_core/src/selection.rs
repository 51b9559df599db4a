//! # Selection State Machine
//!
//! The toggle-selection used by the estimation screen's clickable tables:
//! one crew-size row and one margin row may be highlighted at a time.
//! Toggling the highlighted value deselects it; toggling a different value
//! moves the highlight.

use serde::{Deserialize, Serialize};

/// A single-slot selection: either nothing is selected, or exactly one
/// value is.
///
/// Used as `Selection<u32>` for crew sizes and `Selection<String>` for
/// margin labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection<T> {
    Unselected,
    Selected(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::Unselected
    }
}

impl<T: PartialEq> Selection<T> {
    /// Toggle a value: selecting the current value deselects it, any
    /// other value replaces the selection.
    pub fn toggle(&mut self, value: T) {
        if self.is_selected(&value) {
            *self = Selection::Unselected;
        } else {
            *self = Selection::Selected(value);
        }
    }

    /// Reset to `Unselected`.
    pub fn clear(&mut self) {
        *self = Selection::Unselected;
    }

    /// The selected value, if any.
    pub fn selected(&self) -> Option<&T> {
        match self {
            Selection::Unselected => None,
            Selection::Selected(value) => Some(value),
        }
    }

    /// Whether `value` is the current selection.
    pub fn is_selected(&self, value: &T) -> bool {
        matches!(self, Selection::Selected(current) if current == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unselected() {
        let selection: Selection<u32> = Selection::default();
        assert_eq!(selection.selected(), None);
    }

    #[test]
    fn test_toggle_selects() {
        let mut selection = Selection::Unselected;
        selection.toggle(4);
        assert!(selection.is_selected(&4));
    }

    #[test]
    fn test_toggle_same_value_deselects() {
        let mut selection = Selection::Unselected;
        selection.toggle(4);
        selection.toggle(4);
        assert_eq!(selection, Selection::Unselected);
    }

    #[test]
    fn test_toggle_different_value_replaces() {
        let mut selection = Selection::Unselected;
        selection.toggle("20%".to_string());
        selection.toggle("30%".to_string());
        assert!(selection.is_selected(&"30%".to_string()));
        assert!(!selection.is_selected(&"20%".to_string()));
    }

    #[test]
    fn test_clear() {
        let mut selection = Selection::Selected(5);
        selection.clear();
        assert_eq!(selection.selected(), None);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let selection = Selection::Selected("27.5%".to_string());
        let json = serde_json::to_string(&selection).unwrap();
        let roundtrip: Selection<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(selection, roundtrip);
    }
}
