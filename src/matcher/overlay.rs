use serde::{Deserialize, Serialize};

/// Element id of the floating "Next Match" button
pub const NEXT_BUTTON_ID: &str = "caseFinder-nextButton";

/// Element id of the floating "Previous Match" button
pub const PREV_BUTTON_ID: &str = "caseFinder-prevButton";

/// Element id of the floating match counter
pub const MATCH_COUNTER_ID: &str = "caseFinder-matchCounter";

/// What the floating navigation UI should show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayView {
    /// Whether next/previous buttons are shown
    pub controls_visible: bool,

    /// Counter text, hidden when `None`
    pub counter: Option<String>,
}

impl OverlayView {
    /// Compute the view for a match count and cursor
    pub fn for_matches(total: usize, cursor: Option<usize>) -> Self {
        if total == 0 {
            return Self {
                controls_visible: false,
                counter: None,
            };
        }

        Self {
            controls_visible: true,
            counter: Some(counter_text(total, cursor)),
        }
    }
}

/// 1-based "current/total" counter text
///
/// Without a cursor the position shows as 0, as `-1 + 1` would.
pub fn counter_text(total: usize, cursor: Option<usize>) -> String {
    let position = cursor.map_or(0, |i| i + 1);
    format!("{}/{}", position, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_text() {
        assert_eq!(counter_text(2, Some(0)), "1/2");
        assert_eq!(counter_text(5, Some(4)), "5/5");
        assert_eq!(counter_text(3, None), "0/3");
    }

    #[test]
    fn test_empty_hides_everything() {
        let view = OverlayView::for_matches(0, None);
        assert!(!view.controls_visible);
        assert!(view.counter.is_none());
    }

    #[test]
    fn test_non_empty_view() {
        let view = OverlayView::for_matches(2, Some(1));
        assert!(view.controls_visible);
        assert_eq!(view.counter.as_deref(), Some("2/2"));
    }
}
