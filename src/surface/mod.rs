//! Rendering surfaces the navigator draws on
//!
//! A surface is the side-effecting half of matching: it reports row texts and
//! applies highlight, scroll and overlay changes. The matching itself lives in
//! [`crate::matcher`] and never touches a surface directly.

pub mod document;
pub mod tab;

pub use document::DocumentSurface;
pub use tab::TabSurface;

use crate::dom::{RowHandle, RowText};
use crate::error::Result;
use crate::matcher::OverlayView;
use serde::{Deserialize, Serialize};

/// A key press delivered to the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Key name as reported by the browser (e.g. "Enter")
    pub key: String,

    /// Whether Shift was held
    #[serde(default)]
    pub shift: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            shift: false,
        }
    }

    /// Builder method: hold Shift
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// User input captured on the page since the last drain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PageInput {
    /// Key pressed anywhere in the document
    Key(KeyEvent),
    /// "Next Match" button clicked
    Next,
    /// "Previous Match" button clicked
    Previous,
}

/// Side-effecting operations on a viewed page
pub trait PageSurface: Send {
    /// Text of every row currently in the page, in document order
    fn scan_rows(&mut self) -> Result<Vec<RowText>>;

    /// Set a row's background; an empty color clears it
    fn paint_row(&mut self, row: RowHandle, background: &str) -> Result<()>;

    /// Scroll a row to the middle of the viewport
    fn scroll_into_view(&mut self, row: RowHandle) -> Result<()>;

    /// Create the floating navigation UI if missing; true when created
    fn ensure_overlay(&mut self) -> Result<bool>;

    /// Update visibility and counter of the floating navigation UI
    fn render_overlay(&mut self, view: &OverlayView) -> Result<()>;

    /// Take input queued by the page since the last call
    fn drain_input(&mut self) -> Result<Vec<PageInput>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_input_wire_format() {
        let input: PageInput =
            serde_json::from_str(r#"{"kind": "key", "key": "Enter", "shift": true}"#).unwrap();
        assert_eq!(input, PageInput::Key(KeyEvent::new("Enter").with_shift()));

        let input: PageInput = serde_json::from_str(r#"{"kind": "previous"}"#).unwrap();
        assert_eq!(input, PageInput::Previous);
    }

    #[test]
    fn test_key_event_shift_defaults_off() {
        let input: PageInput = serde_json::from_str(r#"{"kind": "key", "key": "Enter"}"#).unwrap();
        assert_eq!(input, PageInput::Key(KeyEvent::new("Enter")));
    }
}
