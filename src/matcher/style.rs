use serde::{Deserialize, Serialize};

/// Visual state of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RowState {
    /// No highlight
    Plain,
    /// Row is in the match set
    Matched,
    /// Row is the one the cursor points at
    Selected,
}

/// Colors used to highlight rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightStyle {
    /// Background of every matched row
    pub matched_color: String,

    /// Background of the selected row
    pub selected_color: String,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            matched_color: "yellow".to_string(),
            selected_color: "orange".to_string(),
        }
    }
}

impl HighlightStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set matched color
    pub fn matched_color(mut self, color: impl Into<String>) -> Self {
        self.matched_color = color.into();
        self
    }

    /// Builder method: set selected color
    pub fn selected_color(mut self, color: impl Into<String>) -> Self {
        self.selected_color = color.into();
        self
    }

    /// Background color for a state; empty clears the background
    pub fn background_for(&self, state: RowState) -> &str {
        match state {
            RowState::Plain => "",
            RowState::Matched => &self.matched_color,
            RowState::Selected => &self.selected_color,
        }
    }
}
