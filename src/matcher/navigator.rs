use crate::dom::RowHandle;
use crate::error::Result;
use crate::matcher::overlay::OverlayView;
use crate::matcher::scan::{MatchSet, compute_matches};
use crate::matcher::style::{HighlightStyle, RowState};
use crate::storage::{CURRENT_MATCH_INDEX_KEY, SharedStore};
use crate::surface::{KeyEvent, PageInput, PageSurface};
use serde::{Deserialize, Serialize};

/// Direction of a cursor move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Next,
    Previous,
}

/// Snapshot of the navigator reported back to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStatus {
    /// Number of entries in the match set
    pub total: usize,

    /// Cursor position, -1 when nothing is selected
    pub current_match_index: i64,

    /// Counter text shown on the page, absent when hidden
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter: Option<String>,
}

/// Whether a key press was consumed by navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key moved the cursor; its default action must be suppressed
    Handled,
    /// The key is not bound
    Ignored,
}

impl KeyOutcome {
    pub fn prevent_default(self) -> bool {
        self == KeyOutcome::Handled
    }
}

/// Finds case numbers in the rows of one page and cycles through the matches
pub struct Navigator<S: PageSurface> {
    surface: S,
    style: HighlightStyle,
    store: Option<SharedStore>,
    cases: Vec<String>,
    matches: MatchSet,
    cursor: Option<usize>,
}

impl<S: PageSurface> Navigator<S> {
    /// Create a navigator drawing on the given surface
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            style: HighlightStyle::default(),
            store: None,
            cases: Vec::new(),
            matches: MatchSet::new(),
            cursor: None,
        }
    }

    /// Builder method: set highlight colors
    pub fn with_style(mut self, style: HighlightStyle) -> Self {
        self.style = style;
        self
    }

    /// Builder method: persist the cursor into a store
    pub fn with_store(mut self, store: SharedStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn matches(&self) -> &MatchSet {
        &self.matches
    }

    /// Cursor into the match set
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Cursor with -1 standing for "nothing selected"
    pub fn current_match_index(&self) -> i64 {
        self.cursor.map_or(-1, |i| i as i64)
    }

    /// Case numbers of the most recent search
    pub fn cases(&self) -> &[String] {
        &self.cases
    }

    pub fn status(&self) -> MatchStatus {
        MatchStatus {
            total: self.matches.len(),
            current_match_index: self.current_match_index(),
            counter: OverlayView::for_matches(self.matches.len(), self.cursor).counter,
        }
    }

    /// Clear every highlight and forget the matches
    pub fn reset(&mut self) {
        let rows: Vec<RowHandle> = self.matches.rows().collect();
        for row in rows {
            self.paint(row, RowState::Plain);
        }
        self.matches.clear();
        self.cursor = None;
    }

    /// Rebuild the match set for the case numbers and highlight it
    ///
    /// `restore_index` wins when it points inside the new match set,
    /// otherwise the cursor lands on the first match.
    pub fn search(&mut self, case_numbers: &[String], restore_index: Option<usize>) -> MatchStatus {
        self.reset();
        self.cases = case_numbers.to_vec();

        let rows = match self.surface.scan_rows() {
            Ok(rows) => rows,
            Err(e) => {
                log::warn!("Failed to read page rows, treating page as empty: {}", e);
                Vec::new()
            }
        };

        self.matches = compute_matches(&rows, case_numbers);
        log::info!(
            "Highlighted {} matches for cases: {}",
            self.matches.len(),
            case_numbers.join(", ")
        );

        self.cursor = match restore_index {
            Some(i) if i < self.matches.len() => Some(i),
            _ if !self.matches.is_empty() => Some(0),
            _ => None,
        };

        self.ensure_overlay();
        if self.matches.is_empty() {
            self.render_overlay();
        } else {
            self.render_selection();
        }

        self.status()
    }

    /// Move to the next match, wrapping at the end
    pub fn next(&mut self) -> MatchStatus {
        self.step(Direction::Next)
    }

    /// Move to the previous match, wrapping at the start
    pub fn previous(&mut self) -> MatchStatus {
        self.step(Direction::Previous)
    }

    /// Move the cursor one match in the given direction
    pub fn step(&mut self, direction: Direction) -> MatchStatus {
        let len = self.matches.len();
        if len == 0 {
            return self.status();
        }

        let next = match (direction, self.cursor) {
            (Direction::Next, Some(i)) => (i + 1) % len,
            (Direction::Next, None) => 0,
            (Direction::Previous, Some(i)) => (i + len - 1) % len,
            (Direction::Previous, None) => len - 1,
        };

        self.select(next);
        log::debug!("Navigated {:?}. Current match index: {}", direction, next);
        self.status()
    }

    /// Move to the next match produced by one case number
    ///
    /// The search starts after the cursor and wraps around. Unknown case
    /// numbers leave the cursor where it is.
    pub fn navigate_to_case(&mut self, case_number: &str) -> MatchStatus {
        let Some(case_index) = self.cases.iter().position(|c| c == case_number) else {
            log::debug!("'{}' was not part of the last search", case_number);
            return self.status();
        };

        let len = self.matches.len();
        let start = self.cursor.map_or(0, |i| i + 1);
        let target = (0..len)
            .map(|offset| (start + offset) % len)
            .find(|&i| self.matches.get(i).is_some_and(|e| e.case_index == case_index));

        match target {
            Some(index) => self.select(index),
            None => log::debug!("No matches for '{}'", case_number),
        }
        self.status()
    }

    /// Apply a key press; Enter moves forward, Shift+Enter backward
    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyOutcome {
        if event.key != "Enter" {
            return KeyOutcome::Ignored;
        }

        if event.shift {
            self.previous();
        } else {
            self.next();
        }
        KeyOutcome::Handled
    }

    /// Apply every input queued on the page
    pub fn pump_input(&mut self) -> MatchStatus {
        let inputs = match self.surface.drain_input() {
            Ok(inputs) => inputs,
            Err(e) => {
                log::warn!("Failed to read page input: {}", e);
                Vec::new()
            }
        };

        for input in inputs {
            match input {
                PageInput::Key(event) => {
                    self.handle_key(&event);
                }
                PageInput::Next => {
                    self.next();
                }
                PageInput::Previous => {
                    self.previous();
                }
            }
        }

        self.status()
    }

    fn select(&mut self, index: usize) {
        self.cursor = Some(index);
        self.render_selection();
        self.save_cursor();
    }

    /// Paint all matches, then the selected one on top, scroll and update the counter
    fn render_selection(&mut self) {
        let rows: Vec<RowHandle> = self.matches.rows().collect();
        for &row in &rows {
            self.paint(row, RowState::Matched);
        }

        if let Some(row) = self.cursor.and_then(|i| rows.get(i).copied()) {
            self.paint(row, RowState::Selected);
            if let Err(e) = self.surface.scroll_into_view(row) {
                log::warn!("Failed to scroll {} into view: {}", row, e);
            }
        }

        self.render_overlay();
    }

    fn paint(&mut self, row: RowHandle, state: RowState) {
        let background = self.style.background_for(state).to_string();
        if let Err(e) = self.surface.paint_row(row, &background) {
            log::warn!("Failed to paint {}: {}", row, e);
        }
    }

    /// Recreate the overlay whenever the page lost it
    fn ensure_overlay(&mut self) {
        match self.surface.ensure_overlay() {
            Ok(true) => log::debug!("Created navigation overlay"),
            Ok(false) => {}
            Err(e) => log::warn!("Failed to create navigation overlay: {}", e),
        }
    }

    fn render_overlay(&mut self) {
        let view = OverlayView::for_matches(self.matches.len(), self.cursor);
        if let Err(e) = self.surface.render_overlay(&view) {
            log::warn!("Failed to update navigation overlay: {}", e);
        }
    }

    fn save_cursor(&self) {
        let Some(store) = &self.store else {
            log::error!("No store available, current match index not saved");
            return;
        };

        if let Err(e) = self.persist_cursor(store) {
            log::error!("Failed to save current match index: {}", e);
        }
    }

    fn persist_cursor(&self, store: &SharedStore) -> Result<()> {
        store.set(CURRENT_MATCH_INDEX_KEY, serde_json::json!(self.current_match_index()))
    }
}
