use crate::dom::{ROW_ATTRIBUTE, RowHandle, RowText};
use crate::error::{CaseFinderError, Result};
use crate::matcher::overlay::{MATCH_COUNTER_ID, NEXT_BUTTON_ID, OverlayView, PREV_BUTTON_ID};
use crate::surface::{PageInput, PageSurface};
use headless_chrome::Tab;
use serde_json::Value;
use std::sync::Arc;

/// Surface driving a live Chrome tab through injected JavaScript
pub struct TabSurface {
    tab: Arc<Tab>,
}

impl TabSurface {
    pub fn new(tab: Arc<Tab>) -> Self {
        Self { tab }
    }

    /// The underlying tab
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    fn evaluate(&self, js: &str) -> Result<Option<Value>> {
        let result = self
            .tab
            .evaluate(js, false)
            .map_err(|e| CaseFinderError::EvaluationFailed(e.to_string()))?;
        Ok(result.value)
    }

    /// Evaluate a script that returns a JSON string and decode it
    fn evaluate_json<T: serde::de::DeserializeOwned>(&self, js: &str) -> Result<T> {
        let value = self
            .evaluate(js)?
            .ok_or_else(|| CaseFinderError::EvaluationFailed("No value returned from script".to_string()))?;

        let json = value
            .as_str()
            .ok_or_else(|| CaseFinderError::EvaluationFailed(format!("Expected a JSON string, got {}", value)))?;

        Ok(serde_json::from_str(json)?)
    }

    fn row_selector(row: RowHandle) -> String {
        format!("tr[{}=\"{}\"]", ROW_ATTRIBUTE, row.0)
    }
}

impl PageSurface for TabSurface {
    fn scan_rows(&mut self) -> Result<Vec<RowText>> {
        self.evaluate_json(include_str!("scan_rows.js"))
    }

    fn paint_row(&mut self, row: RowHandle, background: &str) -> Result<()> {
        let js = format!(
            "(function() {{ const row = document.querySelector({}); if (row) row.style.backgroundColor = {}; return !!row; }})()",
            serde_json::to_string(&Self::row_selector(row))?,
            serde_json::to_string(background)?,
        );

        let found = self.evaluate(&js)?.and_then(|v| v.as_bool()).unwrap_or(false);
        if !found {
            log::debug!("{} is no longer in the page", row);
        }
        Ok(())
    }

    fn scroll_into_view(&mut self, row: RowHandle) -> Result<()> {
        let js = format!(
            "(function() {{ const row = document.querySelector({}); if (row) row.scrollIntoView({{ behavior: 'smooth', block: 'center' }}); return !!row; }})()",
            serde_json::to_string(&Self::row_selector(row))?,
        );
        self.evaluate(&js)?;
        Ok(())
    }

    fn ensure_overlay(&mut self) -> Result<bool> {
        let created = self
            .evaluate(include_str!("overlay.js"))?
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        Ok(created)
    }

    fn render_overlay(&mut self, view: &OverlayView) -> Result<()> {
        let js = format!(
            r#"(function() {{
                const display = {controls};
                for (const id of [{next}, {prev}]) {{
                    const el = document.getElementById(id);
                    if (el) el.style.display = display;
                }}
                const counter = document.getElementById({counter_id});
                const text = {text};
                if (counter) {{
                    counter.style.display = text === null ? 'none' : '';
                    if (text !== null) counter.innerText = text;
                }}
                return true;
            }})()"#,
            controls = serde_json::to_string(if view.controls_visible { "" } else { "none" })?,
            next = serde_json::to_string(NEXT_BUTTON_ID)?,
            prev = serde_json::to_string(PREV_BUTTON_ID)?,
            counter_id = serde_json::to_string(MATCH_COUNTER_ID)?,
            text = serde_json::to_string(&view.counter)?,
        );
        self.evaluate(&js)?;
        Ok(())
    }

    fn drain_input(&mut self) -> Result<Vec<PageInput>> {
        let js = r#"(function() {
            const pending = window.__caseFinderInput || [];
            window.__caseFinderInput = [];
            return JSON.stringify(pending);
        })()"#;
        self.evaluate_json(js)
    }
}
