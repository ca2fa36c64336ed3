use crate::dom::{DomTree, ElementNode, RowHandle, RowText};
use crate::error::Result;
use crate::matcher::overlay::{MATCH_COUNTER_ID, NEXT_BUTTON_ID, OverlayView, PREV_BUTTON_ID};
use crate::surface::{PageInput, PageSurface};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug)]
struct DocumentState {
    tree: DomTree,
    scrolled: Vec<RowHandle>,
    pending: VecDeque<PageInput>,
}

/// Surface backed by an in-memory element tree
///
/// Clones share the same document, so one clone can be handed to a
/// navigator while another inspects or edits the page.
#[derive(Debug, Clone)]
pub struct DocumentSurface {
    state: Arc<Mutex<DocumentState>>,
}

impl DocumentSurface {
    pub fn new(tree: DomTree) -> Self {
        Self {
            state: Arc::new(Mutex::new(DocumentState {
                tree,
                scrolled: Vec::new(),
                pending: VecDeque::new(),
            })),
        }
    }

    /// Surface over a body holding one table with the given row texts
    pub fn with_rows(rows: &[&str]) -> Self {
        let table = ElementNode::new("table").with_children(
            rows.iter().map(|text| ElementNode::row([*text])).collect(),
        );
        Self::new(DomTree::new(ElementNode::new("body").with_children(vec![table])))
    }

    fn lock(&self) -> MutexGuard<'_, DocumentState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run a closure against the document tree
    pub fn with_tree<T>(&self, f: impl FnOnce(&mut DomTree) -> T) -> T {
        f(&mut self.lock().tree)
    }

    /// Background color of a row, if any
    pub fn row_background(&self, row: RowHandle) -> Option<String> {
        self.lock()
            .tree
            .row(row)
            .and_then(|node| node.style_property("background-color"))
    }

    /// Most recent row scrolled into view
    pub fn last_scrolled(&self) -> Option<RowHandle> {
        self.lock().scrolled.last().copied()
    }

    /// Queue input as if the user acted on the page
    pub fn push_input(&self, input: PageInput) {
        self.lock().pending.push_back(input);
    }

    /// Text of an element by id, when present and displayed
    pub fn visible_text(&self, id: &str) -> Option<String> {
        let state = self.lock();
        let node = state.tree.find_by_id(id)?;
        if node.style_property("display").as_deref() == Some("none") {
            return None;
        }
        Some(node.inner_text())
    }

    fn overlay_element(tag: &str, id: &str, text: &str, right: &str, bottom: &str) -> ElementNode {
        let mut node = ElementNode::new(tag).with_attribute("id", id).with_text(text);
        for (name, value) in [
            ("position", "fixed"),
            ("bottom", bottom),
            ("right", right),
            ("z-index", "1000"),
        ] {
            node.set_style_property(name, value);
        }
        node
    }
}

impl PageSurface for DocumentSurface {
    fn scan_rows(&mut self) -> Result<Vec<RowText>> {
        Ok(self.lock().tree.scan_rows())
    }

    fn paint_row(&mut self, row: RowHandle, background: &str) -> Result<()> {
        match self.lock().tree.row_mut(row) {
            Some(node) => node.set_style_property("background-color", background),
            None => log::debug!("{} is no longer in the document", row),
        }
        Ok(())
    }

    fn scroll_into_view(&mut self, row: RowHandle) -> Result<()> {
        self.lock().scrolled.push(row);
        Ok(())
    }

    fn ensure_overlay(&mut self) -> Result<bool> {
        let mut state = self.lock();
        let mut created = false;

        if state.tree.find_by_id(NEXT_BUTTON_ID).is_none() {
            let node = Self::overlay_element("button", NEXT_BUTTON_ID, "Next Match", "10px", "10px");
            state.tree.append_to_body(node);
            created = true;
        }
        if state.tree.find_by_id(PREV_BUTTON_ID).is_none() {
            let node = Self::overlay_element("button", PREV_BUTTON_ID, "Previous Match", "110px", "10px");
            state.tree.append_to_body(node);
            created = true;
        }
        if state.tree.find_by_id(MATCH_COUNTER_ID).is_none() {
            let node = Self::overlay_element("div", MATCH_COUNTER_ID, "", "10px", "50px");
            state.tree.append_to_body(node);
            created = true;
        }

        Ok(created)
    }

    fn render_overlay(&mut self, view: &OverlayView) -> Result<()> {
        let mut state = self.lock();
        let controls_display = if view.controls_visible { "" } else { "none" };

        for id in [NEXT_BUTTON_ID, PREV_BUTTON_ID] {
            if let Some(button) = state.tree.find_by_id_mut(id) {
                button.set_style_property("display", controls_display);
            }
        }

        if let Some(counter) = state.tree.find_by_id_mut(MATCH_COUNTER_ID) {
            match &view.counter {
                Some(text) => {
                    counter.text_content = Some(text.clone());
                    counter.set_style_property("display", "");
                }
                None => counter.set_style_property("display", "none"),
            }
        }

        Ok(())
    }

    fn drain_input(&mut self) -> Result<Vec<PageInput>> {
        Ok(self.lock().pending.drain(..).collect())
    }
}
