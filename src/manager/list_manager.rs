use crate::channel::{PageRequest, PageResponse};
use crate::error::{CaseFinderError, Result};
use crate::manager::case_list::CaseList;
use crate::manager::dispatch::UpdateDispatcher;
use crate::matcher::{Direction, MatchStatus};
use crate::storage::{CASES_KEY, SharedStore, load_current_match_index};
use crate::summary::{DocumentViewer, RowSnapshot, render_summary_document};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Title of the rendered summary document
const SUMMARY_TITLE: &str = "Case Summary";

/// Lifecycle of a list manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ManagerState {
    Idle,
    Loading,
    Ready,
}

/// Owns the case list, persists it and keeps the page's search in sync
///
/// Every mutation writes the list to the store first, then asks the page to
/// search again. Store and page failures are logged and never undo the
/// in-memory change.
pub struct ListManager {
    state: ManagerState,
    cases: CaseList,
    store: SharedStore,
    dispatcher: Arc<UpdateDispatcher>,
    viewer: Option<Arc<dyn DocumentViewer>>,
}

impl ListManager {
    pub fn new(store: SharedStore, dispatcher: Arc<UpdateDispatcher>) -> Self {
        Self {
            state: ManagerState::Idle,
            cases: CaseList::new(),
            store,
            dispatcher,
            viewer: None,
        }
    }

    /// Builder method: where summaries are opened
    pub fn with_viewer(mut self, viewer: Arc<dyn DocumentViewer>) -> Self {
        self.viewer = Some(viewer);
        self
    }

    pub fn state(&self) -> ManagerState {
        self.state
    }

    pub fn cases(&self) -> &CaseList {
        &self.cases
    }

    /// Read the persisted list; an unreadable store yields an empty list
    pub fn load(&mut self) -> &CaseList {
        self.state = ManagerState::Loading;

        self.cases = match self.read_cases() {
            Ok(cases) => cases,
            Err(e) => {
                log::error!("Failed to load cases, starting empty: {}", e);
                CaseList::new()
            }
        };

        self.state = ManagerState::Ready;
        log::info!("Loaded {} cases", self.cases.len());
        &self.cases
    }

    fn read_cases(&self) -> Result<CaseList> {
        match self.store.get(CASES_KEY)? {
            Some(value) => {
                let values: Vec<String> = serde_json::from_value(value)?;
                Ok(CaseList::from_stored(values))
            }
            None => Ok(CaseList::new()),
        }
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.state == ManagerState::Ready {
            Ok(())
        } else {
            Err(CaseFinderError::NotReady)
        }
    }

    /// Add a case number to the front of the list
    ///
    /// Surrounding whitespace is trimmed and blank input ignored. An exact
    /// repeat fails with [`CaseFinderError::AlreadyExists`].
    pub async fn add(&mut self, case_number: &str) -> Result<()> {
        self.ensure_ready()?;

        let case_number = case_number.trim();
        if case_number.is_empty() {
            return Ok(());
        }

        if !self.cases.prepend(case_number.to_string()) {
            log::debug!("'{}' is already in the list", case_number);
            return Err(CaseFinderError::AlreadyExists(case_number.to_string()));
        }

        log::info!("Added case '{}'", case_number);
        self.persist();
        self.notify_update().await;
        Ok(())
    }

    /// Remove every entry equal to the case number
    ///
    /// Removing an absent value changes nothing: no write, no page message.
    pub async fn delete(&mut self, case_number: &str) -> Result<()> {
        self.ensure_ready()?;

        let removed = self.cases.remove_all(case_number);
        if removed == 0 {
            log::debug!("'{}' is not in the list", case_number);
            return Ok(());
        }

        log::info!("Deleted case '{}'", case_number);
        self.persist();
        self.notify_update().await;
        Ok(())
    }

    fn persist(&self) {
        let value = match serde_json::to_value(&self.cases) {
            Ok(value) => value,
            Err(e) => {
                log::error!("Failed to encode cases: {}", e);
                return;
            }
        };

        match self.store.set(CASES_KEY, value) {
            Ok(()) => log::debug!("Cases saved"),
            Err(e) => log::error!("Cases kept in memory only: {}", e),
        }
    }

    async fn notify_update(&self) {
        let request = PageRequest::UpdateCases {
            cases: self.cases.to_vec(),
        };
        if let Err(e) = self.dispatcher.dispatch(request).await {
            log::warn!("Page not updated: {}", e);
        }
    }

    async fn send(&self, request: PageRequest) -> Option<PageResponse> {
        match self.dispatcher.dispatch(request).await {
            Ok(response) => response,
            Err(e) if e.is_degradation() => {
                log::warn!("Page request failed: {}", e);
                None
            }
            Err(e) => {
                log::error!("Page request failed: {}", e);
                None
            }
        }
    }

    async fn send_for_status(&self, request: PageRequest) -> Option<MatchStatus> {
        match self.send(request).await? {
            PageResponse::Matches(status) => Some(status),
            other => {
                log::warn!("Unexpected page reply: {:?}", other);
                None
            }
        }
    }

    /// Ask the page to search for the current list
    pub async fn request_search(&self, restore_index: Option<usize>) -> Option<MatchStatus> {
        self.send_for_status(PageRequest::SearchCases {
            cases: self.cases.to_vec(),
            current_match_index: restore_index,
        })
        .await
    }

    /// Search again, restoring the cursor saved by the page
    pub async fn resume(&self) -> Option<MatchStatus> {
        let restore = match load_current_match_index(self.store.as_ref()) {
            Ok(index) => index,
            Err(e) => {
                log::warn!("Cannot restore current match index: {}", e);
                None
            }
        };
        self.request_search(restore).await
    }

    /// Move the page's cursor one match
    pub async fn step(&self, direction: Direction) -> Option<MatchStatus> {
        let request = match direction {
            Direction::Next => PageRequest::NextMatch,
            Direction::Previous => PageRequest::PreviousMatch,
        };
        self.send_for_status(request).await
    }

    /// Move the page's cursor to the next match of one case number
    pub async fn navigate_to_case(&self, case_number: &str) -> Option<MatchStatus> {
        self.send_for_status(PageRequest::NavigateToCase {
            case_number: case_number.to_string(),
        })
        .await
    }

    /// Apply input queued on the page
    pub async fn poll_input(&self) -> Option<MatchStatus> {
        self.send_for_status(PageRequest::PollInput).await
    }

    /// Collect matching rows from the page and open them as a document
    pub async fn summarize(&self) -> Vec<RowSnapshot> {
        let rows = match self
            .send(PageRequest::Summarize {
                cases: self.cases.to_vec(),
            })
            .await
        {
            Some(PageResponse::Summary { rows }) => rows,
            Some(other) => {
                log::warn!("Unexpected page reply: {:?}", other);
                return Vec::new();
            }
            None => return Vec::new(),
        };

        match &self.viewer {
            Some(viewer) => {
                let html = render_summary_document(SUMMARY_TITLE, &rows);
                if let Err(e) = viewer.open_document(SUMMARY_TITLE, &html) {
                    log::warn!("Failed to open summary: {}", e);
                }
            }
            None => log::debug!("No viewer configured, summary not opened"),
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};
    use serde_json::json;

    fn ready_manager(store: SharedStore) -> ListManager {
        let mut manager = ListManager::new(store, Arc::new(UpdateDispatcher::detached()));
        manager.load();
        manager
    }

    #[test]
    fn test_load_transitions_to_ready() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        store.set(CASES_KEY, json!(["B-2", "A-1"])).unwrap();

        let mut manager = ListManager::new(store, Arc::new(UpdateDispatcher::detached()));
        assert_eq!(manager.state(), ManagerState::Idle);

        assert_eq!(manager.load().to_vec(), vec!["B-2", "A-1"]);
        assert_eq!(manager.state(), ManagerState::Ready);
    }

    #[test]
    fn test_load_with_malformed_value() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        store.set(CASES_KEY, json!({"not": "a list"})).unwrap();

        let manager = ready_manager(store);
        assert!(manager.cases().is_empty());
        assert_eq!(manager.state(), ManagerState::Ready);
    }

    #[tokio::test]
    async fn test_mutation_before_load() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut manager = ListManager::new(store, Arc::new(UpdateDispatcher::detached()));

        assert!(matches!(manager.add("A-1").await, Err(CaseFinderError::NotReady)));
        assert!(matches!(manager.delete("A-1").await, Err(CaseFinderError::NotReady)));
    }

    #[tokio::test]
    async fn test_add_trims_and_prepends() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut manager = ready_manager(store.clone());

        manager.add("  A-1 ").await.unwrap();
        manager.add("B-2").await.unwrap();

        assert_eq!(manager.cases().to_vec(), vec!["B-2", "A-1"]);
        assert_eq!(store.get(CASES_KEY).unwrap(), Some(json!(["B-2", "A-1"])));
    }

    #[tokio::test]
    async fn test_add_blank_is_ignored() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut manager = ready_manager(store.clone());

        manager.add("   ").await.unwrap();
        assert!(manager.cases().is_empty());
        assert_eq!(store.get(CASES_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_add_duplicate() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut manager = ready_manager(store);

        manager.add("X-1").await.unwrap();
        let err = manager.add("X-1").await.unwrap_err();

        assert!(matches!(err, CaseFinderError::AlreadyExists(ref c) if c == "X-1"));
        assert_eq!(manager.cases().len(), 1);
    }

    #[tokio::test]
    async fn test_page_failures_do_not_undo_mutations() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut manager = ready_manager(store);

        manager.add("A-1").await.unwrap();
        assert_eq!(manager.request_search(None).await, None);
        assert_eq!(manager.step(Direction::Next).await, None);
        assert!(manager.summarize().await.is_empty());
        assert_eq!(manager.cases().len(), 1);
    }
}
