//! # case-finder
//!
//! Track a short list of case numbers and find them in the table rows of a web page:
//! matching rows are highlighted, and a floating next/previous control with a
//! `current/total` counter cycles through them.
//!
//! ## Features
//!
//! - **Matching**: literal, case-insensitive substring search over every `<tr>` of a page
//! - **Navigation**: cyclic next/previous cursor, Enter / Shift+Enter bindings, scroll-to-row
//! - **Case list**: ordered, duplicate-free, persisted to a JSON key-value store
//! - **Page messaging**: typed request/response channel between the list owner and the page
//! - **Summaries**: last two cells of every matching row, opened as a standalone document
//! - **MCP Server**: the list operations as Model Context Protocol tools
//!
//! ## Library Usage
//!
//! The matching half runs against any [`PageSurface`]. With the in-memory
//! [`DocumentSurface`] no browser is needed:
//!
//! ```rust
//! use case_finder::{DocumentSurface, Navigator};
//!
//! let page = DocumentSurface::with_rows(&[
//!     "A-100-2024 open",
//!     "B-200-2024 closed",
//!     "A-100-2024 appeal",
//! ]);
//! let mut navigator = Navigator::new(page);
//!
//! let status = navigator.search(&["A-100-2024".to_string()], None);
//! assert_eq!(status.total, 2);
//! assert_eq!(status.counter.as_deref(), Some("1/2"));
//!
//! navigator.next();
//! assert_eq!(navigator.current_match_index(), 1);
//! ```
//!
//! ### Driving a live page
//!
//! ```rust,no_run
//! use case_finder::{BrowserSession, LaunchOptions, ListManager, UpdateDispatcher};
//! use case_finder::matcher::HighlightStyle;
//! use case_finder::storage::{JsonFileStore, SharedStore};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> case_finder::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::new().headless(false))?;
//! session.navigate("https://example.com/docket")?;
//!
//! let store: SharedStore = Arc::new(JsonFileStore::new("case_finder_store.json"));
//! let (channel, _host) = session.attach_active_page(store.clone(), HighlightStyle::default())?;
//!
//! let mut manager = ListManager::new(store, Arc::new(UpdateDispatcher::new(Some(Arc::new(channel)))));
//! manager.load();
//! manager.add("A-100-2024").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`dom`]: element tree, row indexing and rendered text
//! - [`matcher`]: patterns, match computation, the [`Navigator`]
//! - [`surface`]: where highlights are drawn (in-memory document or Chrome tab)
//! - [`channel`]: page request/response protocol and the page host task
//! - [`manager`]: the case list and its [`ListManager`]
//! - [`storage`]: key-value persistence
//! - [`summary`]: row snapshots and the summary document
//! - [`browser`]: Chrome session management
//! - [`error`]: Error types and result aliases
//! - [`mcp`]: Model Context Protocol server (requires `mcp-handler` feature)

pub mod browser;
pub mod channel;
pub mod dom;
pub mod error;
pub mod manager;
pub mod matcher;
pub mod storage;
pub mod summary;
pub mod surface;

#[cfg(feature = "mcp-handler")]
pub mod mcp;

pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions};
pub use channel::{LocalPageChannel, PageChannel, PageHost, PageRequest, PageResponse};
pub use dom::{DomTree, ElementNode, RowHandle, RowText};
pub use error::{CaseFinderError, Result};
pub use manager::{CaseList, ListManager, ManagerState, UpdateDispatcher};
pub use matcher::{MatchSet, MatchStatus, Navigator};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
pub use summary::{DocumentViewer, RowSnapshot};
pub use surface::{DocumentSurface, PageSurface, TabSurface};

#[cfg(feature = "mcp-handler")]
pub use mcp::CaseFinderServer;
#[cfg(feature = "mcp-handler")]
pub use rmcp::ServiceExt;
