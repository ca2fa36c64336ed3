use crate::browser::{BrowserSession, LaunchOptions};
use crate::manager::{ListManager, UpdateDispatcher};
use crate::matcher::HighlightStyle;
use crate::storage::SharedStore;
use rmcp::{
    ServerHandler, tool_handler,
    handler::server::router::tool::ToolRouter,
    model::{ServerCapabilities, ServerInfo},
};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// How often a launched server applies input queued on the page
pub const DEFAULT_INPUT_POLL: Duration = Duration::from_millis(200);

/// MCP server owning one list manager and, optionally, the browser it drives
#[derive(Clone)]
pub struct CaseFinderServer {
    manager: Arc<Mutex<ListManager>>,
    session: Option<Arc<BrowserSession>>,
    tool_router: ToolRouter<CaseFinderServer>,
}

impl CaseFinderServer {
    /// Serve an already configured list manager
    pub fn new(manager: ListManager) -> Self {
        Self {
            manager: Arc::new(Mutex::new(manager)),
            session: None,
            tool_router: Self::tool_router(),
        }
    }

    /// Launch a browser on `url` and serve a list manager attached to it
    ///
    /// Must be called inside a tokio runtime.
    pub fn launch(options: LaunchOptions, url: &str, store: SharedStore) -> crate::error::Result<Self> {
        let session = Arc::new(BrowserSession::launch(options)?);
        session.navigate(url)?;

        let (channel, _host) = session.attach_active_page(store.clone(), HighlightStyle::default())?;
        let dispatcher = Arc::new(UpdateDispatcher::new(Some(Arc::new(channel))));

        let mut manager = ListManager::new(store, dispatcher).with_viewer(session.clone());
        manager.load();

        let mut server = Self::new(manager);
        server.session = Some(session);
        server.spawn_input_poller(DEFAULT_INPUT_POLL);
        Ok(server)
    }

    /// Apply page input (Enter, Shift+Enter, overlay buttons) every `period`
    ///
    /// The task holds the manager weakly and stops once the last server
    /// clone is dropped. Must be called inside a tokio runtime.
    pub fn spawn_input_poller(&self, period: Duration) -> JoinHandle<()> {
        let manager = Arc::downgrade(&self.manager);
        tokio::spawn(poll_page_input(manager, period))
    }

    pub(crate) fn manager(&self) -> &Mutex<ListManager> {
        &self.manager
    }

    /// The browser this server drives, if it launched one
    pub fn session(&self) -> Option<&Arc<BrowserSession>> {
        self.session.as_ref()
    }
}

async fn poll_page_input(manager: Weak<Mutex<ListManager>>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    let mut last = None;

    loop {
        ticker.tick().await;
        let Some(manager) = manager.upgrade() else {
            log::debug!("Input poller stopped: server dropped");
            return;
        };

        let status = manager.lock().await.poll_input().await;
        if status.is_some() && status != last {
            log::debug!("Page input applied: {:?}", status);
            last = status;
        }
    }
}

#[tool_handler]
impl ServerHandler for CaseFinderServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Tracks case numbers and highlights the table rows that contain them. \
                 Use case_add/case_delete to edit the list, case_search to highlight, \
                 match_next/match_previous to move between matches, \
                 match_poll_input to apply keys and button clicks made on the page."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
