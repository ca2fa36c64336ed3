use crate::{browser::config::{ConnectionOptions, LaunchOptions},
            channel::{LocalPageChannel, PageHost},
            error::{CaseFinderError, Result},
            matcher::{HighlightStyle, Navigator},
            storage::SharedStore,
            summary::DocumentViewer,
            surface::TabSurface};
use base64::Engine;
use headless_chrome::{Browser, Tab};
use std::{ffi::OsStr, sync::Arc, time::Duration};
use tokio::task::JoinHandle;

/// Browser session that manages a Chrome/Chromium instance
pub struct BrowserSession {
    /// The underlying headless_chrome Browser instance
    browser: Browser,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Ignore default arguments to prevent detection by anti-bot services
        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

        // A case search session stays open as long as the user works the page
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));

        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }

        if let Some(dir) = options.user_data_dir {
            launch_opts.user_data_dir = Some(dir);
        }

        launch_opts.sandbox = options.sandbox;

        let browser = Browser::new(launch_opts).map_err(|e| CaseFinderError::LaunchFailed(e.to_string()))?;

        browser
            .new_tab()
            .map_err(|e| CaseFinderError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Self { browser })
    }

    /// Connect to an existing browser instance via WebSocket
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        let idle_timeout = options.idle_timeout();
        let browser = Browser::connect_with_timeout(options.ws_url, idle_timeout)
            .map_err(|e| CaseFinderError::ConnectionFailed(e.to_string()))?;

        Ok(Self { browser })
    }

    /// Get all tabs
    pub fn get_tabs(&self) -> Result<Vec<Arc<Tab>>> {
        let tabs = self
            .browser
            .get_tabs()
            .lock()
            .map_err(|e| CaseFinderError::TabOperationFailed(format!("Failed to get tabs: {}", e)))?
            .clone();

        Ok(tabs)
    }

    /// Get the tab the user is looking at
    ///
    /// Fails with [`CaseFinderError::NoActiveSurface`] when no tab is visible.
    pub fn get_active_tab(&self) -> Result<Arc<Tab>> {
        let tabs = self.get_tabs()?;

        // First pass: visible and focused (strongest signal)
        for tab in &tabs {
            match tab.evaluate("document.visibilityState === 'visible' && document.hasFocus()", false) {
                Ok(remote_object) => {
                    if remote_object.value.and_then(|v| v.as_bool()).unwrap_or(false) {
                        return Ok(tab.clone());
                    }
                }
                Err(e) => {
                    log::debug!("Failed to check tab status: {}", e);
                    continue;
                }
            }
        }

        // Second pass: visible only
        for tab in &tabs {
            if let Ok(remote_object) = tab.evaluate("document.visibilityState === 'visible'", false) {
                if remote_object.value.and_then(|v| v.as_bool()).unwrap_or(false) {
                    return Ok(tab.clone());
                }
            }
        }

        Err(CaseFinderError::NoActiveSurface)
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Navigate the active tab and wait for the page to load
    pub fn navigate(&self, url: &str) -> Result<()> {
        let tab = self.get_active_tab()?;
        tab.navigate_to(url)
            .map_err(|e| CaseFinderError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;
        tab.wait_until_navigated()
            .map_err(|e| CaseFinderError::NavigationFailed(format!("Navigation timeout: {}", e)))?;

        Ok(())
    }

    /// Start a page host on the active tab
    ///
    /// Must be called inside a tokio runtime.
    pub fn attach_active_page(
        &self,
        store: SharedStore,
        style: HighlightStyle,
    ) -> Result<(LocalPageChannel, JoinHandle<()>)> {
        let tab = self.get_active_tab()?;
        let navigator = Navigator::new(TabSurface::new(tab)).with_style(style).with_store(store);
        Ok(PageHost::spawn(navigator))
    }

    /// Close every tab
    pub fn close(&self) -> Result<()> {
        // The browser process itself exits when the Browser is dropped
        let tabs = self.get_tabs()?;
        for tab in tabs {
            if let Err(e) = tab.close(false) {
                log::debug!("Failed to close tab: {}", e);
            }
        }
        Ok(())
    }
}

/// `data:` URL carrying an HTML document
pub fn html_data_url(html: &str) -> String {
    format!(
        "data:text/html;charset=utf-8;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(html)
    )
}

impl DocumentViewer for BrowserSession {
    fn open_document(&self, title: &str, html: &str) -> Result<()> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| CaseFinderError::TabOperationFailed(format!("Failed to create tab: {}", e)))?;

        tab.navigate_to(&html_data_url(html))
            .map_err(|e| CaseFinderError::NavigationFailed(format!("Failed to open '{}': {}", title, e)))?;

        tab.activate()
            .map_err(|e| CaseFinderError::TabOperationFailed(format!("Failed to activate tab: {}", e)))?;

        log::info!("Opened '{}' in a new tab", title);
        Ok(())
    }
}
