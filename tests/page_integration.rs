use case_finder::browser::html_data_url;
use case_finder::matcher::HighlightStyle;
use case_finder::storage::SharedStore;
use case_finder::surface::PageSurface;
use case_finder::{BrowserSession, LaunchOptions, ListManager, MemoryStore, Navigator, TabSurface, UpdateDispatcher};
use std::sync::Arc;

const DOCKET_HTML: &str = r#"<html><body>
<table>
  <tr><td>A-100-2024</td><td>Smith</td><td>filed</td></tr>
  <tr><td>B-200-2024</td><td>Jones</td><td>heard</td></tr>
  <tr><td>a-100-2024</td><td>Smith</td><td>appeal</td></tr>
</table>
</body></html>"#;

fn open_docket() -> BrowserSession {
    let session = BrowserSession::launch(LaunchOptions::new().headless(true)).expect("Failed to launch browser");
    session.navigate(&html_data_url(DOCKET_HTML)).expect("Failed to navigate");
    session
}

fn row_background(surface: &TabSurface, index: usize) -> String {
    let js = format!(
        "document.querySelector('tr[data-case-finder-row=\"{}\"]').style.backgroundColor",
        index
    );
    let value = surface.tab().evaluate(&js, false).expect("Failed to read row style").value;
    value.and_then(|v| v.as_str().map(str::to_string)).unwrap_or_default()
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_scan_rows_reads_cells() {
    let session = open_docket();
    let mut surface = TabSurface::new(session.get_active_tab().unwrap());

    let rows = surface.scan_rows().expect("Failed to scan rows");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].cells, vec!["B-200-2024", "Jones", "heard"]);
    assert!(rows[0].text.contains("A-100-2024"));
}

#[test]
#[ignore]
fn test_search_highlights_rows_in_tab() {
    let session = open_docket();
    let surface = TabSurface::new(session.get_active_tab().unwrap());
    let mut navigator = Navigator::new(surface);

    let status = navigator.search(&["A-100-2024".to_string()], None);
    assert_eq!(status.total, 2);
    assert_eq!(status.counter.as_deref(), Some("1/2"));

    assert_eq!(row_background(navigator.surface(), 0), "orange");
    assert_eq!(row_background(navigator.surface(), 1), "");
    assert_eq!(row_background(navigator.surface(), 2), "yellow");

    navigator.next();
    assert_eq!(row_background(navigator.surface(), 2), "orange");

    let counter = navigator
        .surface()
        .tab()
        .evaluate("document.getElementById('caseFinder-matchCounter').innerText", false)
        .unwrap()
        .value;
    assert_eq!(counter.and_then(|v| v.as_str().map(str::to_string)).as_deref(), Some("2/2"));
}

#[test]
#[ignore]
fn test_overlay_buttons_queue_input() {
    let session = open_docket();
    let surface = TabSurface::new(session.get_active_tab().unwrap());
    let mut navigator = Navigator::new(surface);
    navigator.search(&["A-100-2024".to_string()], None);

    navigator
        .surface()
        .tab()
        .evaluate("document.getElementById('caseFinder-nextButton').click()", false)
        .expect("Failed to click");

    let status = navigator.pump_input();
    assert_eq!(status.current_match_index, 1);
}

#[tokio::test]
#[ignore]
async fn test_manager_drives_live_page() {
    let session = open_docket();
    let store: SharedStore = Arc::new(MemoryStore::new());
    let (channel, _host) = session
        .attach_active_page(store.clone(), HighlightStyle::default())
        .expect("Failed to attach page");

    let mut manager = ListManager::new(store, Arc::new(UpdateDispatcher::new(Some(Arc::new(channel)))));
    manager.load();
    manager.add("B-200-2024").await.unwrap();

    let status = manager.request_search(None).await.unwrap();
    assert_eq!(status.total, 1);
    assert_eq!(status.current_match_index, 0);
}
