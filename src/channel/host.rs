use crate::channel::{PageChannel, PageRequest, PageResponse};
use crate::error::{CaseFinderError, Result};
use crate::matcher::Navigator;
use crate::summary::collect_summary;
use crate::surface::{KeyEvent, PageSurface};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Requests a host buffers before senders have to wait
const INBOX_CAPACITY: usize = 32;

struct Envelope {
    request: PageRequest,
    reply: oneshot::Sender<PageResponse>,
}

/// Page-side message loop owning one navigator
pub struct PageHost<S: PageSurface> {
    navigator: Navigator<S>,
    inbox: mpsc::Receiver<Envelope>,
}

impl<S: PageSurface + 'static> PageHost<S> {
    /// Start a host task for the navigator and return the channel to reach it
    ///
    /// The task ends once every channel clone is dropped.
    pub fn spawn(navigator: Navigator<S>) -> (LocalPageChannel, JoinHandle<()>) {
        let (tx, inbox) = mpsc::channel(INBOX_CAPACITY);
        let host = Self { navigator, inbox };
        let handle = tokio::spawn(host.run());
        (LocalPageChannel { tx }, handle)
    }

    async fn run(self) {
        let Self { mut navigator, mut inbox } = self;

        while let Some(Envelope { request, reply }) = inbox.recv().await {
            let action = request.action();

            // Surface calls block on the browser round-trip
            let handled = tokio::task::spawn_blocking(move || {
                let response = handle_request(&mut navigator, request);
                (navigator, response)
            })
            .await;

            let response = match handled {
                Ok((returned, response)) => {
                    navigator = returned;
                    response
                }
                Err(e) => {
                    log::error!("Page host stopped while handling '{}': {}", action, e);
                    return;
                }
            };

            if reply.send(response).is_err() {
                log::debug!("Sender of '{}' went away before the reply", action);
            }
        }
        log::debug!("Page host stopped: all channels closed");
    }
}

/// Apply one request to a navigator
pub fn handle_request<S: PageSurface>(navigator: &mut Navigator<S>, request: PageRequest) -> PageResponse {
    log::debug!("Page received '{}'", request.action());

    let status = match request {
        PageRequest::SearchCases {
            cases,
            current_match_index,
        } => navigator.search(&cases, current_match_index),
        PageRequest::UpdateCases { cases } => {
            navigator.reset();
            navigator.search(&cases, None)
        }
        PageRequest::NavigateToCase { case_number } => navigator.navigate_to_case(&case_number),
        PageRequest::NextMatch => navigator.next(),
        PageRequest::PreviousMatch => navigator.previous(),
        PageRequest::KeyDown { key, shift } => {
            let event = KeyEvent { key, shift };
            navigator.handle_key(&event);
            navigator.status()
        }
        PageRequest::PollInput => navigator.pump_input(),
        PageRequest::Summarize { cases } => {
            let rows = match navigator.surface_mut().scan_rows() {
                Ok(rows) => rows,
                Err(e) => {
                    log::warn!("Failed to read page rows for summary: {}", e);
                    Vec::new()
                }
            };
            return PageResponse::Summary {
                rows: collect_summary(&rows, &cases),
            };
        }
    };

    PageResponse::Matches(status)
}

/// In-process channel to a [`PageHost`]
#[derive(Clone)]
pub struct LocalPageChannel {
    tx: mpsc::Sender<Envelope>,
}

impl LocalPageChannel {
    /// Whether the host has stopped listening
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[async_trait]
impl PageChannel for LocalPageChannel {
    async fn send(&self, request: PageRequest) -> Result<PageResponse> {
        let (reply, response) = oneshot::channel();
        let action = request.action();

        self.tx
            .send(Envelope { request, reply })
            .await
            .map_err(|_| CaseFinderError::ChannelUnavailable(format!("page is not listening for '{}'", action)))?;

        response
            .await
            .map_err(|_| CaseFinderError::ChannelUnavailable(format!("page dropped '{}' without replying", action)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{RowHandle, RowText};
    use crate::matcher::{MatchStatus, OverlayView};
    use crate::surface::{DocumentSurface, PageInput};
    use std::time::{Duration, Instant};

    /// Document whose row scan blocks like a browser round-trip
    struct SlowSurface(DocumentSurface);

    impl PageSurface for SlowSurface {
        fn scan_rows(&mut self) -> Result<Vec<RowText>> {
            std::thread::sleep(Duration::from_millis(150));
            self.0.scan_rows()
        }

        fn paint_row(&mut self, row: RowHandle, background: &str) -> Result<()> {
            self.0.paint_row(row, background)
        }

        fn scroll_into_view(&mut self, row: RowHandle) -> Result<()> {
            self.0.scroll_into_view(row)
        }

        fn ensure_overlay(&mut self) -> Result<bool> {
            self.0.ensure_overlay()
        }

        fn render_overlay(&mut self, view: &OverlayView) -> Result<()> {
            self.0.render_overlay(view)
        }
    }

    fn cases(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn status(response: PageResponse) -> MatchStatus {
        match response {
            PageResponse::Matches(status) => status,
            other => panic!("Expected matches, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_search_over_channel() {
        let surface = DocumentSurface::with_rows(&["A-1 open", "B-2", "a-1 closed"]);
        let (channel, _task) = PageHost::spawn(Navigator::new(surface));

        let response = channel
            .send(PageRequest::SearchCases {
                cases: cases(&["A-1"]),
                current_match_index: Some(1),
            })
            .await
            .unwrap();

        let status = status(response);
        assert_eq!(status.total, 2);
        assert_eq!(status.current_match_index, 1);
        assert_eq!(status.counter.as_deref(), Some("2/2"));
    }

    #[tokio::test]
    async fn test_navigation_requests() {
        let surface = DocumentSurface::with_rows(&["A-1", "A-1", "A-1"]);
        let (channel, _task) = PageHost::spawn(Navigator::new(surface));

        channel
            .send(PageRequest::UpdateCases { cases: cases(&["A-1"]) })
            .await
            .unwrap();

        let next = status(channel.send(PageRequest::NextMatch).await.unwrap());
        assert_eq!(next.current_match_index, 1);

        let back = status(
            channel
                .send(PageRequest::KeyDown {
                    key: "Enter".to_string(),
                    shift: true,
                })
                .await
                .unwrap(),
        );
        assert_eq!(back.current_match_index, 0);

        let prev = status(channel.send(PageRequest::PreviousMatch).await.unwrap());
        assert_eq!(prev.current_match_index, 2);
    }

    #[tokio::test]
    async fn test_poll_input() {
        let surface = DocumentSurface::with_rows(&["A-1", "A-1"]);
        let page = surface.clone();
        let (channel, _task) = PageHost::spawn(Navigator::new(surface));

        channel
            .send(PageRequest::SearchCases {
                cases: cases(&["A-1"]),
                current_match_index: None,
            })
            .await
            .unwrap();

        page.push_input(PageInput::Previous);
        let polled = status(channel.send(PageRequest::PollInput).await.unwrap());
        assert_eq!(polled.current_match_index, 1);
    }

    #[tokio::test]
    async fn test_summarize() {
        let surface = DocumentSurface::with_rows(&["A-1", "B-2"]);
        let (channel, _task) = PageHost::spawn(Navigator::new(surface));

        let response = channel
            .send(PageRequest::Summarize { cases: cases(&["b-2"]) })
            .await
            .unwrap();

        match response {
            PageResponse::Summary { rows } => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].cells, vec!["B-2"]);
            }
            other => panic!("Expected summary, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_slow_page_does_not_stall_runtime() {
        let surface = SlowSurface(DocumentSurface::with_rows(&["A-1"]));
        let (channel, _task) = PageHost::spawn(Navigator::new(surface));

        let started = Instant::now();
        let search = channel.send(PageRequest::SearchCases {
            cases: cases(&["A-1"]),
            current_match_index: None,
        });
        let timer = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Instant::now()
        };

        let (response, fired_at) = tokio::join!(search, timer);
        assert!(fired_at.duration_since(started) < Duration::from_millis(120));
        assert_eq!(status(response.unwrap()).total, 1);
    }

    #[tokio::test]
    async fn test_closed_host_is_unavailable() {
        let surface = DocumentSurface::with_rows(&["A-1"]);
        let (channel, task) = PageHost::spawn(Navigator::new(surface));
        task.abort();
        let _ = task.await;

        assert!(channel.is_closed());
        let err = channel.send(PageRequest::NextMatch).await.unwrap_err();
        assert!(matches!(err, CaseFinderError::ChannelUnavailable(_)));
    }
}
