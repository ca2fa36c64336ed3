use crate::channel::{PageChannel, PageRequest, PageResponse};
use crate::error::{CaseFinderError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// Serializes messages from one control context to its page
///
/// Only one request is in flight at a time. A queued `updateCases` is
/// dropped when a newer one was issued behind it, so the page never
/// processes a stale case list after a fresh one.
pub struct UpdateDispatcher {
    channel: Option<Arc<dyn PageChannel>>,
    gate: Mutex<()>,
    latest_update: AtomicU64,
}

impl UpdateDispatcher {
    /// Dispatcher for the given page, or for no page at all
    pub fn new(channel: Option<Arc<dyn PageChannel>>) -> Self {
        Self {
            channel,
            gate: Mutex::new(()),
            latest_update: AtomicU64::new(0),
        }
    }

    /// Dispatcher with no page to talk to
    pub fn detached() -> Self {
        Self::new(None)
    }

    pub fn has_page(&self) -> bool {
        self.channel.is_some()
    }

    /// Send a request after every earlier one has been answered
    ///
    /// Returns `Ok(None)` when the request was superseded while queued.
    pub async fn dispatch(&self, request: PageRequest) -> Result<Option<PageResponse>> {
        let channel = self.channel.as_ref().ok_or(CaseFinderError::NoActiveSurface)?;

        let ticket = if request.is_superseded_by_newer() {
            Some(self.latest_update.fetch_add(1, Ordering::SeqCst) + 1)
        } else {
            None
        };

        let _guard = self.gate.lock().await;

        if let Some(ticket) = ticket {
            let latest = self.latest_update.load(Ordering::SeqCst);
            if latest != ticket {
                log::debug!("Dropping '{}' #{}: superseded by #{}", request.action(), ticket, latest);
                return Ok(None);
            }
        }

        channel.send(request).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingChannel {
        seen: StdMutex<Vec<PageRequest>>,
    }

    #[async_trait]
    impl PageChannel for RecordingChannel {
        async fn send(&self, request: PageRequest) -> Result<PageResponse> {
            self.seen.lock().unwrap().push(request);
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok(PageResponse::Summary { rows: vec![] })
        }
    }

    fn update(cases: &[&str]) -> PageRequest {
        PageRequest::UpdateCases {
            cases: cases.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_detached_has_no_surface() {
        let dispatcher = UpdateDispatcher::detached();
        assert!(!dispatcher.has_page());

        let err = dispatcher.dispatch(PageRequest::NextMatch).await.unwrap_err();
        assert!(matches!(err, CaseFinderError::NoActiveSurface));
    }

    #[tokio::test]
    async fn test_stale_updates_are_coalesced() {
        let channel = Arc::new(RecordingChannel::default());
        let dispatcher = UpdateDispatcher::new(Some(channel.clone()));

        let (first, second, third) = tokio::join!(
            dispatcher.dispatch(update(&["A"])),
            dispatcher.dispatch(update(&["B", "A"])),
            dispatcher.dispatch(update(&["C", "B", "A"])),
        );

        assert!(first.unwrap().is_some());
        assert!(second.unwrap().is_none());
        assert!(third.unwrap().is_some());

        let seen = channel.seen.lock().unwrap();
        assert_eq!(*seen, vec![update(&["A"]), update(&["C", "B", "A"])]);
    }

    #[tokio::test]
    async fn test_other_requests_are_never_dropped() {
        let channel = Arc::new(RecordingChannel::default());
        let dispatcher = UpdateDispatcher::new(Some(channel.clone()));

        let (a, b) = tokio::join!(
            dispatcher.dispatch(PageRequest::NextMatch),
            dispatcher.dispatch(PageRequest::NextMatch),
        );

        assert!(a.unwrap().is_some());
        assert!(b.unwrap().is_some());
        assert_eq!(channel.seen.lock().unwrap().len(), 2);
    }
}
