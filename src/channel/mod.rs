//! Request/response messaging between the control side and a page
//!
//! The control side never touches a page's state directly: it sends a typed
//! [`PageRequest`] over a [`PageChannel`] and waits for the [`PageResponse`].
//! A [`PageHost`] owns one navigator and answers requests in arrival order.

pub mod host;
pub mod protocol;

pub use host::{LocalPageChannel, PageHost};
pub use protocol::{PageRequest, PageResponse};

use crate::error::Result;
use async_trait::async_trait;

/// Sends requests to one page
#[async_trait]
pub trait PageChannel: Send + Sync {
    /// Deliver a request and wait for the page's reply
    async fn send(&self, request: PageRequest) -> Result<PageResponse>;
}
