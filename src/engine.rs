//! Engine seam between the flow core and the browser automation client
//!
//! The resolver, actionability waiter, and action executor only ever talk to
//! these two traits. The fantoccini-backed implementation lives in
//! [`crate::session`]; tests substitute scripted mocks.

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

use crate::locator::Descriptor;

/// Read-only probe of the live document
#[async_trait]
pub trait DomProbe: Send + Sync {
    /// Try to locate one element matching `descriptor` within `timeout`.
    ///
    /// `Ok(None)` means the probe completed (or timed out) without a match;
    /// `Err` means the engine itself failed. Probing must not mutate the page.
    async fn probe(
        &self,
        descriptor: &Descriptor,
        timeout: Duration,
    ) -> Result<Option<Box<dyn ElementHandle>>>;
}

/// Page-level navigation, kept separate so the flow driver stays mockable
#[async_trait]
pub trait PageNavigator: Send + Sync {
    async fn goto(&self, url: &str) -> Result<()>;
}

/// Live reference to a resolved element
///
/// Valid until the page navigates or the element detaches; never held across
/// steps.
#[async_trait]
pub trait ElementHandle: Send + Sync {
    /// Short description of how this element was found, for logs and errors
    fn describe(&self) -> String;

    async fn attr(&self, name: &str) -> Result<Option<String>>;

    async fn is_displayed(&self) -> Result<bool>;

    async fn tag_name(&self) -> Result<String>;

    async fn click(&self) -> Result<()>;

    async fn clear(&self) -> Result<()>;

    async fn send_keys(&self, text: &str) -> Result<()>;

    /// Bind a local file to a file-input element
    async fn attach_file(&self, path: &Path) -> Result<()>;
}
