//! The narrow interface the harvesting logic drives the browser through.

use std::path::Path;

use async_trait::async_trait;

use crate::error::ScraperError;

/// An automated browser session, reduced to the operations the harvest
/// actually needs: navigation, CSS lookups (optionally scoped to an
/// element), clicks, text extraction, scroll control, and screenshots.
///
/// A missing element is an empty lookup result, never an error; whether
/// absence matters is the caller's decision (see [`crate::locator`]).
/// Everything else that can go wrong surfaces as a [`ScraperError`].
#[async_trait]
pub trait Browser {
    /// Opaque element handle. Handles are ephemeral: a scroll-triggered
    /// re-render may invalidate them or mint fresh ones for the same
    /// on-screen content, so they must never be used as record identity.
    type Handle: Clone + Send + Sync;

    async fn navigate(&mut self, url: &str) -> Result<(), ScraperError>;

    /// First element matching `selector`, scoped to `root` when given.
    async fn find(
        &mut self,
        root: Option<&Self::Handle>,
        selector: &str,
    ) -> Result<Option<Self::Handle>, ScraperError> {
        Ok(self.find_all(root, selector).await?.into_iter().next())
    }

    /// All elements matching `selector`, scoped to `root` when given.
    async fn find_all(
        &mut self,
        root: Option<&Self::Handle>,
        selector: &str,
    ) -> Result<Vec<Self::Handle>, ScraperError>;

    async fn click(&mut self, element: &Self::Handle) -> Result<(), ScraperError>;

    async fn text(&mut self, element: &Self::Handle) -> Result<String, ScraperError>;

    /// Total scrollable height of `element`, the convergence signal for the
    /// scroll-harvest loop.
    async fn scroll_height(&mut self, element: &Self::Handle) -> Result<i64, ScraperError>;

    /// Scroll `element` to its current bottom, triggering lazy loading.
    async fn scroll_to_bottom(&mut self, element: &Self::Handle) -> Result<(), ScraperError>;

    /// Capture a PNG screenshot of the current page to `path`.
    async fn screenshot(&mut self, path: &Path) -> Result<(), ScraperError>;

    /// Stable-for-this-render identity of a handle, used to skip fragments
    /// already extracted during a pass.
    fn id_of(&self, element: &Self::Handle) -> String;

    /// Tear down the underlying session.
    async fn close(self) -> Result<(), ScraperError>
    where
        Self: Sized;
}
