//! Element lookup with a bounded polling window and an explicit failure
//! policy.
//!
//! A lookup either succeeds within its window or runs the miss policy; there
//! are no retries beyond the window. Whether absence is fatal is decided
//! here by policy, not by exception handling at the call site.

use std::path::PathBuf;
use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::browser::Browser;
use crate::error::ScraperError;

/// Delay between lookup attempts while a polling window is open.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// What to do when the polling window closes without a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    /// Return the empty result silently.
    Ignore,
    /// Return the empty result after a debug log line.
    Log,
    /// Capture a diagnostic screenshot and fail with
    /// [`ScraperError::MandatoryElementMissing`]. For selectors the scrape
    /// cannot proceed without.
    Abort,
}

/// Fixed lookup options, passed by reference.
#[derive(Debug, Clone)]
pub struct LocateOpts {
    /// Zero means a single immediate lookup; anything else polls every
    /// [`POLL_INTERVAL`] until the deadline.
    pub timeout: Duration,
    pub on_failure: OnFailure,
}

impl LocateOpts {
    /// A single immediate lookup with the given miss policy.
    #[must_use]
    pub fn immediate(on_failure: OnFailure) -> Self {
        Self {
            timeout: Duration::ZERO,
            on_failure,
        }
    }

    /// A polling lookup bounded by `timeout`.
    #[must_use]
    pub fn within(timeout: Duration, on_failure: OnFailure) -> Self {
        Self {
            timeout,
            on_failure,
        }
    }
}

/// Locate the first element matching `selector`, scoped to `root` when given.
///
/// # Errors
///
/// Propagates browser errors, and returns
/// [`ScraperError::MandatoryElementMissing`] on a miss under
/// [`OnFailure::Abort`]; under the other policies a miss is `Ok(None)`.
pub async fn locate<B: Browser + Send>(
    browser: &mut B,
    root: Option<&B::Handle>,
    selector: &str,
    opts: &LocateOpts,
) -> Result<Option<B::Handle>, ScraperError> {
    let deadline = Instant::now() + opts.timeout;
    loop {
        if let Some(element) = browser.find(root, selector).await? {
            return Ok(Some(element));
        }
        if Instant::now() >= deadline {
            break;
        }
        sleep(POLL_INTERVAL).await;
    }
    on_miss(browser, selector, opts.on_failure).await?;
    Ok(None)
}

/// Locate all elements matching `selector`, scoped to `root` when given.
///
/// The polling window waits for the first non-empty result; an empty result
/// at the deadline runs the miss policy.
///
/// # Errors
///
/// Same contract as [`locate`].
pub async fn locate_all<B: Browser + Send>(
    browser: &mut B,
    root: Option<&B::Handle>,
    selector: &str,
    opts: &LocateOpts,
) -> Result<Vec<B::Handle>, ScraperError> {
    let deadline = Instant::now() + opts.timeout;
    loop {
        let elements = browser.find_all(root, selector).await?;
        if !elements.is_empty() {
            return Ok(elements);
        }
        if Instant::now() >= deadline {
            break;
        }
        sleep(POLL_INTERVAL).await;
    }
    on_miss(browser, selector, opts.on_failure).await?;
    Ok(Vec::new())
}

async fn on_miss<B: Browser + Send>(
    browser: &mut B,
    selector: &str,
    policy: OnFailure,
) -> Result<(), ScraperError> {
    match policy {
        OnFailure::Ignore => Ok(()),
        OnFailure::Log => {
            tracing::debug!(selector, "element not found within its polling window");
            Ok(())
        }
        OnFailure::Abort => {
            tracing::error!(selector, "mandatory element not found");
            debug_screenshot(browser, "locate").await;
            Err(ScraperError::MandatoryElementMissing {
                selector: selector.to_owned(),
            })
        }
    }
}

/// Best-effort diagnostic screenshot at a fixed per-context path.
/// Failures are logged, never propagated: the screenshot is forensic,
/// not load-bearing.
pub async fn debug_screenshot<B: Browser + Send>(browser: &mut B, context: &str) {
    let path = PathBuf::from(format!("debug_{context}.png"));
    match browser.screenshot(&path).await {
        Ok(()) => {
            tracing::info!(path = %path.display(), "captured diagnostic screenshot");
        }
        Err(e) => {
            tracing::warn!(context, error = %e, "failed to capture diagnostic screenshot");
        }
    }
}
