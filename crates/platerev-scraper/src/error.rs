use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("WebDriver command failed: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),

    #[error("failed to create WebDriver session: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    #[error("failed to encode element reference: {0}")]
    ElementRef(#[from] serde_json::Error),

    #[error("mandatory element not found: {selector}")]
    MandatoryElementMissing { selector: String },

    #[error("reviews panel did not appear within {timeout_secs}s at {url}")]
    PanelTimeout { url: String, timeout_secs: u64 },

    #[error("unexpected script result for \"{script}\": {value}")]
    UnexpectedScriptValue { script: String, value: String },

    #[error("failed to write screenshot {path}: {source}")]
    Screenshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScraperError {
    /// Returns `true` for the error class that aborts the whole run rather
    /// than just the current location.
    ///
    /// Fatal:
    /// - [`ScraperError::MandatoryElementMissing`] — a selector the scrape
    ///   cannot proceed without (the reviews toggle) never appeared.
    /// - [`ScraperError::Session`] — no browser session, nothing to drive.
    ///
    /// Everything else is contained at the per-location boundary: partial
    /// results are written out and the run moves on to the next location.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScraperError::MandatoryElementMissing { .. } | ScraperError::Session(_)
        )
    }
}
