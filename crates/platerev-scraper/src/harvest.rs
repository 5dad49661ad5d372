//! The scroll-harvest loop: drive one location's reviews panel until it
//! stops growing, extracting every newly rendered fragment along the way.

use std::collections::HashSet;
use std::time::Duration;

use tokio::time::sleep;

use platerev_core::shorten;

use crate::browser::Browser;
use crate::error::ScraperError;
use crate::extract::extract_review;
use crate::locator::{debug_screenshot, locate, LocateOpts, OnFailure};
use crate::selectors;
use crate::types::Review;

/// Tunables for one location's harvest pass.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Fixed settle delay after navigation and after opening the reviews
    /// view.
    pub page_settle: Duration,
    /// Polling window for the reviews toggle. Mandatory: a miss aborts the
    /// whole run.
    pub toggle_timeout: Duration,
    /// Polling window for the reviews panel. A miss aborts this location
    /// only.
    pub panel_timeout: Duration,
    /// Fixed delay after each scroll, letting lazy content render.
    pub scroll_settle: Duration,
    /// Upper bound on scroll iterations; guarantees termination even when
    /// the panel never converges.
    pub max_scroll_attempts: u32,
    /// Stop once this many reviews are collected.
    pub max_reviews: usize,
    /// Log collected reviews with full descriptions instead of shortened
    /// ones (debug verbosity 1).
    pub full_debug: bool,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            page_settle: Duration::from_secs(3),
            toggle_timeout: Duration::from_secs(5),
            panel_timeout: Duration::from_secs(10),
            scroll_settle: Duration::from_secs(1),
            max_scroll_attempts: 30,
            max_reviews: 200,
            full_debug: false,
        }
    }
}

/// Scrape one location's reviews into `reviews`.
///
/// Collected records accumulate in the out-param rather than a return value
/// so the caller keeps whatever was harvested before an error; partial
/// results are written out at the per-location boundary.
///
/// Every fragment is keyed into a seen-set by handle id to avoid
/// re-extracting between iterations, but record identity is structural: a
/// fragment re-rendered under a fresh handle that parses to an
/// already-collected record is dropped.
///
/// # Errors
///
/// - [`ScraperError::MandatoryElementMissing`] — the reviews toggle never
///   appeared (fatal class; diagnostic screenshot already captured).
/// - [`ScraperError::PanelTimeout`] — the reviews panel never appeared
///   (this location only; diagnostic screenshot captured).
/// - Any browser transport error from the underlying session.
pub async fn harvest_location<B: Browser + Send>(
    browser: &mut B,
    url: &str,
    reviews: &mut Vec<Review>,
    config: &HarvestConfig,
) -> Result<(), ScraperError> {
    tracing::info!(url = %shorten(url, 60), "navigating to listing page");
    tracing::debug!(%url, "full listing url");
    browser.navigate(url).await?;
    sleep(config.page_settle).await;

    tracing::debug!("locating reviews toggle");
    let toggle = locate(
        browser,
        None,
        selectors::REVIEWS_TOGGLE,
        &LocateOpts::within(config.toggle_timeout, OnFailure::Abort),
    )
    .await?
    .ok_or_else(|| ScraperError::MandatoryElementMissing {
        selector: selectors::REVIEWS_TOGGLE.to_owned(),
    })?;

    browser.click(&toggle).await?;
    tracing::debug!("opened reviews view");
    sleep(config.page_settle).await;

    let Some(panel) = locate(
        browser,
        None,
        selectors::REVIEWS_PANEL,
        &LocateOpts::within(config.panel_timeout, OnFailure::Log),
    )
    .await?
    else {
        debug_screenshot(browser, "reviews_panel").await;
        return Err(ScraperError::PanelTimeout {
            url: url.to_owned(),
            timeout_secs: config.panel_timeout.as_secs(),
        });
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut last_height = browser.scroll_height(&panel).await?;
    let mut attempts = 0u32;

    while reviews.len() < config.max_reviews && attempts < config.max_scroll_attempts {
        attempts += 1;
        tracing::debug!(
            attempt = attempts,
            collected = reviews.len(),
            "scrolling reviews panel"
        );

        browser.scroll_to_bottom(&panel).await?;
        sleep(config.scroll_settle).await;

        let fragments = browser.find_all(None, selectors::REVIEW_FRAGMENT).await?;
        for fragment in &fragments {
            if !seen.insert(browser.id_of(fragment)) {
                continue;
            }
            let review = extract_review(browser, fragment).await?;
            // A re-render may mint a fresh handle for a review already
            // collected; content equality decides, not handle identity.
            if !reviews.contains(&review) {
                tracing::debug!(review = %review.summary(config.full_debug), "collected review");
                reviews.push(review);
            }
        }

        let height = browser.scroll_height(&panel).await?;
        if height == last_height {
            tracing::debug!(attempts, "reviews panel stopped growing");
            break;
        }
        last_height = height;
    }

    reviews.truncate(config.max_reviews);
    Ok(())
}
