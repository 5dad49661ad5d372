//! Sequential per-location scrape driver.

use anyhow::Context;

use platerev_core::RestaurantConfig;
use platerev_scraper::{
    debug_screenshot, harvest_location, Browser, HarvestConfig, ScraperError,
};

use crate::output::ReviewWriter;

/// Outcome of one location's pass: how many records were written and, for
/// failed passes, what went wrong.
pub(crate) enum LocationOutcome {
    Ok { written: usize },
    Failed { written: usize, error: ScraperError },
}

pub(crate) struct RunTotals {
    pub locations: usize,
    pub reviews: usize,
    pub failed: usize,
}

/// Scrape every restaurant in order with the single browser session.
///
/// Strictly sequential: the session is exclusively owned and one location
/// completes (or fails) before the next begins. A fatal-class error aborts
/// the run; anything else writes whatever was collected and moves on.
pub(crate) async fn run_scrape<B: Browser + Send>(
    browser: &mut B,
    restaurants: &[RestaurantConfig],
    harvest: &HarvestConfig,
    writer: &ReviewWriter,
) -> anyhow::Result<RunTotals> {
    let mut totals = RunTotals {
        locations: 0,
        reviews: 0,
        failed: 0,
    };

    for restaurant in restaurants {
        let slug = restaurant.slug();
        tracing::info!(restaurant = %slug, "scraping location");

        totals.locations += 1;
        match scrape_one(browser, restaurant, harvest, writer).await? {
            LocationOutcome::Ok { written } => {
                totals.reviews += written;
                tracing::info!(restaurant = %slug, reviews = written, "location complete");
            }
            LocationOutcome::Failed { written, error } => {
                totals.reviews += written;
                totals.failed += 1;
                tracing::warn!(
                    restaurant = %slug,
                    reviews = written,
                    error = %error,
                    "location failed; continuing with next"
                );
            }
        }
    }

    Ok(totals)
}

async fn scrape_one<B: Browser + Send>(
    browser: &mut B,
    restaurant: &RestaurantConfig,
    harvest: &HarvestConfig,
    writer: &ReviewWriter,
) -> anyhow::Result<LocationOutcome> {
    let mut reviews = Vec::new();
    match harvest_location(browser, &restaurant.url, &mut reviews, harvest).await {
        Ok(()) => {
            let written = writer.write_location(&restaurant.slug(), &reviews)?;
            Ok(LocationOutcome::Ok { written })
        }
        Err(error) if error.is_fatal() => {
            // The locator's abort policy already captured a screenshot.
            Err(error).with_context(|| {
                format!("mandatory element missing while scraping '{}'", restaurant.name)
            })
        }
        Err(error) => {
            if !matches!(error, ScraperError::PanelTimeout { .. }) {
                // Panel timeouts screenshot at their point of failure;
                // anything else is unexpected and captured here.
                debug_screenshot(browser, "scrape_location").await;
            }
            let written = writer.write_location(&restaurant.slug(), &reviews)?;
            Ok(LocationOutcome::Failed { written, error })
        }
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
