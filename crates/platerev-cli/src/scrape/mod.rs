//! Scrape command handler.
//!
//! Per-location failures are logged and skipped rather than propagated so a
//! single bad listing does not abort the full run; only a missing reviews
//! toggle (or a session that cannot be created) is fatal.

mod runner;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;

use platerev_core::{AppConfig, OutputMode, RestaurantConfig};
use platerev_scraper::{Browser, HarvestConfig, WebDriverSession};

use crate::output::ReviewWriter;

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    /// Override the restaurant list path from configuration
    #[arg(long)]
    pub restaurants: Option<PathBuf>,

    /// Override the output directory from configuration
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Restrict the run to a specific restaurant (by slug)
    #[arg(long)]
    pub restaurant: Option<String>,

    /// Cap the number of reviews collected per location
    #[arg(long)]
    pub max_reviews: Option<usize>,

    /// Write ratings maps only, dropping description text
    #[arg(long)]
    pub ratings_only: bool,

    /// Preview what would be scraped without driving a browser
    #[arg(long)]
    pub dry_run: bool,
}

/// Scrape reviews for every configured restaurant, one location at a time.
///
/// # Errors
///
/// Returns an error if the restaurant filter resolves to nothing, the
/// WebDriver session cannot be created, a mandatory element is missing
/// (fatal class), or every configured location fails.
pub async fn run(config: &AppConfig, args: ScrapeArgs) -> anyhow::Result<()> {
    let list_path = args
        .restaurants
        .unwrap_or_else(|| config.restaurants_path.clone());
    let restaurants = load_restaurants_for_scrape(&list_path, args.restaurant.as_deref())?;

    if args.dry_run {
        for restaurant in &restaurants {
            println!(
                "would scrape {} ({})",
                restaurant.slug(),
                platerev_core::shorten(&restaurant.url, 70)
            );
        }
        println!("{} restaurants would be scraped", restaurants.len());
        return Ok(());
    }

    let out_dir = args.out.unwrap_or_else(|| config.out_dir.clone());
    let mode = if args.ratings_only {
        OutputMode::RatingsOnly
    } else {
        config.output_mode
    };
    let writer = ReviewWriter::new(out_dir, mode)?;

    let harvest = build_harvest_config(config, args.max_reviews);

    let mut session = WebDriverSession::connect(&config.webdriver_url, config.headless).await?;
    let result = runner::run_scrape(&mut session, &restaurants, &harvest, &writer).await;

    if let Err(e) = session.close().await {
        tracing::warn!(error = %e, "failed to close WebDriver session cleanly");
    }

    let totals = result?;
    tracing::info!(
        locations = totals.locations,
        reviews = totals.reviews,
        failed = totals.failed,
        "scrape run complete"
    );

    if totals.failed == totals.locations && totals.locations > 0 {
        anyhow::bail!("all {} locations failed to scrape", totals.locations);
    }

    Ok(())
}

/// Load the restaurants to process for a scrape run.
///
/// If `filter` is `Some(slug)`, restricts the run to that restaurant and
/// returns an error when no configured restaurant matches. If `None`,
/// returns the full configured list.
fn load_restaurants_for_scrape(
    path: &Path,
    filter: Option<&str>,
) -> anyhow::Result<Vec<RestaurantConfig>> {
    let all = platerev_core::load_restaurants(path)?;
    match filter {
        Some(slug) => {
            let matching: Vec<RestaurantConfig> =
                all.into_iter().filter(|r| r.slug() == slug).collect();
            if matching.is_empty() {
                anyhow::bail!("restaurant '{slug}' not found in {}", path.display());
            }
            Ok(matching)
        }
        None => Ok(all),
    }
}

fn build_harvest_config(config: &AppConfig, max_reviews_override: Option<usize>) -> HarvestConfig {
    HarvestConfig {
        page_settle: Duration::from_secs(config.page_settle_secs),
        toggle_timeout: Duration::from_secs(config.toggle_timeout_secs),
        panel_timeout: Duration::from_secs(config.panel_timeout_secs),
        scroll_settle: Duration::from_millis(config.scroll_settle_ms),
        max_scroll_attempts: config.max_scroll_attempts,
        max_reviews: max_reviews_override.unwrap_or(config.max_reviews),
        full_debug: config.debug_verbosity == 1,
    }
}
