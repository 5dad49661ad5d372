//! Browser-driven review harvesting for restaurant listing pages.
//!
//! The scrape runs against a live mapping site through a WebDriver session:
//! open the listing, switch to the reviews view, scroll the lazy-loading
//! panel until it stops growing, and turn each rendered review fragment into
//! a typed [`Review`] record. The [`Browser`] trait is the seam between the
//! harvesting logic and the real session, so everything above it can be
//! exercised against an in-memory fake.

pub mod browser;
pub mod error;
pub mod extract;
pub mod harvest;
pub mod locator;
pub mod selectors;
pub mod session;
pub mod types;

pub use browser::Browser;
pub use error::ScraperError;
pub use extract::parse_rating_field;
pub use harvest::{harvest_location, HarvestConfig};
pub use locator::{debug_screenshot, locate, locate_all, LocateOpts, OnFailure};
pub use session::WebDriverSession;
pub use types::{RatingValue, Review};
