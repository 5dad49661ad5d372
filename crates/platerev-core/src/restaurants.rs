//! Restaurant list input.
//!
//! The scrape targets come from a small CSV file with a `name,url` header
//! row. Names become output filenames via [`RestaurantConfig::slug`], so
//! they must be unique after slugging as well as verbatim.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// One configured scrape target.
#[derive(Debug, Clone, Deserialize)]
pub struct RestaurantConfig {
    /// Display name, e.g. `"Harvey's 11000 Yonge St"`.
    pub name: String,
    /// Full listing-page URL on the mapping site.
    pub url: String,
}

impl RestaurantConfig {
    /// Generate a URL- and filename-safe slug from the restaurant name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// Load and validate the restaurant list from a CSV file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_restaurants(path: &Path) -> Result<Vec<RestaurantConfig>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RestaurantsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut reader = csv::Reader::from_reader(content.as_bytes());

    let mut restaurants = Vec::new();
    for record in reader.deserialize() {
        let restaurant: RestaurantConfig = record?;
        restaurants.push(restaurant);
    }

    validate_restaurants(&restaurants)?;

    Ok(restaurants)
}

fn validate_restaurants(restaurants: &[RestaurantConfig]) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for restaurant in restaurants {
        if restaurant.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "restaurant name must be non-empty".to_string(),
            ));
        }

        if restaurant.url.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "restaurant '{}' has an empty url",
                restaurant.name
            )));
        }

        if !restaurant.url.starts_with("http://") && !restaurant.url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "restaurant '{}' has a non-http(s) url: {}",
                restaurant.name, restaurant.url
            )));
        }

        let lower_name = restaurant.name.to_lowercase();
        if !seen_names.insert(lower_name) {
            return Err(ConfigError::Validation(format!(
                "duplicate restaurant name: '{}'",
                restaurant.name
            )));
        }

        let slug = restaurant.slug();
        if slug.is_empty() {
            return Err(ConfigError::Validation(format!(
                "restaurant '{}' produces an empty slug",
                restaurant.name
            )));
        }
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate restaurant slug: '{}' (from restaurant '{}')",
                slug, restaurant.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "restaurants_test.rs"]
mod tests;
