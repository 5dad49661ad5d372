use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod restaurants;

pub use app_config::{AppConfig, OutputMode};
pub use config::{load_app_config, load_app_config_from_env};
pub use restaurants::{load_restaurants, RestaurantConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read restaurants file {path}: {source}")]
    RestaurantsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse restaurants file: {0}")]
    RestaurantsFileParse(#[from] csv::Error),

    #[error("restaurants file validation failed: {0}")]
    Validation(String),
}

/// Shorten a diagnostic string to `max` characters, appending `...` when
/// truncated. Listing URLs and review text routinely run to hundreds of
/// characters; log lines keep only a recognizable prefix unless full debug
/// output is configured.
#[must_use]
pub fn shorten(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_owned();
    }
    let prefix: String = s.chars().take(max).collect();
    format!("{prefix}...")
}
