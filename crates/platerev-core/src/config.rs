use std::path::PathBuf;

use crate::app_config::{AppConfig, OutputMode};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any configured value is invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if any configured value is invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
///
/// Every variable has a default; nothing is required for a run against a
/// local chromedriver with `restaurants.csv` in the working directory.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u8 = |var: &str, default: &str| -> Result<u8, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u8>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected true/false, got \"{other}\""),
            }),
        }
    };

    let webdriver_url = or_default("PLATEREV_WEBDRIVER_URL", "http://localhost:9515");
    let headless = parse_bool("PLATEREV_HEADLESS", "true")?;
    let log_level = or_default("PLATEREV_LOG_LEVEL", "info");
    let restaurants_path =
        PathBuf::from(or_default("PLATEREV_RESTAURANTS_PATH", "./restaurants.csv"));
    let out_dir = PathBuf::from(or_default("PLATEREV_OUT_DIR", "./reviews"));

    let debug_verbosity = parse_u8("PLATEREV_DEBUG", "0")?;
    if debug_verbosity > 1 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PLATEREV_DEBUG".to_string(),
            reason: format!("expected 0 or 1, got {debug_verbosity}"),
        });
    }

    let output_mode = parse_output_mode(&or_default("PLATEREV_OUTPUT_MODE", "full"))?;

    let page_settle_secs = parse_u64("PLATEREV_PAGE_SETTLE_SECS", "3")?;
    let toggle_timeout_secs = parse_u64("PLATEREV_TOGGLE_TIMEOUT_SECS", "5")?;
    let panel_timeout_secs = parse_u64("PLATEREV_PANEL_TIMEOUT_SECS", "10")?;
    let scroll_settle_ms = parse_u64("PLATEREV_SCROLL_SETTLE_MS", "1000")?;
    let max_scroll_attempts = parse_u32("PLATEREV_MAX_SCROLL_ATTEMPTS", "30")?;
    let max_reviews = parse_usize("PLATEREV_MAX_REVIEWS", "200")?;

    Ok(AppConfig {
        webdriver_url,
        headless,
        log_level,
        restaurants_path,
        out_dir,
        debug_verbosity,
        output_mode,
        page_settle_secs,
        toggle_timeout_secs,
        panel_timeout_secs,
        scroll_settle_ms,
        max_scroll_attempts,
        max_reviews,
    })
}

/// Parse a string into an `OutputMode` variant.
fn parse_output_mode(s: &str) -> Result<OutputMode, ConfigError> {
    match s {
        "full" => Ok(OutputMode::Full),
        "ratings-only" => Ok(OutputMode::RatingsOnly),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PLATEREV_OUTPUT_MODE".to_string(),
            reason: format!("expected \"full\" or \"ratings-only\", got \"{other}\""),
        }),
    }
}
