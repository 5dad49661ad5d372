use std::path::PathBuf;

/// How per-location review files are serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Flattened records: description plus every rating category.
    Full,
    /// Ratings maps only, no description text.
    RatingsOnly,
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputMode::Full => write!(f, "full"),
            OutputMode::RatingsOnly => write!(f, "ratings-only"),
        }
    }
}

/// Runtime configuration, built once at startup from environment variables
/// and passed by reference everywhere. No process-wide mutable state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// WebDriver endpoint the browser session connects to.
    pub webdriver_url: String,
    /// Launch the browser without a visible window.
    pub headless: bool,
    pub log_level: String,
    /// Path to the CSV listing `name,url` per restaurant.
    pub restaurants_path: PathBuf,
    /// Directory receiving per-location JSON files and the count summary.
    pub out_dir: PathBuf,
    /// 0 = shortened diagnostic strings, 1 = full.
    pub debug_verbosity: u8,
    pub output_mode: OutputMode,
    /// Fixed settle delay after navigation and after opening the reviews view.
    pub page_settle_secs: u64,
    /// Polling window for the reviews toggle (mandatory element).
    pub toggle_timeout_secs: u64,
    /// Polling window for the reviews panel.
    pub panel_timeout_secs: u64,
    /// Fixed delay after each scroll, letting lazy content render.
    pub scroll_settle_ms: u64,
    pub max_scroll_attempts: u32,
    pub max_reviews: usize,
}
