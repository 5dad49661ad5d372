//! CSS selectors for the listing page's reviews view.
//!
//! The panel and fragment selectors match generated utility class names
//! observed on live listing pages; they are exact-attribute matches
//! (including trailing spaces) because the site reuses the individual
//! class tokens on unrelated containers. When the site ships a new
//! front-end build these are the first thing to break.

/// Control that switches a listing page into its expanded reviews view.
pub const REVIEWS_TOGGLE: &str = r#"button[jsaction*="reviewChart"]"#;

/// Scrollable container holding the review fragments, lazy-loaded on scroll.
pub const REVIEWS_PANEL: &str = r#"div[class="m6QErb DxyBCb kA9KIf dS8AEf XiKgde "]"#;

/// One self-contained review entry within the panel.
pub const REVIEW_FRAGMENT: &str = r#"div[class="jftiEf fontBodyMedium "]"#;

/// Per-fragment disclosure control expanding truncated review text.
pub const MORE_BUTTON: &str = r#"button[class="w8nwRe kyuRq"]"#;

/// Primary free-text snippet of a review.
pub const DESCRIPTION: &str = r#"span[class="wiI7pd"]"#;

/// Detail container revealed by the disclosure control.
pub const DETAIL_CONTAINER: &str = r#"div[jslog="127691"]"#;

/// One labeled rating field inside the detail container.
pub const DETAIL_FIELD: &str = "div[jslog]";

/// Label/value sub-elements of a rating field.
pub const FIELD_VALUE: &str = r#"span[class="RfDO5c"]"#;
