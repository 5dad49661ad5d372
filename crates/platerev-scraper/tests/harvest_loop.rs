//! Scroll-harvest loop behavior against a scripted in-memory browser.
//!
//! The fake models just enough of a listing page for the loop to drive:
//! fragments that appear at a given scroll iteration, a panel whose scroll
//! extent follows a scripted height sequence, and per-fragment detail
//! fields behind a disclosure control. Each test scripts one scenario and
//! asserts one behavior.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use platerev_scraper::selectors;
use platerev_scraper::{
    harvest_location, locate, Browser, HarvestConfig, LocateOpts, OnFailure, RatingValue,
    ScraperError,
};

#[derive(Debug, Clone)]
enum Handle {
    Toggle,
    Panel,
    Fragment(usize),
    MoreButton(usize),
    DetailContainer(usize),
    DetailField { fragment: usize, field: usize },
    FieldValue {
        fragment: usize,
        field: usize,
        index: usize,
    },
    Description(usize),
}

#[derive(Debug, Clone)]
struct FragmentSpec {
    dom_id: String,
    description: Option<String>,
    /// Each inner vec is one detail field's sub-element texts.
    fields: Vec<Vec<String>>,
    /// Visible once the panel has been scrolled at least this many times.
    appears_at: u32,
}

fn fragment(dom_id: &str, description: Option<&str>, fields: &[&[&str]], appears_at: u32) -> FragmentSpec {
    FragmentSpec {
        dom_id: dom_id.to_string(),
        description: description.map(str::to_string),
        fields: fields
            .iter()
            .map(|f| f.iter().map(|s| (*s).to_string()).collect())
            .collect(),
        appears_at,
    }
}

struct FakeBrowser {
    toggle_present: bool,
    panel_present: bool,
    toggle_clicked: bool,
    /// Scroll extent per scroll count; the last entry repeats forever.
    heights: Vec<i64>,
    scrolls: u32,
    fragments: Vec<FragmentSpec>,
    expanded: HashSet<usize>,
    screenshots: Vec<PathBuf>,
    navigations: Vec<String>,
    find_calls: u32,
    /// Inject a script failure at this scroll count's height read.
    fail_height_at_scroll: Option<u32>,
    /// For polling tests: the toggle materializes after this many lookups.
    toggle_appears_after_finds: Option<u32>,
}

impl FakeBrowser {
    fn new(heights: Vec<i64>, fragments: Vec<FragmentSpec>) -> Self {
        Self {
            toggle_present: true,
            panel_present: true,
            toggle_clicked: false,
            heights,
            scrolls: 0,
            fragments,
            expanded: HashSet::new(),
            screenshots: Vec::new(),
            navigations: Vec::new(),
            find_calls: 0,
            fail_height_at_scroll: None,
            toggle_appears_after_finds: None,
        }
    }

    fn current_height(&self) -> i64 {
        let index = (self.scrolls as usize).min(self.heights.len() - 1);
        self.heights[index]
    }

    fn visible_fragments(&self) -> Vec<Handle> {
        self.fragments
            .iter()
            .enumerate()
            .filter(|(_, f)| f.appears_at <= self.scrolls)
            .map(|(i, _)| Handle::Fragment(i))
            .collect()
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    type Handle = Handle;

    async fn navigate(&mut self, url: &str) -> Result<(), ScraperError> {
        self.navigations.push(url.to_string());
        Ok(())
    }

    async fn find_all(
        &mut self,
        root: Option<&Handle>,
        selector: &str,
    ) -> Result<Vec<Handle>, ScraperError> {
        self.find_calls += 1;
        let found = match (root, selector) {
            (None, selectors::REVIEWS_TOGGLE) => {
                let present = self.toggle_present
                    || self
                        .toggle_appears_after_finds
                        .is_some_and(|n| self.find_calls > n);
                if present {
                    vec![Handle::Toggle]
                } else {
                    vec![]
                }
            }
            (None, selectors::REVIEWS_PANEL) => {
                if self.panel_present && self.toggle_clicked {
                    vec![Handle::Panel]
                } else {
                    vec![]
                }
            }
            (None, selectors::REVIEW_FRAGMENT) => self.visible_fragments(),
            (Some(Handle::Fragment(i)), selectors::MORE_BUTTON) => {
                if self.fragments[*i].fields.is_empty() {
                    vec![]
                } else {
                    vec![Handle::MoreButton(*i)]
                }
            }
            (Some(Handle::Fragment(i)), selectors::DETAIL_CONTAINER) => {
                if self.expanded.contains(i) {
                    vec![Handle::DetailContainer(*i)]
                } else {
                    vec![]
                }
            }
            (Some(Handle::Fragment(i)), selectors::DESCRIPTION) => {
                if self.fragments[*i].description.is_some() {
                    vec![Handle::Description(*i)]
                } else {
                    vec![]
                }
            }
            (Some(Handle::DetailContainer(i)), selectors::DETAIL_FIELD) => {
                let field_count = self.fragments[*i].fields.len();
                (0..field_count)
                    .map(|field| Handle::DetailField {
                        fragment: *i,
                        field,
                    })
                    .collect()
            }
            (Some(Handle::DetailField { fragment, field }), selectors::FIELD_VALUE) => {
                let value_count = self.fragments[*fragment].fields[*field].len();
                (0..value_count)
                    .map(|index| Handle::FieldValue {
                        fragment: *fragment,
                        field: *field,
                        index,
                    })
                    .collect()
            }
            _ => vec![],
        };
        Ok(found)
    }

    async fn click(&mut self, element: &Handle) -> Result<(), ScraperError> {
        match element {
            Handle::Toggle => self.toggle_clicked = true,
            Handle::MoreButton(i) => {
                self.expanded.insert(*i);
            }
            _ => {}
        }
        Ok(())
    }

    async fn text(&mut self, element: &Handle) -> Result<String, ScraperError> {
        let text = match element {
            Handle::Description(i) => self.fragments[*i].description.clone().unwrap_or_default(),
            Handle::FieldValue {
                fragment,
                field,
                index,
            } => self.fragments[*fragment].fields[*field][*index].clone(),
            _ => String::new(),
        };
        Ok(text)
    }

    async fn scroll_height(&mut self, _element: &Handle) -> Result<i64, ScraperError> {
        if self.fail_height_at_scroll == Some(self.scrolls) {
            return Err(ScraperError::UnexpectedScriptValue {
                script: "return arguments[0].scrollHeight".to_string(),
                value: "null".to_string(),
            });
        }
        Ok(self.current_height())
    }

    async fn scroll_to_bottom(&mut self, _element: &Handle) -> Result<(), ScraperError> {
        self.scrolls += 1;
        Ok(())
    }

    async fn screenshot(&mut self, path: &Path) -> Result<(), ScraperError> {
        self.screenshots.push(path.to_path_buf());
        Ok(())
    }

    fn id_of(&self, element: &Handle) -> String {
        match element {
            Handle::Fragment(i) => self.fragments[*i].dom_id.clone(),
            other => format!("{other:?}"),
        }
    }

    async fn close(self) -> Result<(), ScraperError> {
        Ok(())
    }
}

/// A config with no real-time waits so tests run instantly.
fn fast_config() -> HarvestConfig {
    HarvestConfig {
        page_settle: Duration::ZERO,
        toggle_timeout: Duration::ZERO,
        panel_timeout: Duration::ZERO,
        scroll_settle: Duration::ZERO,
        max_scroll_attempts: 30,
        max_reviews: 200,
        full_debug: false,
    }
}

const URL: &str = "https://maps.example.com/place/test";

// ---------------------------------------------------------------------------
// Extraction through the full loop
// ---------------------------------------------------------------------------

#[tokio::test]
async fn harvests_and_parses_a_full_review() {
    let mut browser = FakeBrowser::new(
        vec![100, 100],
        vec![fragment(
            "frag-a",
            Some("Great burgers"),
            &[&["Food: 5"], &["Atmosphere", "Great ambiance"]],
            1,
        )],
    );

    let mut reviews = Vec::new();
    harvest_location(&mut browser, URL, &mut reviews, &fast_config())
        .await
        .expect("harvest succeeds");

    assert_eq!(browser.navigations, vec![URL.to_string()]);
    assert!(browser.toggle_clicked, "reviews toggle must be clicked");
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].description, "Great burgers");
    assert_eq!(
        reviews[0].ratings.get("Food"),
        Some(&RatingValue::Score(5))
    );
    assert_eq!(
        reviews[0].ratings.get("Atmosphere"),
        Some(&RatingValue::Text("Great ambiance".to_string()))
    );
}

#[tokio::test]
async fn missing_description_yields_empty_string_and_continues() {
    let mut browser = FakeBrowser::new(
        vec![100, 100],
        vec![fragment("frag-a", None, &[&["Food: 4"]], 1)],
    );

    let mut reviews = Vec::new();
    harvest_location(&mut browser, URL, &mut reviews, &fast_config())
        .await
        .expect("missing description is not fatal");

    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].description, "");
    assert_eq!(
        reviews[0].ratings.get("Food"),
        Some(&RatingValue::Score(4))
    );
}

// ---------------------------------------------------------------------------
// Deduplication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn re_rendered_fragments_dedupe_by_content_not_handle() {
    // The same review surfaces under two different DOM ids across
    // iterations, as a lazy-loading re-render does.
    let mut browser = FakeBrowser::new(
        vec![100, 200, 300, 300],
        vec![
            fragment("frag-a", Some("Solid poutine"), &[&["Food: 4"]], 1),
            fragment("frag-a-rerendered", Some("Solid poutine"), &[&["Food: 4"]], 2),
        ],
    );

    let mut reviews = Vec::new();
    harvest_location(&mut browser, URL, &mut reviews, &fast_config())
        .await
        .expect("harvest succeeds");

    assert_eq!(reviews.len(), 1, "structurally equal records must collapse");
}

#[tokio::test]
async fn distinct_reviews_are_all_collected() {
    let mut browser = FakeBrowser::new(
        vec![100, 200, 300, 300],
        vec![
            fragment("frag-a", Some("First visit"), &[], 1),
            fragment("frag-b", Some("Second visit"), &[], 2),
        ],
    );

    let mut reviews = Vec::new();
    harvest_location(&mut browser, URL, &mut reviews, &fast_config())
        .await
        .expect("harvest succeeds");

    assert_eq!(reviews.len(), 2);
}

// ---------------------------------------------------------------------------
// Termination
// ---------------------------------------------------------------------------

#[tokio::test]
async fn converges_one_iteration_after_extent_stops_growing() {
    // Extent grows once, then freezes: 100 -> 200 -> 200. The loop must
    // stop at iteration 2 even though 30 attempts are allowed.
    let mut browser = FakeBrowser::new(vec![100, 200, 200], vec![]);

    let mut reviews = Vec::new();
    harvest_location(&mut browser, URL, &mut reviews, &fast_config())
        .await
        .expect("harvest succeeds");

    assert_eq!(browser.scrolls, 2, "convergence takes precedence over the attempt cap");
}

#[tokio::test]
async fn stops_at_max_scroll_attempts_when_panel_never_converges() {
    let heights: Vec<i64> = (0..200).map(|i| i64::from(i) * 50).collect();
    let mut browser = FakeBrowser::new(heights, vec![]);

    let mut config = fast_config();
    config.max_scroll_attempts = 7;

    let mut reviews = Vec::new();
    harvest_location(&mut browser, URL, &mut reviews, &config)
        .await
        .expect("hitting the attempt cap is normal termination");

    assert_eq!(browser.scrolls, 7);
}

#[tokio::test]
async fn truncates_to_max_reviews() {
    let fragments: Vec<FragmentSpec> = (0..5)
        .map(|i| {
            let id = format!("frag-{i}");
            let description = format!("Visit number {i}");
            fragment(&id, Some(description.as_str()), &[], 1)
        })
        .collect();
    let mut browser = FakeBrowser::new(vec![100, 200, 300], fragments);

    let mut config = fast_config();
    config.max_reviews = 3;

    let mut reviews = Vec::new();
    harvest_location(&mut browser, URL, &mut reviews, &config)
        .await
        .expect("harvest succeeds");

    assert_eq!(reviews.len(), 3);
}

// ---------------------------------------------------------------------------
// Failure classes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_toggle_is_fatal_and_screenshots() {
    let mut browser = FakeBrowser::new(vec![100], vec![]);
    browser.toggle_present = false;

    let mut reviews = Vec::new();
    let result = harvest_location(&mut browser, URL, &mut reviews, &fast_config()).await;

    let err = result.expect_err("missing toggle must fail");
    assert!(
        matches!(err, ScraperError::MandatoryElementMissing { .. }),
        "expected MandatoryElementMissing, got: {err:?}"
    );
    assert!(err.is_fatal());
    assert_eq!(
        browser.screenshots,
        vec![PathBuf::from("debug_locate.png")],
        "abort policy must capture a diagnostic screenshot"
    );
}

#[tokio::test]
async fn missing_panel_fails_this_location_only() {
    let mut browser = FakeBrowser::new(vec![100], vec![]);
    browser.panel_present = false;

    let mut reviews = Vec::new();
    let result = harvest_location(&mut browser, URL, &mut reviews, &fast_config()).await;

    let err = result.expect_err("missing panel must fail the location");
    assert!(
        matches!(err, ScraperError::PanelTimeout { .. }),
        "expected PanelTimeout, got: {err:?}"
    );
    assert!(!err.is_fatal(), "a panel timeout must not abort the run");
    assert_eq!(
        browser.screenshots,
        vec![PathBuf::from("debug_reviews_panel.png")]
    );
}

#[tokio::test]
async fn partial_results_survive_a_mid_loop_failure() {
    let mut browser = FakeBrowser::new(
        vec![100, 200, 300, 400],
        vec![fragment("frag-a", Some("Collected early"), &[], 1)],
    );
    // First iteration's height read (scroll count 1) succeeds; the second
    // iteration's (scroll count 2) blows up.
    browser.fail_height_at_scroll = Some(2);

    let mut reviews = Vec::new();
    let result = harvest_location(&mut browser, URL, &mut reviews, &fast_config()).await;

    assert!(result.is_err());
    assert_eq!(reviews.len(), 1, "already-harvested reviews must be kept");
    assert_eq!(reviews[0].description, "Collected early");
}

// ---------------------------------------------------------------------------
// Locator polling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn locate_with_zero_timeout_makes_a_single_attempt() {
    let mut browser = FakeBrowser::new(vec![100], vec![]);
    browser.toggle_present = false;

    let found = locate(
        &mut browser,
        None,
        selectors::REVIEWS_TOGGLE,
        &LocateOpts::immediate(OnFailure::Ignore),
    )
    .await
    .expect("miss under Ignore is not an error");

    assert!(found.is_none());
    assert_eq!(browser.find_calls, 1);
}

#[tokio::test]
async fn locate_polls_until_the_element_appears() {
    let mut browser = FakeBrowser::new(vec![100], vec![]);
    browser.toggle_present = false;
    browser.toggle_appears_after_finds = Some(2);

    let found = locate(
        &mut browser,
        None,
        selectors::REVIEWS_TOGGLE,
        &LocateOpts::within(Duration::from_secs(2), OnFailure::Ignore),
    )
    .await
    .expect("lookup succeeds");

    assert!(found.is_some(), "element appearing mid-window must be found");
    assert_eq!(browser.find_calls, 3);
}
