//! Turning one rendered review fragment into a [`Review`] record.
//!
//! Everything here is best-effort: a missing disclosure control, detail
//! container, description, or rating sub-element degrades the record rather
//! than failing the pass. Only transport-level browser errors propagate.

use std::collections::BTreeMap;

use crate::browser::Browser;
use crate::error::ScraperError;
use crate::locator::{locate, locate_all, LocateOpts, OnFailure};
use crate::selectors;
use crate::types::{RatingValue, Review};

/// Extract a single review from `fragment`.
///
/// Expands the fragment's "more" disclosure first so the full description
/// and the per-category detail fields are present in the DOM, then parses
/// the description and each rating field.
///
/// # Errors
///
/// Only browser transport errors; missing optional elements yield a partial
/// record instead.
pub(crate) async fn extract_review<B: Browser + Send>(
    browser: &mut B,
    fragment: &B::Handle,
) -> Result<Review, ScraperError> {
    let immediate = LocateOpts::immediate(OnFailure::Ignore);

    let mut detail_fields = Vec::new();
    if let Some(more) = locate(browser, Some(fragment), selectors::MORE_BUTTON, &immediate).await? {
        if let Err(e) = browser.click(&more).await {
            tracing::debug!(error = %e, "could not expand review; continuing with truncated text");
        } else if let Some(container) = locate(
            browser,
            Some(fragment),
            selectors::DETAIL_CONTAINER,
            &immediate,
        )
        .await?
        {
            detail_fields = locate_all(
                browser,
                Some(&container),
                selectors::DETAIL_FIELD,
                &immediate,
            )
            .await?;
        }
    }

    let logged = LocateOpts::immediate(OnFailure::Log);
    let description =
        match locate(browser, Some(fragment), selectors::DESCRIPTION, &logged).await? {
            Some(element) => browser.text(&element).await?,
            None => String::new(),
        };

    let mut ratings = BTreeMap::new();
    for field in &detail_fields {
        let sub_elements =
            locate_all(browser, Some(field), selectors::FIELD_VALUE, &immediate).await?;
        let mut texts = Vec::with_capacity(sub_elements.len());
        for sub_element in &sub_elements {
            texts.push(browser.text(sub_element).await?);
        }
        if let Some((category, value)) = parse_rating_field(&texts) {
            ratings.insert(category, value);
        }
    }

    Ok(Review {
        description,
        ratings,
    })
}

/// Parse one rating field's sub-element texts into a `(category, value)`
/// pair.
///
/// - One text: split on the first `": "`; the left part names the
///   category, the right parses as an integer score, or stays a string when
///   it is not numeric. No delimiter, or an empty half, means no entry.
/// - Two texts: label and descriptive value, kept as a string.
/// - Any other count: ignored.
#[must_use]
pub fn parse_rating_field(texts: &[String]) -> Option<(String, RatingValue)> {
    match texts {
        [single] => {
            let (category, value) = single.split_once(": ")?;
            if category.is_empty() || value.is_empty() {
                return None;
            }
            let rating = value
                .parse::<i64>()
                .map_or_else(|_| RatingValue::Text(value.to_owned()), RatingValue::Score);
            Some((category.to_owned(), rating))
        }
        [category, value] => {
            if category.is_empty() {
                return None;
            }
            Some((category.clone(), RatingValue::Text(value.clone())))
        }
        _ => None,
    }
}
