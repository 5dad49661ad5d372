//! Review records as harvested from listing pages.
//!
//! ## Observed rating field shapes
//!
//! The detail container behind a review's disclosure control presents each
//! rating category in one of two shapes:
//!
//! - a single span whose text is colon-delimited, e.g. `"Food: 5"`, where
//!   the value is a numeric score;
//! - a label/value span pair, e.g. `"Atmosphere"` + `"Great ambiance"`,
//!   where the value is free text.
//!
//! [`RatingValue`] preserves the distinction; serialization is untagged so
//! scores come out as JSON numbers and descriptions as strings.

use std::collections::BTreeMap;

use serde::Serialize;

use platerev_core::shorten;

/// A rating category's value: a numeric score or a descriptive string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RatingValue {
    Score(i64),
    Text(String),
}

impl std::fmt::Display for RatingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatingValue::Score(score) => write!(f, "{score}"),
            RatingValue::Text(text) => write!(f, "{text}"),
        }
    }
}

/// One extracted review: free-text description plus zero or more
/// category→value ratings. Immutable once built; structural equality is the
/// dedup identity for the whole pipeline.
///
/// Serializes flat, `{"description": "...", "Food": 5, "Service": "Slow"}`,
/// one JSON object per review in the per-location output files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Review {
    pub description: String,
    #[serde(flatten)]
    pub ratings: BTreeMap<String, RatingValue>,
}

impl Review {
    /// One-line diagnostic rendering: every rating, then the description,
    /// shortened unless `full_description` is set (debug verbosity 1).
    #[must_use]
    pub fn summary(&self, full_description: bool) -> String {
        let mut parts: Vec<String> = self
            .ratings
            .iter()
            .map(|(category, value)| format!("{category}: {value}"))
            .collect();
        let description = if full_description {
            self.description.clone()
        } else {
            shorten(&self.description, 40)
        };
        parts.push(format!("desc: {description}"));
        parts.join(" | ")
    }
}

impl std::fmt::Display for Review {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.summary(false))
    }
}
