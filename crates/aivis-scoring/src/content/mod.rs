//! Structural scoring of HTML pages for answer-engine readiness.
//!
//! A page is scored on five dimensions, each `0..=100`:
//!
//! | Dimension   | Weight |
//! |-------------|--------|
//! | structure   | 0.20   |
//! | readability | 0.25   |
//! | freshness   | 0.15   |
//! | key content | 0.25   |
//! | citation    | 0.15   |
//!
//! Recommendations from every dimension are accumulated in that order.

mod citation;
mod freshness;
mod key_content;
mod page;
mod readability;
mod structure;

use aivis_core::ContentScoreResult;
use chrono::{DateTime, Utc};

use page::Page;

const STRUCTURE_WEIGHT: f64 = 0.20;
const READABILITY_WEIGHT: f64 = 0.25;
const FRESHNESS_WEIGHT: f64 = 0.15;
const KEY_CONTENT_WEIGHT: f64 = 0.25;
const CITATION_WEIGHT: f64 = 0.15;

/// Score `markup` against the current time.
///
/// `url` is the page's source address; it is carried for logging only.
#[must_use]
pub fn score_content(markup: &str, url: Option<&str>) -> ContentScoreResult {
    score_content_at(markup, url, Utc::now())
}

/// Score `markup`, measuring freshness against `now`.
#[must_use]
pub fn score_content_at(markup: &str, url: Option<&str>, now: DateTime<Utc>) -> ContentScoreResult {
    let page = Page::parse(markup);
    let mut recommendations = Vec::new();

    let structure_score = structure::score(&page, &mut recommendations);
    let readability_score = readability::score(&page, &mut recommendations);
    let freshness_score = freshness::score(&page, now, &mut recommendations);
    let key_content_score = key_content::score(&page, &mut recommendations);
    let citation_score = citation::score(&page, &mut recommendations);

    let weighted = f64::from(structure_score) * STRUCTURE_WEIGHT
        + f64::from(readability_score) * READABILITY_WEIGHT
        + f64::from(freshness_score) * FRESHNESS_WEIGHT
        + f64::from(key_content_score) * KEY_CONTENT_WEIGHT
        + f64::from(citation_score) * CITATION_WEIGHT;
    let overall_score = to_score(weighted);

    tracing::debug!(
        url = url.unwrap_or("-"),
        overall_score,
        structure_score,
        readability_score,
        freshness_score,
        key_content_score,
        citation_score,
        "content scored"
    );

    ContentScoreResult {
        overall_score,
        structure_score,
        readability_score,
        freshness_score,
        key_content_score,
        citation_score,
        recommendations,
    }
}

/// Round and clamp a raw value into a `0..=100` score.
fn to_score(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let score = value.round().clamp(0.0, 100.0) as u8;
    score
}

/// Sum additive points and clamp to 100.
fn cap(points: u32) -> u8 {
    u8::try_from(points.min(100)).unwrap_or(100)
}

#[cfg(test)]
#[path = "content_test.rs"]
mod tests;
