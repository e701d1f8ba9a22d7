use std::sync::LazyLock;

use scraper::Selector;

use super::cap;
use super::page::{selector, Page};

static QUOTES: LazyLock<Selector> = LazyLock::new(|| selector("blockquote, q"));
static ANY_ELEMENT: LazyLock<Selector> = LazyLock::new(|| selector("*"));
static LINKS: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));

/// Phrases that signal the copy attributes its claims.
const CITATION_PHRASES: &[&str] = &[
    "according to",
    "research shows",
    "studies show",
    "study found",
    "survey",
    "cited",
    "source",
    "data from",
    "reported by",
];

pub(super) fn score(page: &Page, recommendations: &mut Vec<String>) -> u8 {
    let mut points = 0;

    if page.exists(&QUOTES) {
        points += 30;
    } else {
        recommendations
            .push("Quote experts or sources using blockquote elements".to_string());
    }

    let has_data_attribute = page.document.select(&ANY_ELEMENT).any(|el| {
        el.value()
            .attrs()
            .any(|(name, _)| name.starts_with("data-"))
    });
    if has_data_attribute {
        points += 20;
    }

    let lower = page.body_text.to_lowercase();
    if CITATION_PHRASES.iter().any(|phrase| lower.contains(phrase)) {
        points += 30;
    } else {
        recommendations.push(
            "Attribute claims to sources (e.g. \"according to\", \"research shows\")".to_string(),
        );
    }

    if page.exists(&LINKS) {
        points += 20;
    }

    cap(points)
}
