//! Parsed page plus the derived text every dimension needs.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

pub(super) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid static selector")
}

static BODY: LazyLock<Selector> = LazyLock::new(|| selector("body"));
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+(?:['\u{2019}][\p{L}]+)*").expect("valid regex"));

/// Elements whose text is never part of readable body copy.
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "noscript", "template"];

pub(super) struct Page {
    pub document: Html,
    pub body_text: String,
}

impl Page {
    pub fn parse(markup: &str) -> Self {
        let document = Html::parse_document(markup);
        let body_text = extract_body_text(&document);
        Self {
            document,
            body_text,
        }
    }

    pub fn count(&self, sel: &Selector) -> usize {
        self.document.select(sel).count()
    }

    pub fn exists(&self, sel: &Selector) -> bool {
        self.document.select(sel).next().is_some()
    }

    /// First non-blank value of `attr` across elements matching `sel`.
    pub fn first_attr(&self, sel: &Selector, attr: &str) -> Option<String> {
        self.document
            .select(sel)
            .filter_map(|el| el.value().attr(attr))
            .map(str::trim)
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn words(&self) -> Vec<&str> {
        WORD_RE
            .find_iter(&self.body_text)
            .map(|m| m.as_str())
            .collect()
    }
}

/// Visible text of `<body>`, whitespace-collapsed, skipping script-like
/// elements.
fn extract_body_text(document: &Html) -> String {
    let Some(body) = document.select(&BODY).next() else {
        return String::new();
    };

    let mut parts: Vec<&str> = Vec::new();
    for node in body.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let inside_non_content = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| NON_CONTENT_TAGS.contains(&el.name()))
        });
        if inside_non_content {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
