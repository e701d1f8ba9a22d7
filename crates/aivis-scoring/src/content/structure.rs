use std::sync::LazyLock;

use scraper::Selector;

use super::cap;
use super::page::{selector, Page};

static H1: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static SUB_HEADINGS: LazyLock<Selector> = LazyLock::new(|| selector("h2, h3"));
static LISTS: LazyLock<Selector> = LazyLock::new(|| selector("ul, ol"));
static JSON_LD: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"script[type="application/ld+json"]"#));
static SEMANTIC: LazyLock<Selector> =
    LazyLock::new(|| selector("article, section, main, aside, nav, header, footer"));

pub(super) fn score(page: &Page, recommendations: &mut Vec<String>) -> u8 {
    let mut points = 0;

    match page.count(&H1) {
        0 => recommendations.push("Add a single H1 heading that states the page topic".to_string()),
        1 => points += 20,
        n => {
            points += 10;
            recommendations.push(format!(
                "Use exactly one H1 heading (found {n}); demote the rest to H2"
            ));
        }
    }

    points += match page.count(&SUB_HEADINGS) {
        0 => {
            recommendations
                .push("Break content into sections with H2/H3 sub-headings".to_string());
            0
        }
        1 | 2 => 15,
        _ => 25,
    };

    points += match page.count(&LISTS) {
        0 => 0,
        1 => 10,
        _ => 20,
    };

    if page.exists(&JSON_LD) {
        points += 20;
    } else {
        recommendations.push("Add JSON-LD structured data (schema.org) to the page".to_string());
    }

    if page.exists(&SEMANTIC) {
        points += 15;
    }

    cap(points)
}
