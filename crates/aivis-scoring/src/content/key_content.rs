use std::sync::LazyLock;

use scraper::Selector;

use super::cap;
use super::page::{selector, Page};

static PARAGRAPHS: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static IMAGES: LazyLock<Selector> = LazyLock::new(|| selector("img"));
static VIDEO: LazyLock<Selector> = LazyLock::new(|| {
    selector(
        r#"video, iframe[src*="youtube"], iframe[src*="vimeo"], iframe[src*="wistia"], embed[type^="video"]"#,
    )
});
static LINKS: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[name="description"]"#));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));

const MIN_LINKS: usize = 3;
const DESCRIPTION_MIN_CHARS: usize = 50;
const DESCRIPTION_MAX_CHARS: usize = 160;

pub(super) fn score(page: &Page, recommendations: &mut Vec<String>) -> u8 {
    let mut points = 0;

    points += match page.count(&PARAGRAPHS) {
        0..=2 => 0,
        3 | 4 => 15,
        _ => 25,
    };

    points += match page.count(&IMAGES) {
        0 => 0,
        1 => 15,
        _ => 25,
    };

    if page.exists(&VIDEO) {
        points += 20;
    }

    let links = page.count(&LINKS);
    if links >= MIN_LINKS {
        points += 15;
    } else {
        recommendations.push(format!(
            "Add more links to related and supporting pages (found {links}, aim for {MIN_LINKS}+)"
        ));
    }

    match page.first_attr(&DESCRIPTION, "content") {
        Some(desc)
            if (DESCRIPTION_MIN_CHARS..=DESCRIPTION_MAX_CHARS)
                .contains(&desc.chars().count()) =>
        {
            points += 10;
        }
        Some(desc) => recommendations.push(format!(
            "Keep the meta description between {DESCRIPTION_MIN_CHARS} and {DESCRIPTION_MAX_CHARS} characters (currently {})",
            desc.chars().count()
        )),
        None => recommendations.push("Add a meta description".to_string()),
    }

    let has_title = page
        .document
        .select(&TITLE)
        .any(|el| !el.text().collect::<String>().trim().is_empty());
    if has_title {
        points += 5;
    }

    cap(points)
}
