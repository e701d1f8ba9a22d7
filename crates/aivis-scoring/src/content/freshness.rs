use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use scraper::Selector;
use serde_json::Value;

use super::page::{selector, Page};

/// Score used when the page carries no usable date.
const NEUTRAL_SCORE: u8 = 50;
const VERY_STALE_DAYS: i64 = 365;

/// Date-bearing tags, most specific "last updated" signals first.
static DATE_SOURCES: LazyLock<Vec<(Selector, &'static str)>> = LazyLock::new(|| {
    [
        (r#"meta[property="article:modified_time"]"#, "content"),
        (r#"meta[property="og:updated_time"]"#, "content"),
        (r#"meta[http-equiv="last-modified" i]"#, "content"),
        (r#"meta[name="last-modified" i]"#, "content"),
        (r#"meta[itemprop="dateModified"]"#, "content"),
        (r#"meta[property="article:published_time"]"#, "content"),
        (r#"meta[itemprop="datePublished"]"#, "content"),
        (r#"meta[name="date" i]"#, "content"),
        ("time[datetime]", "datetime"),
    ]
    .into_iter()
    .map(|(css, attr)| (selector(css), attr))
    .collect()
});

static JSON_LD: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"script[type="application/ld+json"]"#));

pub(super) fn score(page: &Page, now: DateTime<Utc>, recommendations: &mut Vec<String>) -> u8 {
    let Some(date) = find_page_date(page) else {
        recommendations.push(
            "Add a published or last-updated date to the page metadata".to_string(),
        );
        return NEUTRAL_SCORE;
    };

    let age_days = (now - date).num_days().max(0);
    if age_days >= VERY_STALE_DAYS {
        recommendations.push(format!(
            "Content was last updated {age_days} days ago; refresh it with current information"
        ));
    }

    match age_days {
        d if d < 30 => 100,
        d if d < 90 => 75,
        d if d < 180 => 50,
        d if d < VERY_STALE_DAYS => 25,
        _ => 10,
    }
}

fn find_page_date(page: &Page) -> Option<DateTime<Utc>> {
    let from_meta = DATE_SOURCES.iter().find_map(|(sel, attr)| {
        page.document
            .select(sel)
            .filter_map(|el| el.value().attr(attr))
            .find_map(parse_date)
    });
    from_meta.or_else(|| find_json_ld_date(page))
}

/// `dateModified` (preferred) or `datePublished` from any JSON-LD block.
fn find_json_ld_date(page: &Page) -> Option<DateTime<Utc>> {
    let values: Vec<Value> = page
        .document
        .select(&JSON_LD)
        .filter_map(|el| serde_json::from_str::<Value>(&el.text().collect::<String>()).ok())
        .collect();

    ["dateModified", "datePublished"].iter().find_map(|key| {
        values
            .iter()
            .find_map(|value| find_key(value, key))
            .and_then(parse_date)
    })
}

fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    match value {
        Value::Object(map) => map
            .get(key)
            .and_then(Value::as_str)
            .or_else(|| map.values().find_map(|v| find_key(v, key))),
        Value::Array(items) => items.iter().find_map(|v| find_key(v, key)),
        _ => None,
    }
}

/// Parse the date formats commonly found in page metadata.
pub(super) fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
