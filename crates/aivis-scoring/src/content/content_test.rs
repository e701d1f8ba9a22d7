use chrono::{Duration, TimeZone};

use super::*;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
}

fn page_with_head(head: &str, body: &str) -> String {
    format!("<!doctype html><html><head>{head}</head><body>{body}</body></html>")
}

fn modified_meta(days_ago: i64) -> String {
    let date = fixed_now() - Duration::days(days_ago);
    format!(
        r#"<meta property="article:modified_time" content="{}">"#,
        date.to_rfc3339()
    )
}

/// ~330 short, simple words across many sentences.
fn long_simple_copy() -> String {
    "The team ships a new build each week. It is fast and easy to use. ".repeat(22)
}

fn well_structured_page() -> String {
    let head = format!(
        r#"<title>Acme Analytics Guide</title>
        <meta name="description" content="A practical guide to measuring brand visibility inside AI answer engines.">
        {}
        <script type="application/ld+json">{{"@type":"Article","headline":"Guide"}}</script>"#,
        modified_meta(5)
    );
    let body = format!(
        r#"<main><article>
        <h1>Acme Analytics</h1>
        <h2>Why</h2><h2>How</h2><h3>Setup</h3><h3>Usage</h3>
        <ul><li>one</li></ul><ol><li>two</li></ol>
        <p>{copy}</p><p>According to the 2026 survey, usage doubled.</p><p>Short.</p><p>More.</p><p>End.</p>
        <img src="a.png"><img src="b.png">
        <iframe src="https://www.youtube.com/embed/xyz"></iframe>
        <blockquote data-source="survey">Quoted insight.</blockquote>
        <a href="/a">a</a><a href="/b">b</a><a href="https://example.org">c</a>
        </article></main>"#,
        copy = long_simple_copy()
    );
    page_with_head(&head, &body)
}

#[test]
fn well_structured_page_maxes_structural_dimensions() {
    let result = score_content_at(&well_structured_page(), Some("https://acme.test"), fixed_now());
    assert_eq!(result.structure_score, 100);
    assert_eq!(result.key_content_score, 100);
    assert_eq!(result.citation_score, 100);
    assert_eq!(result.freshness_score, 100);
    assert!(result.readability_score > 60, "got {}", result.readability_score);
    assert!(
        result.recommendations.is_empty(),
        "unexpected recommendations: {:?}",
        result.recommendations
    );
}

#[test]
fn structure_sums_each_signal_to_exactly_100() {
    // 1 H1 (20) + 4 sub-headings (25) + 2 lists (20) + JSON-LD (20) + semantic (15).
    let html = page_with_head(
        r#"<script type="application/ld+json">{}</script>"#,
        "<section><h1>T</h1><h2>a</h2><h2>b</h2><h3>c</h3><h3>d</h3><ul></ul><ol></ol></section>",
    );
    let result = score_content_at(&html, None, fixed_now());
    assert_eq!(result.structure_score, 100);
}

#[test]
fn structure_never_exceeds_100() {
    let html = page_with_head(
        r#"<script type="application/ld+json">{}</script><script type="application/ld+json">{}</script>"#,
        &format!(
            "<article><section><h1>T</h1>{}{}</section></article>",
            "<h2>x</h2>".repeat(20),
            "<ul><li>i</li></ul>".repeat(10)
        ),
    );
    let result = score_content_at(&html, None, fixed_now());
    assert_eq!(result.structure_score, 100);
}

#[test]
fn multiple_h1_scores_partially_and_recommends() {
    let html = page_with_head("", "<h1>A</h1><h1>B</h1>");
    let result = score_content_at(&html, None, fixed_now());
    // 10 for multiple H1s, nothing else.
    assert_eq!(result.structure_score, 10);
    assert!(result
        .recommendations
        .iter()
        .any(|r| r.contains("exactly one H1") && r.contains("found 2")));
}

#[test]
fn missing_h1_recommends() {
    let html = page_with_head("", "<h2>A</h2>");
    let result = score_content_at(&html, None, fixed_now());
    assert_eq!(result.structure_score, 15);
    assert!(result.recommendations.iter().any(|r| r.contains("single H1")));
}

#[test]
fn empty_markup_degrades_gracefully() {
    let result = score_content_at("", None, fixed_now());
    assert_eq!(result.structure_score, 0);
    assert_eq!(result.readability_score, 0);
    assert_eq!(result.freshness_score, 50);
    assert_eq!(result.key_content_score, 0);
    assert_eq!(result.citation_score, 0);
    assert!(result.overall_score <= 100);
    assert!(result
        .recommendations
        .iter()
        .any(|r| r.contains("at least 300 words")));
}

#[test]
fn freshness_buckets_by_age() {
    let cases = [(5, 100), (45, 75), (120, 50), (200, 25), (400, 10)];
    for (days, expected) in cases {
        let html = page_with_head(&modified_meta(days), "<p>x</p>");
        let result = score_content_at(&html, None, fixed_now());
        assert_eq!(
            result.freshness_score, expected,
            "{days} days old should score {expected}"
        );
    }
}

#[test]
fn very_stale_page_recommends_refresh() {
    let html = page_with_head(&modified_meta(400), "<p>x</p>");
    let result = score_content_at(&html, None, fixed_now());
    assert!(result
        .recommendations
        .iter()
        .any(|r| r.contains("400 days ago")));
}

#[test]
fn missing_or_garbage_date_is_neutral() {
    let none = score_content_at(&page_with_head("", "<p>x</p>"), None, fixed_now());
    assert_eq!(none.freshness_score, 50);
    assert!(none
        .recommendations
        .iter()
        .any(|r| r.contains("last-updated date")));

    let garbage = page_with_head(
        r#"<meta property="article:modified_time" content="sometime last spring">"#,
        "<p>x</p>",
    );
    let result = score_content_at(&garbage, None, fixed_now());
    assert_eq!(result.freshness_score, 50);
}

#[test]
fn freshness_reads_json_ld_and_time_elements() {
    let json_ld = page_with_head(
        r#"<script type="application/ld+json">{"@type":"Article","dateModified":"2026-05-20"}</script>"#,
        "<p>x</p>",
    );
    assert_eq!(
        score_content_at(&json_ld, None, fixed_now()).freshness_score,
        100
    );

    let time = page_with_head("", r#"<time datetime="2026-02-15">Feb 15</time>"#);
    assert_eq!(score_content_at(&time, None, fixed_now()).freshness_score, 50);
}

#[test]
fn future_dates_count_as_fresh() {
    let html = page_with_head(&modified_meta(-30), "<p>x</p>");
    assert_eq!(score_content_at(&html, None, fixed_now()).freshness_score, 100);
}

#[test]
fn readability_ignores_script_text() {
    let copy = long_simple_copy();
    let html = page_with_head(
        "",
        &format!("<p>{copy}</p><script>var x = 'Incomprehensible polysyllabic obfuscation';</script>"),
    );
    let result = score_content_at(&html, None, fixed_now());
    assert!(result.readability_score > 60);
    assert!(!result
        .recommendations
        .iter()
        .any(|r| r.contains("at least 300 words")));
}

#[test]
fn short_copy_recommends_expansion() {
    let html = page_with_head("", "<p>Just a few words here.</p>");
    let result = score_content_at(&html, None, fixed_now());
    assert!(result
        .recommendations
        .iter()
        .any(|r| r.contains("currently 5")));
}

#[test]
fn key_content_partial_credit() {
    let html = page_with_head(
        r#"<title> </title><meta name="description" content="too short">"#,
        r#"<p>a</p><p>b</p><p>c</p><img src="x.png"><a href="/one">one</a>"#,
    );
    let result = score_content_at(&html, None, fixed_now());
    // 3 paragraphs (15) + 1 image (15); blank title, short description, too few links.
    assert_eq!(result.key_content_score, 30);
    assert!(result
        .recommendations
        .iter()
        .any(|r| r.contains("meta description between")));
    assert!(result.recommendations.iter().any(|r| r.contains("found 1")));
}

#[test]
fn key_content_missing_description_recommends() {
    let html = page_with_head("<title>T</title>", "<video src=\"v.mp4\"></video>");
    let result = score_content_at(&html, None, fixed_now());
    // video (20) + title (5)
    assert_eq!(result.key_content_score, 25);
    assert!(result
        .recommendations
        .iter()
        .any(|r| r == "Add a meta description"));
}

#[test]
fn citation_signals_add_up() {
    let html = page_with_head(
        "",
        r#"<q>quoted</q><div data-ref="1">Research shows it works.</div><a href="/src">src</a>"#,
    );
    let result = score_content_at(&html, None, fixed_now());
    assert_eq!(result.citation_score, 100);
}

#[test]
fn citation_missing_signals_recommend() {
    let html = page_with_head("", "<p>Plain claims with nothing to back them.</p>");
    let result = score_content_at(&html, None, fixed_now());
    assert_eq!(result.citation_score, 0);
    assert!(result.recommendations.iter().any(|r| r.contains("blockquote")));
    assert!(result.recommendations.iter().any(|r| r.contains("according to")));
}

#[test]
fn overall_is_weighted_sum_of_dimensions() {
    let result = score_content_at(&well_structured_page(), None, fixed_now());
    let expected = (f64::from(result.structure_score) * 0.20
        + f64::from(result.readability_score) * 0.25
        + f64::from(result.freshness_score) * 0.15
        + f64::from(result.key_content_score) * 0.25
        + f64::from(result.citation_score) * 0.15)
        .round();
    assert!((f64::from(result.overall_score) - expected).abs() < f64::EPSILON);
}

#[test]
fn recommendations_follow_dimension_order() {
    let result = score_content_at("", None, fixed_now());
    let h1 = result
        .recommendations
        .iter()
        .position(|r| r.contains("H1"))
        .unwrap();
    let words = result
        .recommendations
        .iter()
        .position(|r| r.contains("300 words"))
        .unwrap();
    let date = result
        .recommendations
        .iter()
        .position(|r| r.contains("last-updated date"))
        .unwrap();
    let quote = result
        .recommendations
        .iter()
        .position(|r| r.contains("blockquote"))
        .unwrap();
    assert!(h1 < words && words < date && date < quote);
}

#[test]
fn score_content_uses_current_time() {
    let result = score_content(&well_structured_page(), None);
    // The fixture's modified date is in the past relative to now.
    assert!(result.freshness_score <= 100);
    assert!(result.overall_score <= 100);
}
