//! Turning one engine response into a persistable [`PromptResult`].

use aivis_core::{Engine, Entity, PromptResult};
use aivis_scoring::{
    bare_domain, extract_competitor_mentions, extract_mentions, visibility_score,
    SentimentAnalyzer, VisibilitySignals,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Everything needed to score one engine response for one brand.
#[derive(Debug, Clone, Copy)]
pub struct ResponseInput<'a> {
    pub brand_id: Uuid,
    pub prompt_id: Uuid,
    pub engine: Engine,
    pub brand: &'a Entity,
    pub competitors: &'a [Entity],
    pub response: &'a str,
    pub citation_urls: &'a [String],
}

/// Score a response: brand mentions, competitor mentions, whole-response
/// sentiment, brand citation presence, and the canonical visibility score.
#[must_use]
pub fn process_engine_response(
    analyzer: &SentimentAnalyzer,
    input: &ResponseInput<'_>,
) -> PromptResult {
    process_engine_response_at(analyzer, input, Utc::now())
}

/// [`process_engine_response`] with an explicit creation timestamp.
#[must_use]
pub fn process_engine_response_at(
    analyzer: &SentimentAnalyzer,
    input: &ResponseInput<'_>,
    created_at: DateTime<Utc>,
) -> PromptResult {
    let mention = extract_mentions(input.response, &input.brand.name, &input.brand.url);
    let competitor_mentions =
        extract_competitor_mentions(analyzer, input.response, input.competitors);
    let sentiment = analyzer.score(input.response);
    let has_citation = cites_domain(input.citation_urls, &bare_domain(&input.brand.url));

    let score = visibility_score(&VisibilitySignals {
        mentioned: mention.mentioned,
        position: mention.position,
        sentiment: sentiment.label,
        has_citation,
        competitor_count: competitor_mentions.len(),
    });

    tracing::debug!(
        brand_id = %input.brand_id,
        engine = %input.engine,
        mentioned = mention.mentioned,
        competitors = competitor_mentions.len(),
        visibility_score = score,
        "engine response processed"
    );

    PromptResult {
        id: Uuid::new_v4(),
        brand_id: input.brand_id,
        prompt_id: input.prompt_id,
        engine: input.engine,
        response_text: input.response.to_string(),
        brand_mentioned: mention.mentioned,
        mention_position: mention.position,
        mention_count: mention.mention_count,
        sentiment_score: sentiment.score,
        sentiment_label: sentiment.label,
        competitor_mentions,
        visibility_score: score,
        citation_urls: input.citation_urls.to_vec(),
        created_at,
    }
}

fn cites_domain(citation_urls: &[String], domain: &str) -> bool {
    !domain.is_empty()
        && citation_urls
            .iter()
            .any(|url| url.to_lowercase().contains(domain))
}
