//! Brand and competitor mention extraction from engine-response text.

use aivis_core::{CompetitorMention, Entity, MentionResult};
use url::Url;

use crate::sentences::{position_of_offset, sentence_at_position};
use crate::sentiment::SentimentAnalyzer;

/// Derive a bare domain from an entity URL: no scheme, no leading `www.`,
/// lowercased.
///
/// URLs without a scheme are retried with `https://` prepended. If parsing
/// still fails (or yields no host), the raw string is used as the domain.
#[must_use]
pub fn bare_domain(entity_url: &str) -> String {
    let raw = entity_url.trim();
    let parsed = Url::parse(raw)
        .ok()
        .filter(|u| u.host_str().is_some())
        .or_else(|| Url::parse(&format!("https://{raw}")).ok());

    let host = parsed
        .as_ref()
        .and_then(Url::host_str)
        .map_or_else(|| raw.to_string(), str::to_string)
        .to_lowercase();

    host.strip_prefix("www.")
        .map_or_else(|| host.clone(), str::to_string)
}

/// Non-overlapping occurrences of `needle` in `haystack`, with the byte
/// offset of the first one. An empty needle never matches.
fn occurrences(haystack: &str, needle: &str) -> (u32, Option<usize>) {
    if needle.is_empty() {
        return (0, None);
    }
    let count = u32::try_from(haystack.matches(needle).count()).unwrap_or(u32::MAX);
    (count, haystack.find(needle))
}

/// Find an entity's name and domain in `text`.
///
/// Matching is case-insensitive. Name and domain occurrences are counted by
/// two independent scans and summed, so a name that also appears inside the
/// entity's own domain (`Acme` in `acme.com`) counts twice. `position` is the
/// sentence of the earliest occurrence of either.
#[must_use]
pub fn extract_mentions(text: &str, entity_name: &str, entity_url: &str) -> MentionResult {
    if text.trim().is_empty() {
        return MentionResult::not_mentioned();
    }

    let folded_text = text.to_lowercase();
    let folded_name = entity_name.trim().to_lowercase();
    let domain = bare_domain(entity_url);

    let (name_count, name_first) = occurrences(&folded_text, &folded_name);
    let (domain_count, domain_first) = occurrences(&folded_text, &domain);

    let first = match (name_first, domain_first) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };

    MentionResult::from_occurrences(
        name_count.saturating_add(domain_count),
        first.map(|offset| position_of_offset(&folded_text, offset)),
    )
}

/// Mentions of each competitor, in roster order, with the sentiment of the
/// sentence holding the first mention.
///
/// Competitors that do not appear produce no entry.
#[must_use]
pub fn extract_competitor_mentions(
    analyzer: &SentimentAnalyzer,
    text: &str,
    competitors: &[Entity],
) -> Vec<CompetitorMention> {
    if text.trim().is_empty() || competitors.is_empty() {
        return Vec::new();
    }

    competitors
        .iter()
        .filter_map(|competitor| {
            let mention = extract_mentions(text, &competitor.name, &competitor.url);
            let position = mention.position.filter(|_| mention.mentioned)?;
            let sentence = sentence_at_position(text, position);
            Some(CompetitorMention {
                name: competitor.name.clone(),
                position,
                sentiment: analyzer.score(sentence).label,
            })
        })
        .collect()
}
