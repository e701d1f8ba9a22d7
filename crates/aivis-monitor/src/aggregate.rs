//! Daily snapshot aggregation.
//!
//! All of one brand's prompt results for one UTC date fold into a single
//! [`VisibilitySnapshot`], which is then upserted on `(brand_id, date)`.
//! Re-running for the same day overwrites the row rather than adding one.

use std::collections::BTreeMap;

use aivis_core::{
    CompetitorStats, Engine, PromptResult, SentimentBreakdown, VisibilitySnapshot,
};
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::error::MonitorError;
use crate::store::MonitorStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateOutcome {
    /// `false` when there were no results for the day and nothing was written.
    pub snapshot_created: bool,
    pub snapshot: Option<VisibilitySnapshot>,
}

impl AggregateOutcome {
    fn no_op() -> Self {
        Self {
            snapshot_created: false,
            snapshot: None,
        }
    }
}

/// Compute and upsert the snapshot for `(brand_id, date)`.
///
/// # Errors
///
/// Returns [`MonitorError::Storage`] if reading results or writing the
/// snapshot fails. Zero results for the day is not an error.
pub async fn aggregate_daily_snapshot<S: MonitorStore + ?Sized>(
    store: &S,
    brand_id: Uuid,
    date: NaiveDate,
) -> Result<AggregateOutcome, MonitorError> {
    let results = store.results_for_day(brand_id, date).await?;

    let Some(snapshot) = compute_snapshot(brand_id, date, &results) else {
        tracing::info!(%brand_id, %date, "no prompt results for day; snapshot skipped");
        return Ok(AggregateOutcome::no_op());
    };

    let inserted = store.upsert_snapshot(&snapshot).await?;
    tracing::info!(
        %brand_id,
        %date,
        inserted,
        overall_score = snapshot.overall_score,
        total_prompts_checked = snapshot.total_prompts_checked,
        total_mentions = snapshot.total_mentions,
        "visibility snapshot written"
    );

    Ok(AggregateOutcome {
        snapshot_created: true,
        snapshot: Some(snapshot),
    })
}

/// Fold a day's results into snapshot metrics. `None` for an empty day.
#[must_use]
pub fn compute_snapshot(
    brand_id: Uuid,
    date: NaiveDate,
    results: &[PromptResult],
) -> Option<VisibilitySnapshot> {
    let overall_score = rounded_mean(results.iter().map(|r| r.visibility_score))?;
    let total = results.len();

    let mut snapshot = VisibilitySnapshot {
        brand_id,
        date,
        chatgpt_score: None,
        perplexity_score: None,
        google_aio_score: None,
        overall_score,
        sentiment_positive: 0.0,
        sentiment_neutral: 0.0,
        sentiment_negative: 0.0,
        total_mentions: saturating_u32(results.iter().filter(|r| r.brand_mentioned).count()),
        total_prompts_checked: saturating_u32(total),
        competitor_data: competitor_data(results),
    };

    for engine in Engine::ALL {
        let scores = results
            .iter()
            .filter(|r| r.engine == engine)
            .map(|r| r.visibility_score);
        snapshot.set_engine_score(engine, rounded_mean(scores));
    }

    let mut sentiment = SentimentBreakdown::default();
    for result in results {
        sentiment.record(result.sentiment_label);
    }
    snapshot.sentiment_positive = percentage(sentiment.positive, total);
    snapshot.sentiment_neutral = percentage(sentiment.neutral, total);
    snapshot.sentiment_negative = percentage(sentiment.negative, total);

    Some(snapshot)
}

fn competitor_data(results: &[PromptResult]) -> BTreeMap<String, CompetitorStats> {
    let mut data: BTreeMap<String, CompetitorStats> = BTreeMap::new();
    for mention in results.iter().flat_map(|r| &r.competitor_mentions) {
        let stats = data.entry(mention.name.clone()).or_default();
        stats.mentions += 1;
        stats.sentiment_breakdown.record(mention.sentiment);
    }
    data
}

/// Integer mean rounded half away from zero; `None` for no scores.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn rounded_mean(scores: impl Iterator<Item = u8>) -> Option<u8> {
    let (sum, count) = scores.fold((0u64, 0u64), |(s, c), v| (s + u64::from(v), c + 1));
    if count == 0 {
        return None;
    }
    Some((sum as f64 / count as f64).round() as u8)
}

/// `count / total * 100` to two decimal places.
#[allow(clippy::cast_precision_loss)]
fn percentage(count: u32, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = f64::from(count) / total as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
