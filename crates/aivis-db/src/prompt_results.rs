//! Database operations for the `prompt_results` table.

use aivis_core::{Engine, PromptResult, SentimentLabel};
use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::convert::{
    count_from_db, count_to_db, decimal_from_f64, decimal_to_f64, from_json, score_from_db,
    to_json,
};
use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `prompt_results` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PromptResultRow {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub prompt_id: Uuid,
    pub engine: String,
    pub response_text: String,
    pub brand_mentioned: bool,
    pub mention_position: Option<i32>,
    pub mention_count: i32,
    pub sentiment_score: Decimal,
    pub sentiment_label: String,
    pub competitor_mentions: Value,
    pub visibility_score: i32,
    pub citation_urls: Value,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PromptResultRow> for PromptResult {
    type Error = DbError;

    fn try_from(row: PromptResultRow) -> Result<Self, Self::Error> {
        let engine: Engine = row.engine.parse().map_err(|e| DbError::InvalidRow {
            column: "engine",
            reason: format!("{e}"),
        })?;
        let sentiment_label: SentimentLabel =
            row.sentiment_label
                .parse()
                .map_err(|reason| DbError::InvalidRow {
                    column: "sentiment_label",
                    reason,
                })?;
        let mention_position = row
            .mention_position
            .map(|p| count_from_db("mention_position", p))
            .transpose()?;

        Ok(PromptResult {
            id: row.id,
            brand_id: row.brand_id,
            prompt_id: row.prompt_id,
            engine,
            response_text: row.response_text,
            brand_mentioned: row.brand_mentioned,
            mention_position,
            mention_count: count_from_db("mention_count", row.mention_count)?,
            sentiment_score: decimal_to_f64(row.sentiment_score),
            sentiment_label,
            competitor_mentions: from_json("competitor_mentions", row.competitor_mentions)?,
            visibility_score: score_from_db("visibility_score", row.visibility_score)?,
            citation_urls: from_json("citation_urls", row.citation_urls)?,
            created_at: row.created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert one processed engine response. Prompt results are immutable once
/// written, so a duplicate `id` is an error rather than an update.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails, or [`DbError::InvalidRow`]
/// if a JSON column cannot be encoded.
pub async fn insert_prompt_result(pool: &PgPool, result: &PromptResult) -> Result<(), DbError> {
    let competitor_mentions = to_json("competitor_mentions", &result.competitor_mentions)?;
    let citation_urls = to_json("citation_urls", &result.citation_urls)?;

    sqlx::query(
        "INSERT INTO prompt_results \
             (id, brand_id, prompt_id, engine, response_text, brand_mentioned, \
              mention_position, mention_count, sentiment_score, sentiment_label, \
              competitor_mentions, visibility_score, citation_urls, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
    )
    .bind(result.id)
    .bind(result.brand_id)
    .bind(result.prompt_id)
    .bind(result.engine.as_str())
    .bind(&result.response_text)
    .bind(result.brand_mentioned)
    .bind(result.mention_position.map(count_to_db))
    .bind(count_to_db(result.mention_count))
    .bind(decimal_from_f64(result.sentiment_score, 4))
    .bind(result.sentiment_label.as_str())
    .bind(competitor_mentions)
    .bind(i32::from(result.visibility_score))
    .bind(citation_urls)
    .bind(result.created_at)
    .execute(pool)
    .await?;

    tracing::debug!(
        id = %result.id,
        brand_id = %result.brand_id,
        engine = %result.engine,
        visibility_score = result.visibility_score,
        "prompt result stored"
    );
    Ok(())
}

/// All of a brand's prompt results whose `created_at` falls on `date` (UTC),
/// oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidRow`]
/// if a stored row cannot be decoded.
pub async fn list_prompt_results_for_day(
    pool: &PgPool,
    brand_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<PromptResult>, DbError> {
    let (start, end) = day_bounds(date);
    let rows = sqlx::query_as::<_, PromptResultRow>(
        "SELECT id, brand_id, prompt_id, engine, response_text, brand_mentioned, \
                mention_position, mention_count, sentiment_score, sentiment_label, \
                competitor_mentions, visibility_score, citation_urls, created_at \
         FROM prompt_results \
         WHERE brand_id = $1 AND created_at >= $2 AND created_at < $3 \
         ORDER BY created_at, id",
    )
    .bind(brand_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(PromptResult::try_from).collect()
}

/// Half-open UTC interval `[date 00:00, date+1 00:00)`.
pub(crate) fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
    let next = date.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX);
    let end = next.and_time(chrono::NaiveTime::MIN).and_utc();
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn day_bounds_cover_one_utc_day() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        let (start, end) = day_bounds(date);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 3, 31, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap());
    }

    fn row() -> PromptResultRow {
        PromptResultRow {
            id: Uuid::new_v4(),
            brand_id: Uuid::new_v4(),
            prompt_id: Uuid::new_v4(),
            engine: "perplexity".to_string(),
            response_text: "Acme is great.".to_string(),
            brand_mentioned: true,
            mention_position: Some(1),
            mention_count: 1,
            sentiment_score: Decimal::new(6249, 4),
            sentiment_label: "positive".to_string(),
            competitor_mentions: serde_json::json!([
                { "name": "Globex", "position": 2, "sentiment": "neutral" }
            ]),
            visibility_score: 100,
            citation_urls: serde_json::json!(["https://acme.com"]),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn row_decodes_into_domain_result() {
        let result = PromptResult::try_from(row()).unwrap();
        assert_eq!(result.engine, Engine::Perplexity);
        assert_eq!(result.sentiment_label, SentimentLabel::Positive);
        assert_eq!(result.mention_position, Some(1));
        assert_eq!(result.competitor_mentions.len(), 1);
        assert_eq!(result.competitor_mentions[0].name, "Globex");
        assert!((result.sentiment_score - 0.6249).abs() < 1e-9);
    }

    #[test]
    fn unknown_engine_in_row_is_invalid() {
        let mut bad = row();
        bad.engine = "bard".to_string();
        let err = PromptResult::try_from(bad).unwrap_err();
        assert!(matches!(err, DbError::InvalidRow { column: "engine", .. }));
    }
}
