//! Database operations for the `visibility_snapshots` table.
//!
//! One row per `(brand_id, snapshot_date)`. Writes go through a single
//! `INSERT … ON CONFLICT DO UPDATE` so concurrent aggregations for the same
//! key cannot lose each other's update.

use aivis_core::VisibilitySnapshot;
use chrono::{DateTime, NaiveDate, Utc};
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

/// A row from the `visibility_snapshots` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VisibilitySnapshotRow {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub snapshot_date: NaiveDate,
    pub chatgpt_score: Option<i32>,
    pub perplexity_score: Option<i32>,
    pub google_aio_score: Option<i32>,
    pub overall_score: i32,
    pub sentiment_positive: Decimal,
    pub sentiment_neutral: Decimal,
    pub sentiment_negative: Decimal,
    pub total_mentions: i32,
    pub total_prompts_checked: i32,
    pub competitor_data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<VisibilitySnapshotRow> for VisibilitySnapshot {
    type Error = DbError;

    fn try_from(row: VisibilitySnapshotRow) -> Result<Self, Self::Error> {
        let engine_score = |column, value: Option<i32>| {
            value.map(|v| score_from_db(column, v)).transpose()
        };
        Ok(VisibilitySnapshot {
            brand_id: row.brand_id,
            date: row.snapshot_date,
            chatgpt_score: engine_score("chatgpt_score", row.chatgpt_score)?,
            perplexity_score: engine_score("perplexity_score", row.perplexity_score)?,
            google_aio_score: engine_score("google_aio_score", row.google_aio_score)?,
            overall_score: score_from_db("overall_score", row.overall_score)?,
            sentiment_positive: decimal_to_f64(row.sentiment_positive),
            sentiment_neutral: decimal_to_f64(row.sentiment_neutral),
            sentiment_negative: decimal_to_f64(row.sentiment_negative),
            total_mentions: count_from_db("total_mentions", row.total_mentions)?,
            total_prompts_checked: count_from_db(
                "total_prompts_checked",
                row.total_prompts_checked,
            )?,
            competitor_data: from_json("competitor_data", row.competitor_data)?,
        })
    }
}

const SELECT_COLUMNS: &str = "SELECT id, brand_id, snapshot_date, chatgpt_score, perplexity_score, \
            google_aio_score, overall_score, sentiment_positive, sentiment_neutral, \
            sentiment_negative, total_mentions, total_prompts_checked, competitor_data, \
            created_at, updated_at \
     FROM visibility_snapshots";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert the snapshot for `(brand_id, date)`, or overwrite its metric
/// fields if one already exists.
///
/// Returns `true` when a new row was inserted and `false` when an existing
/// row was updated.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the statement fails, or
/// [`DbError::InvalidRow`] if `competitor_data` cannot be encoded.
pub async fn upsert_visibility_snapshot(
    pool: &PgPool,
    snapshot: &VisibilitySnapshot,
) -> Result<bool, DbError> {
    let competitor_data = to_json("competitor_data", &snapshot.competitor_data)?;

    // xmax is zero only on a freshly inserted tuple.
    let inserted: bool = sqlx::query_scalar(
        "INSERT INTO visibility_snapshots \
             (id, brand_id, snapshot_date, chatgpt_score, perplexity_score, google_aio_score, \
              overall_score, sentiment_positive, sentiment_neutral, sentiment_negative, \
              total_mentions, total_prompts_checked, competitor_data) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
         ON CONFLICT (brand_id, snapshot_date) DO UPDATE SET \
             chatgpt_score = EXCLUDED.chatgpt_score, \
             perplexity_score = EXCLUDED.perplexity_score, \
             google_aio_score = EXCLUDED.google_aio_score, \
             overall_score = EXCLUDED.overall_score, \
             sentiment_positive = EXCLUDED.sentiment_positive, \
             sentiment_neutral = EXCLUDED.sentiment_neutral, \
             sentiment_negative = EXCLUDED.sentiment_negative, \
             total_mentions = EXCLUDED.total_mentions, \
             total_prompts_checked = EXCLUDED.total_prompts_checked, \
             competitor_data = EXCLUDED.competitor_data, \
             updated_at = NOW() \
         RETURNING (xmax = 0)",
    )
    .bind(Uuid::new_v4())
    .bind(snapshot.brand_id)
    .bind(snapshot.date)
    .bind(snapshot.chatgpt_score.map(i32::from))
    .bind(snapshot.perplexity_score.map(i32::from))
    .bind(snapshot.google_aio_score.map(i32::from))
    .bind(i32::from(snapshot.overall_score))
    .bind(decimal_from_f64(snapshot.sentiment_positive, 2))
    .bind(decimal_from_f64(snapshot.sentiment_neutral, 2))
    .bind(decimal_from_f64(snapshot.sentiment_negative, 2))
    .bind(count_to_db(snapshot.total_mentions))
    .bind(count_to_db(snapshot.total_prompts_checked))
    .bind(competitor_data)
    .fetch_one(pool)
    .await?;

    Ok(inserted)
}

/// The snapshot for exactly `(brand_id, date)`, if one exists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidRow`]
/// if the stored row cannot be decoded.
pub async fn get_visibility_snapshot(
    pool: &PgPool,
    brand_id: Uuid,
    date: NaiveDate,
) -> Result<Option<VisibilitySnapshot>, DbError> {
    let sql = format!("{SELECT_COLUMNS} WHERE brand_id = $1 AND snapshot_date = $2");
    let row = sqlx::query_as::<_, VisibilitySnapshotRow>(&sql)
        .bind(brand_id)
        .bind(date)
        .fetch_optional(pool)
        .await?;

    row.map(VisibilitySnapshot::try_from).transpose()
}

/// The most recent snapshot dated strictly before `date`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidRow`]
/// if the stored row cannot be decoded.
pub async fn get_previous_snapshot(
    pool: &PgPool,
    brand_id: Uuid,
    date: NaiveDate,
) -> Result<Option<VisibilitySnapshot>, DbError> {
    let sql = format!(
        "{SELECT_COLUMNS} WHERE brand_id = $1 AND snapshot_date < $2 \
         ORDER BY snapshot_date DESC LIMIT 1"
    );
    let row = sqlx::query_as::<_, VisibilitySnapshotRow>(&sql)
        .bind(brand_id)
        .bind(date)
        .fetch_optional(pool)
        .await?;

    row.map(VisibilitySnapshot::try_from).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_decodes_nullable_engine_scores_and_competitors() {
        let row = VisibilitySnapshotRow {
            id: Uuid::new_v4(),
            brand_id: Uuid::new_v4(),
            snapshot_date: NaiveDate::from_ymd_opt(2026, 5, 2).unwrap(),
            chatgpt_score: Some(80),
            perplexity_score: None,
            google_aio_score: Some(40),
            overall_score: 60,
            sentiment_positive: Decimal::new(6667, 2),
            sentiment_neutral: Decimal::new(3333, 2),
            sentiment_negative: Decimal::ZERO,
            total_mentions: 2,
            total_prompts_checked: 3,
            competitor_data: serde_json::json!({
                "Globex": {
                    "mentions": 2,
                    "sentiment_breakdown": { "positive": 1, "neutral": 1, "negative": 0 }
                }
            }),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let snapshot = VisibilitySnapshot::try_from(row).unwrap();
        assert_eq!(snapshot.chatgpt_score, Some(80));
        assert_eq!(snapshot.perplexity_score, None);
        assert_eq!(snapshot.overall_score, 60);
        assert!((snapshot.sentiment_positive - 66.67).abs() < 1e-9);
        assert_eq!(snapshot.competitor_data["Globex"].mentions, 2);
        assert_eq!(
            snapshot.competitor_data["Globex"]
                .sentiment_breakdown
                .neutral,
            1
        );
    }

    #[test]
    fn out_of_range_score_is_invalid() {
        let row = VisibilitySnapshotRow {
            id: Uuid::new_v4(),
            brand_id: Uuid::new_v4(),
            snapshot_date: NaiveDate::from_ymd_opt(2026, 5, 2).unwrap(),
            chatgpt_score: None,
            perplexity_score: None,
            google_aio_score: None,
            overall_score: 140,
            sentiment_positive: Decimal::ZERO,
            sentiment_neutral: Decimal::ZERO,
            sentiment_negative: Decimal::ZERO,
            total_mentions: 0,
            total_prompts_checked: 0,
            competitor_data: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let err = VisibilitySnapshot::try_from(row).unwrap_err();
        assert!(matches!(
            err,
            DbError::InvalidRow {
                column: "overall_score",
                ..
            }
        ));
    }
}
