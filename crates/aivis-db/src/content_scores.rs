//! Database operations for the `content_scores` table.

use aivis_core::ContentScoreResult;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::convert::to_json;
use crate::DbError;

/// A row from the `content_scores` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContentScoreRow {
    pub id: Uuid,
    pub url: Option<String>,
    pub overall_score: i32,
    pub structure_score: i32,
    pub readability_score: i32,
    pub freshness_score: i32,
    pub key_content_score: i32,
    pub citation_score: i32,
    pub recommendations: Value,
    pub created_at: DateTime<Utc>,
}

/// Persist one page's content score and return its generated id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_content_score(
    pool: &PgPool,
    url: Option<&str>,
    score: &ContentScoreResult,
) -> Result<Uuid, DbError> {
    let recommendations = to_json("recommendations", &score.recommendations)?;
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO content_scores \
             (id, url, overall_score, structure_score, readability_score, freshness_score, \
              key_content_score, citation_score, recommendations) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(url)
    .bind(i32::from(score.overall_score))
    .bind(i32::from(score.structure_score))
    .bind(i32::from(score.readability_score))
    .bind(i32::from(score.freshness_score))
    .bind(i32::from(score.key_content_score))
    .bind(i32::from(score.citation_score))
    .bind(recommendations)
    .fetch_one(pool)
    .await?;

    tracing::debug!(
        %id,
        url = url.unwrap_or("-"),
        overall = score.overall_score,
        "content score stored"
    );
    Ok(id)
}
