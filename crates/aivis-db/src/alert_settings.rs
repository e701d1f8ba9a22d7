//! Database operations for the `alert_settings` table.

use aivis_core::AlertSettings;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `alert_settings` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AlertSettingsRow {
    pub brand_id: Uuid,
    pub visibility_drop: bool,
    pub new_mention: bool,
    pub sentiment_shift: bool,
    pub competitor_new: bool,
    pub webhook_url: Option<String>,
}

impl From<AlertSettingsRow> for AlertSettings {
    fn from(row: AlertSettingsRow) -> Self {
        AlertSettings {
            visibility_drop: row.visibility_drop,
            new_mention: row.new_mention,
            sentiment_shift: row.sentiment_shift,
            competitor_new: row.competitor_new,
            webhook_url: row.webhook_url.filter(|u| !u.trim().is_empty()),
        }
    }
}

/// Alert toggles for a brand. A brand with no row gets every alert type
/// enabled and no webhook.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_alert_settings(pool: &PgPool, brand_id: Uuid) -> Result<AlertSettings, DbError> {
    let row = sqlx::query_as::<_, AlertSettingsRow>(
        "SELECT brand_id, visibility_drop, new_mention, sentiment_shift, competitor_new, \
                webhook_url \
         FROM alert_settings \
         WHERE brand_id = $1",
    )
    .bind(brand_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(AlertSettings::from).unwrap_or_default())
}

/// Insert or replace a brand's alert toggles.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the statement fails.
pub async fn upsert_alert_settings(
    pool: &PgPool,
    brand_id: Uuid,
    settings: &AlertSettings,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO alert_settings \
             (brand_id, visibility_drop, new_mention, sentiment_shift, competitor_new, webhook_url) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT (brand_id) DO UPDATE SET \
             visibility_drop = EXCLUDED.visibility_drop, \
             new_mention = EXCLUDED.new_mention, \
             sentiment_shift = EXCLUDED.sentiment_shift, \
             competitor_new = EXCLUDED.competitor_new, \
             webhook_url = EXCLUDED.webhook_url, \
             updated_at = NOW()",
    )
    .bind(brand_id)
    .bind(settings.visibility_drop)
    .bind(settings.new_mention)
    .bind(settings.sentiment_shift)
    .bind(settings.competitor_new)
    .bind(settings.webhook_url.as_deref())
    .execute(pool)
    .await?;

    Ok(())
}
