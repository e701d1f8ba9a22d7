//! `aggregate`, `alerts` and `set-alerts` command handlers.

use aivis_core::{AlertSettings, AlertType, AppConfig};
use aivis_monitor::{aggregate_daily_snapshot, evaluate_alerts, PgMonitorStore, WebhookNotifier};
use chrono::NaiveDate;
use uuid::Uuid;

/// Aggregate one brand-day into a snapshot and print the outcome as JSON.
///
/// # Errors
///
/// Returns an error if reading results or writing the snapshot fails.
pub(crate) async fn run_aggregate(
    pool: sqlx::PgPool,
    brand_id: Uuid,
    date: NaiveDate,
) -> anyhow::Result<()> {
    let store = PgMonitorStore::new(pool);
    let outcome = aggregate_daily_snapshot(&store, brand_id, date).await?;

    if !outcome.snapshot_created {
        println!("no prompt results for {brand_id} on {date}; nothing aggregated");
        return Ok(());
    }
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

/// Evaluate trend alerts for one brand-day and print the triggered events.
///
/// # Errors
///
/// Returns an error if the webhook client cannot be built or storage reads
/// fail. Webhook delivery failures are logged, not returned.
pub(crate) async fn run_alerts(
    config: &AppConfig,
    pool: sqlx::PgPool,
    brand_id: Uuid,
    date: NaiveDate,
) -> anyhow::Result<()> {
    let store = PgMonitorStore::new(pool);
    let notifier = WebhookNotifier::new(config.webhook_timeout_secs)?;
    let events = evaluate_alerts(&store, &notifier, brand_id, date).await?;

    if events.is_empty() {
        println!("no alerts for {brand_id} on {date}");
        return Ok(());
    }
    println!("{}", serde_json::to_string_pretty(&events)?);
    Ok(())
}

/// Replace a brand's alert settings: every type on except `disabled`.
///
/// # Errors
///
/// Returns an error if the settings cannot be written.
pub(crate) async fn run_set_alerts(
    pool: &sqlx::PgPool,
    brand_id: Uuid,
    disabled: &[AlertType],
    webhook_url: Option<String>,
) -> anyhow::Result<()> {
    let mut settings = AlertSettings {
        webhook_url: webhook_url.filter(|u| !u.trim().is_empty()),
        ..AlertSettings::default()
    };
    for alert_type in disabled {
        settings.set_enabled(*alert_type, false);
    }

    aivis_db::upsert_alert_settings(pool, brand_id, &settings).await?;
    tracing::info!(
        %brand_id,
        disabled = disabled.len(),
        webhook = settings.webhook_url.is_some(),
        "alert settings saved"
    );
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
