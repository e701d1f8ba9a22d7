//! Trend alerts between consecutive daily snapshots.
//!
//! Each check compares today's snapshot with the most recent earlier one and
//! is gated by its own toggle. With no earlier snapshot nothing triggers.

use std::collections::BTreeSet;

use aivis_core::{AlertEvent, AlertSettings, AlertType, VisibilitySnapshot};
use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use crate::error::MonitorError;
use crate::store::MonitorStore;
use crate::webhook::AlertNotifier;

/// Relative drop in overall score, in percent, that must be exceeded.
pub const VISIBILITY_DROP_THRESHOLD_PCT: f64 = 10.0;
/// Change in positive or negative share, in percentage points, that triggers.
pub const SENTIMENT_SHIFT_THRESHOLD_PP: f64 = 5.0;

/// Evaluate alerts for `(brand_id, date)` and deliver each triggered event
/// to the brand's webhook, if one is configured.
///
/// Returns the triggered events whether or not delivery succeeded. A missing
/// snapshot for `date` yields no events.
///
/// # Errors
///
/// Returns [`MonitorError::Storage`] if settings or snapshots cannot be read.
pub async fn evaluate_alerts<S, N>(
    store: &S,
    notifier: &N,
    brand_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<AlertEvent>, MonitorError>
where
    S: MonitorStore + ?Sized,
    N: AlertNotifier + ?Sized,
{
    let settings = store.alert_settings(brand_id).await?;
    let Some(current) = store.snapshot_for_day(brand_id, date).await? else {
        tracing::info!(%brand_id, %date, "no snapshot for day; alerts skipped");
        return Ok(Vec::new());
    };
    let previous = store.previous_snapshot(brand_id, date).await?;

    let events = detect_alerts(&settings, &current, previous.as_ref());

    for event in &events {
        tracing::info!(
            %brand_id,
            %date,
            alert_type = %event.alert_type,
            title = %event.title,
            "alert triggered"
        );
        if let Some(url) = settings.webhook_url.as_deref() {
            let outcome = notifier.deliver(url, event).await;
            tracing::debug!(
                %brand_id,
                alert_type = %event.alert_type,
                delivered = outcome.is_delivered(),
                "alert webhook attempted"
            );
        }
    }

    Ok(events)
}

/// Compare `current` against `previous` and return every enabled check that
/// fires, in the order drop, new mention, sentiment shift, new competitor.
#[must_use]
pub fn detect_alerts(
    settings: &AlertSettings,
    current: &VisibilitySnapshot,
    previous: Option<&VisibilitySnapshot>,
) -> Vec<AlertEvent> {
    let Some(previous) = previous else {
        tracing::debug!(brand_id = %current.brand_id, "no baseline snapshot; no alerts");
        return Vec::new();
    };

    let checks: [(AlertType, Check); 4] = [
        (AlertType::VisibilityDrop, visibility_drop),
        (AlertType::NewMention, new_mention),
        (AlertType::SentimentShift, sentiment_shift),
        (AlertType::CompetitorNew, competitor_new),
    ];

    checks
        .into_iter()
        .filter(|(alert_type, _)| settings.is_enabled(*alert_type))
        .filter_map(|(alert_type, check)| {
            let event = check(current, previous);
            tracing::debug!(
                brand_id = %current.brand_id,
                %alert_type,
                triggered = event.is_some(),
                "alert check evaluated"
            );
            event
        })
        .collect()
}

type Check = fn(&VisibilitySnapshot, &VisibilitySnapshot) -> Option<AlertEvent>;

fn event(
    alert_type: AlertType,
    title: String,
    body: String,
    metadata: serde_json::Value,
) -> AlertEvent {
    AlertEvent {
        alert_type,
        title,
        body,
        severity: alert_type.severity(),
        metadata,
    }
}

fn visibility_drop(curr: &VisibilitySnapshot, prev: &VisibilitySnapshot) -> Option<AlertEvent> {
    if prev.overall_score == 0 {
        return None;
    }
    let before = f64::from(prev.overall_score);
    let after = f64::from(curr.overall_score);
    let drop_pct = (before - after) / before * 100.0;
    if drop_pct <= VISIBILITY_DROP_THRESHOLD_PCT {
        return None;
    }
    Some(event(
        AlertType::VisibilityDrop,
        format!("Visibility dropped {drop_pct:.1}%"),
        format!(
            "Overall visibility fell from {} on {} to {} on {}.",
            prev.overall_score, prev.date, curr.overall_score, curr.date
        ),
        json!({
            "brand_id": curr.brand_id,
            "date": curr.date,
            "previous_score": prev.overall_score,
            "current_score": curr.overall_score,
            "drop_pct": drop_pct,
        }),
    ))
}

fn new_mention(curr: &VisibilitySnapshot, prev: &VisibilitySnapshot) -> Option<AlertEvent> {
    if curr.total_mentions <= prev.total_mentions {
        return None;
    }
    let gained = curr.total_mentions - prev.total_mentions;
    Some(event(
        AlertType::NewMention,
        format!("{gained} new brand mention(s)"),
        format!(
            "AI engines mentioned the brand {} time(s) on {}, up from {} on {}.",
            curr.total_mentions, curr.date, prev.total_mentions, prev.date
        ),
        json!({
            "brand_id": curr.brand_id,
            "date": curr.date,
            "previous_mentions": prev.total_mentions,
            "current_mentions": curr.total_mentions,
        }),
    ))
}

fn sentiment_shift(curr: &VisibilitySnapshot, prev: &VisibilitySnapshot) -> Option<AlertEvent> {
    let positive_delta = curr.sentiment_positive - prev.sentiment_positive;
    let negative_delta = curr.sentiment_negative - prev.sentiment_negative;
    if positive_delta.abs() < SENTIMENT_SHIFT_THRESHOLD_PP
        && negative_delta.abs() < SENTIMENT_SHIFT_THRESHOLD_PP
    {
        return None;
    }
    Some(event(
        AlertType::SentimentShift,
        "Sentiment shifted".to_string(),
        format!(
            "Positive share moved {positive_delta:+.2} pp to {:.2}%; negative share moved \
             {negative_delta:+.2} pp to {:.2}%.",
            curr.sentiment_positive, curr.sentiment_negative
        ),
        json!({
            "brand_id": curr.brand_id,
            "date": curr.date,
            "positive_delta": positive_delta,
            "negative_delta": negative_delta,
            "current_positive": curr.sentiment_positive,
            "current_negative": curr.sentiment_negative,
        }),
    ))
}

fn competitor_new(curr: &VisibilitySnapshot, prev: &VisibilitySnapshot) -> Option<AlertEvent> {
    let previous: BTreeSet<&str> = prev.competitor_data.keys().map(String::as_str).collect();
    let appeared: Vec<&str> = curr
        .competitor_data
        .keys()
        .map(String::as_str)
        .filter(|name| !previous.contains(name))
        .collect();
    if appeared.is_empty() {
        return None;
    }
    Some(event(
        AlertType::CompetitorNew,
        "New competitor in AI answers".to_string(),
        format!("Newly appearing competitors: {}.", appeared.join(", ")),
        json!({
            "brand_id": curr.brand_id,
            "date": curr.date,
            "competitors": appeared,
        }),
    ))
}

#[cfg(test)]
#[path = "alerts_test.rs"]
mod tests;
