//! Best-effort webhook delivery of alert events.

use std::time::Duration;

use aivis_core::AlertEvent;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::error::MonitorError;

const USER_AGENT: &str = "aivis/0.1 (alert-webhook)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed(String),
}

impl DeliveryOutcome {
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered)
    }
}

/// Somewhere alert events can be sent. Delivery never fails the caller; the
/// outcome says whether it landed.
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    async fn deliver(&self, url: &str, event: &AlertEvent) -> DeliveryOutcome;
}

/// JSON body posted to the webhook.
#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    #[serde(rename = "type")]
    pub alert_type: &'a str,
    pub title: &'a str,
    pub body: &'a str,
    pub metadata: &'a serde_json::Value,
    pub timestamp: String,
}

impl<'a> WebhookPayload<'a> {
    #[must_use]
    pub fn new(event: &'a AlertEvent, at: DateTime<Utc>) -> Self {
        Self {
            alert_type: event.alert_type.as_str(),
            title: &event.title,
            body: &event.body,
            metadata: &event.metadata,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Posts alert events as JSON over HTTP. Any 2xx counts as delivered.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
}

impl WebhookNotifier {
    /// # Errors
    ///
    /// Returns [`MonitorError::HttpClient`] if the `reqwest::Client` cannot be
    /// constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, MonitorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AlertNotifier for WebhookNotifier {
    async fn deliver(&self, url: &str, event: &AlertEvent) -> DeliveryOutcome {
        let payload = WebhookPayload::new(event, Utc::now());
        match self.client.post(url).json(&payload).send().await {
            Ok(resp) if resp.status().is_success() => {
                tracing::debug!(url, alert_type = %event.alert_type, "webhook delivered");
                DeliveryOutcome::Delivered
            }
            Ok(resp) => {
                let status = resp.status();
                tracing::warn!(
                    url,
                    alert_type = %event.alert_type,
                    status = %status,
                    "webhook returned non-success"
                );
                DeliveryOutcome::Failed(format!("webhook returned {status}"))
            }
            Err(e) => {
                tracing::warn!(
                    url,
                    alert_type = %event.alert_type,
                    error = %e,
                    "webhook delivery failed"
                );
                DeliveryOutcome::Failed(e.to_string())
            }
        }
    }
}
