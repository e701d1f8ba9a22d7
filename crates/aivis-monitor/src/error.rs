use aivis_db::DbError;
use thiserror::Error;

/// Errors from the aggregation and alerting flows.
///
/// Webhook delivery failures are not represented here; they are reported as
/// [`crate::DeliveryOutcome::Failed`] and logged.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("storage error: {0}")]
    Storage(#[from] DbError),

    /// The webhook HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}
