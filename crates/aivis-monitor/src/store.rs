//! Storage seam for the aggregator and the alert evaluator.

use std::collections::HashMap;

use aivis_core::{AlertSettings, PromptResult, VisibilitySnapshot};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::MonitorError;

/// The storage calls needed to aggregate a day and evaluate alerts.
#[async_trait]
pub trait MonitorStore: Send + Sync {
    /// All of a brand's prompt results created on `date` (UTC).
    async fn results_for_day(
        &self,
        brand_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<PromptResult>, MonitorError>;

    /// Insert or overwrite the snapshot for its `(brand_id, date)` key.
    /// Returns `true` when a new row was created.
    async fn upsert_snapshot(&self, snapshot: &VisibilitySnapshot) -> Result<bool, MonitorError>;

    async fn snapshot_for_day(
        &self,
        brand_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<VisibilitySnapshot>, MonitorError>;

    /// The most recent snapshot dated strictly before `date`.
    async fn previous_snapshot(
        &self,
        brand_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<VisibilitySnapshot>, MonitorError>;

    async fn alert_settings(&self, brand_id: Uuid) -> Result<AlertSettings, MonitorError>;
}

// ---------------------------------------------------------------------------
// Postgres
// ---------------------------------------------------------------------------

/// [`MonitorStore`] over the `aivis-db` Postgres tables.
#[derive(Debug, Clone)]
pub struct PgMonitorStore {
    pool: PgPool,
}

impl PgMonitorStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MonitorStore for PgMonitorStore {
    async fn results_for_day(
        &self,
        brand_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<PromptResult>, MonitorError> {
        Ok(aivis_db::list_prompt_results_for_day(&self.pool, brand_id, date).await?)
    }

    async fn upsert_snapshot(&self, snapshot: &VisibilitySnapshot) -> Result<bool, MonitorError> {
        Ok(aivis_db::upsert_visibility_snapshot(&self.pool, snapshot).await?)
    }

    async fn snapshot_for_day(
        &self,
        brand_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<VisibilitySnapshot>, MonitorError> {
        Ok(aivis_db::get_visibility_snapshot(&self.pool, brand_id, date).await?)
    }

    async fn previous_snapshot(
        &self,
        brand_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<VisibilitySnapshot>, MonitorError> {
        Ok(aivis_db::get_previous_snapshot(&self.pool, brand_id, date).await?)
    }

    async fn alert_settings(&self, brand_id: Uuid) -> Result<AlertSettings, MonitorError> {
        Ok(aivis_db::get_alert_settings(&self.pool, brand_id).await?)
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemoryState {
    results: Vec<PromptResult>,
    snapshots: HashMap<(Uuid, NaiveDate), VisibilitySnapshot>,
    settings: HashMap<Uuid, AlertSettings>,
}

/// In-memory [`MonitorStore`] for tests and dry runs. All access goes through
/// one mutex, so upserts for the same key are serialized.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_result(&self, result: PromptResult) {
        self.state.lock().await.results.push(result);
    }

    pub async fn insert_snapshot(&self, snapshot: VisibilitySnapshot) {
        self.state
            .lock()
            .await
            .snapshots
            .insert((snapshot.brand_id, snapshot.date), snapshot);
    }

    pub async fn set_alert_settings(&self, brand_id: Uuid, settings: AlertSettings) {
        self.state.lock().await.settings.insert(brand_id, settings);
    }

    /// Number of snapshot rows stored for a brand.
    pub async fn snapshot_count(&self, brand_id: Uuid) -> usize {
        self.state
            .lock()
            .await
            .snapshots
            .keys()
            .filter(|(id, _)| *id == brand_id)
            .count()
    }
}

#[async_trait]
impl MonitorStore for MemoryStore {
    async fn results_for_day(
        &self,
        brand_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<PromptResult>, MonitorError> {
        let state = self.state.lock().await;
        Ok(state
            .results
            .iter()
            .filter(|r| r.brand_id == brand_id && r.created_at.date_naive() == date)
            .cloned()
            .collect())
    }

    async fn upsert_snapshot(&self, snapshot: &VisibilitySnapshot) -> Result<bool, MonitorError> {
        let mut state = self.state.lock().await;
        let previous = state
            .snapshots
            .insert((snapshot.brand_id, snapshot.date), snapshot.clone());
        Ok(previous.is_none())
    }

    async fn snapshot_for_day(
        &self,
        brand_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<VisibilitySnapshot>, MonitorError> {
        Ok(self
            .state
            .lock()
            .await
            .snapshots
            .get(&(brand_id, date))
            .cloned())
    }

    async fn previous_snapshot(
        &self,
        brand_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<VisibilitySnapshot>, MonitorError> {
        let state = self.state.lock().await;
        Ok(state
            .snapshots
            .values()
            .filter(|s| s.brand_id == brand_id && s.date < date)
            .max_by_key(|s| s.date)
            .cloned())
    }

    async fn alert_settings(&self, brand_id: Uuid) -> Result<AlertSettings, MonitorError> {
        Ok(self
            .state
            .lock()
            .await
            .settings
            .get(&brand_id)
            .cloned()
            .unwrap_or_default())
    }
}
