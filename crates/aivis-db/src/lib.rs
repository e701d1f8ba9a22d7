//! Postgres storage for prompt results, daily visibility snapshots, content
//! scores and per-brand alert settings.

use std::collections::HashSet;
use std::str::FromStr;
use std::time::Duration;

use aivis_core::AppConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

// Resolved relative to this crate's Cargo.toml: <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

/// Connection pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_secs: 10,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections,
            acquire_timeout_secs: config.db_acquire_timeout_secs,
        }
    }

    /// Read `AIVIS_DB_*` overrides; unset or unparseable values keep the default.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_connections: env_or("AIVIS_DB_MAX_CONNECTIONS", defaults.max_connections),
            min_connections: env_or("AIVIS_DB_MIN_CONNECTIONS", defaults.min_connections),
            acquire_timeout_secs: env_or(
                "AIVIS_DB_ACQUIRE_TIMEOUT_SECS",
                defaults.acquire_timeout_secs,
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,
    /// A stored value could not be mapped back onto its domain type.
    #[error("invalid {column} in stored row: {reason}")]
    InvalidRow { column: &'static str, reason: String },
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Open a pool against `database_url`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if no connection can be established.
pub async fn connect_pool(database_url: &str, config: PoolConfig) -> Result<PgPool, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// [`connect_pool`] with the URL from `DATABASE_URL` and sizing from
/// [`PoolConfig::from_env`].
///
/// # Errors
///
/// Returns [`DbError::MissingDatabaseUrl`] if `DATABASE_URL` is unset, or
/// [`DbError::Sqlx`] if no connection can be established.
pub async fn connect_pool_from_env() -> Result<PgPool, DbError> {
    let database_url = std::env::var("DATABASE_URL").map_err(|_| DbError::MissingDatabaseUrl)?;
    connect_pool(&database_url, PoolConfig::from_env()).await
}

/// Apply pending migrations and return how many were newly applied.
///
/// # Errors
///
/// Returns [`DbError::Migration`] if any migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<usize, DbError> {
    // Missing on a fresh database, which simply means nothing is applied yet.
    let already_applied: HashSet<i64> =
        sqlx::query_scalar::<_, i64>("SELECT version FROM _sqlx_migrations WHERE success")
            .fetch_all(pool)
            .await
            .map(|versions| versions.into_iter().collect())
            .unwrap_or_default();

    MIGRATOR.run(pool).await?;

    let applied = MIGRATOR
        .iter()
        .filter(|m| !already_applied.contains(&m.version))
        .count();
    tracing::info!(applied, known = MIGRATOR.iter().count(), "migrations complete");
    Ok(applied)
}

/// Round-trip a trivial query to confirm the pool can reach the server.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

fn env_or<T: FromStr>(var: &str, default: T) -> T {
    std::env::var(var)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}


mod convert;

pub mod alert_settings;
pub mod content_scores;
pub mod prompt_results;
pub mod snapshots;

pub use alert_settings::{get_alert_settings, upsert_alert_settings, AlertSettingsRow};
pub use content_scores::{insert_content_score, ContentScoreRow};
pub use prompt_results::{insert_prompt_result, list_prompt_results_for_day, PromptResultRow};
pub use snapshots::{
    get_previous_snapshot, get_visibility_snapshot, upsert_visibility_snapshot,
    VisibilitySnapshotRow,
};
