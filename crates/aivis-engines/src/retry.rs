//! Retry with exponential back-off and jitter for engine queries.
//!
//! [`Retrying`] wraps any [`EngineClient`] and retries transient failures
//! (network errors, 5xx, 429). Auth failures, malformed bodies, and
//! configuration errors are returned immediately.

use std::future::Future;
use std::time::Duration;

use aivis_core::Engine;
use async_trait::async_trait;

use crate::client::{EngineClient, EngineResponse};
use crate::error::EngineError;

const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
pub(crate) fn is_retriable(err: &EngineError) -> bool {
    match err {
        EngineError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        EngineError::UnexpectedStatus { status, .. } => *status >= 500,
        EngineError::RateLimited { .. } => true,
        EngineError::Deserialize { .. }
        | EngineError::MalformedResponse { .. }
        | EngineError::MissingApiKey(_)
        | EngineError::UnknownEngine(_) => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// Back-off schedule with `backoff_base_ms = 1_000`:
///
/// | Attempt | Sleep before next attempt        |
/// |---------|----------------------------------|
/// | 1       | 1 000 ms × 2⁰ ± 25 % jitter     |
/// | 2       | 1 000 ms × 2¹ ± 25 % jitter     |
/// | 3       | 1 000 ms × 2² ± 25 % jitter     |
///
/// Delay is capped at 60 s. A 429 carrying `Retry-After` waits at least that
/// long (still subject to the cap).
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    engine: Engine,
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, EngineError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, EngineError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let jittered = (computed.min(MAX_DELAY_MS) as f64
                    * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                let floor_ms = match &err {
                    EngineError::RateLimited {
                        retry_after_secs: Some(secs),
                        ..
                    } => secs.saturating_mul(1_000),
                    _ => 0,
                };
                let delay_ms = jittered.max(floor_ms).min(MAX_DELAY_MS);
                tracing::warn!(
                    engine = %engine,
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "engine transient error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

/// Decorator that applies [`retry_with_backoff`] to every query of the
/// wrapped client.
#[derive(Debug)]
pub struct Retrying<C> {
    inner: C,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl<C> Retrying<C> {
    pub fn new(inner: C, max_retries: u32, backoff_base_ms: u64) -> Self {
        Self {
            inner,
            max_retries,
            backoff_base_ms,
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: EngineClient> EngineClient for Retrying<C> {
    fn engine(&self) -> Engine {
        self.inner.engine()
    }

    async fn query(&self, prompt: &str) -> Result<EngineResponse, EngineError> {
        retry_with_backoff(
            self.inner.engine(),
            self.max_retries,
            self.backoff_base_ms,
            || self.inner.query(prompt),
        )
        .await
    }
}
