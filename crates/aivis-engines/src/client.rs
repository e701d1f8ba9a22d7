//! The engine-client seam and the factory that picks an implementation.

use std::time::Duration;

use aivis_core::{AppConfig, Engine};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::EngineError;
use crate::{ChatGptClient, GoogleAioClient, PerplexityClient, Retrying};

const USER_AGENT: &str = "aivis/0.1 (ai-visibility-monitor)";
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// One engine's answer to one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineResponse {
    pub engine: Engine,
    pub text: String,
    pub citation_urls: Vec<String>,
}

/// Anything that can put a prompt to an AI answer engine.
#[async_trait]
pub trait EngineClient: Send + Sync {
    fn engine(&self) -> Engine;

    /// Send `prompt` and return the engine's answer text and citations.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] on transport failure, non-2xx status, or an
    /// unparseable body.
    async fn query(&self, prompt: &str) -> Result<EngineResponse, EngineError>;
}

#[async_trait]
impl<T: EngineClient + ?Sized> EngineClient for Box<T> {
    fn engine(&self) -> Engine {
        (**self).engine()
    }

    async fn query(&self, prompt: &str) -> Result<EngineResponse, EngineError> {
        (**self).query(prompt).await
    }
}

/// Credentials and HTTP policy shared by all engine clients.
#[derive(Clone)]
pub struct EngineConfig {
    pub openai_api_key: Option<String>,
    pub perplexity_api_key: Option<String>,
    pub serpapi_api_key: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl EngineConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            openai_api_key: config.openai_api_key.clone(),
            perplexity_api_key: config.perplexity_api_key.clone(),
            serpapi_api_key: config.serpapi_api_key.clone(),
            timeout_secs: config.engine_timeout_secs,
            max_retries: config.engine_max_retries,
            backoff_base_ms: config.engine_backoff_base_ms,
        }
    }

    fn api_key(&self, engine: Engine) -> Result<&str, EngineError> {
        let key = match engine {
            Engine::ChatGpt => self.openai_api_key.as_deref(),
            Engine::Perplexity => self.perplexity_api_key.as_deref(),
            Engine::GoogleAio => self.serpapi_api_key.as_deref(),
        };
        key.ok_or(EngineError::MissingApiKey(engine))
    }
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |k: &Option<String>| k.as_ref().map(|_| "[redacted]");
        f.debug_struct("EngineConfig")
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("perplexity_api_key", &redact(&self.perplexity_api_key))
            .field("serpapi_api_key", &redact(&self.serpapi_api_key))
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .finish()
    }
}

/// Build the client for an engine identifier (`chatgpt`, `perplexity`,
/// `google_aio`), wrapped in the retry decorator.
///
/// # Errors
///
/// - [`EngineError::UnknownEngine`] for an unrecognized identifier.
/// - [`EngineError::MissingApiKey`] when the engine's key is not configured.
/// - [`EngineError::Http`] if the HTTP client cannot be built.
pub fn build_engine_client(
    identifier: &str,
    config: &EngineConfig,
) -> Result<Box<dyn EngineClient>, EngineError> {
    let engine: Engine = identifier.parse()?;
    let api_key = config.api_key(engine)?;
    let timeout = config.timeout_secs;

    let client: Box<dyn EngineClient> = match engine {
        Engine::ChatGpt => Box::new(Retrying::new(
            ChatGptClient::new(api_key, timeout)?,
            config.max_retries,
            config.backoff_base_ms,
        )),
        Engine::Perplexity => Box::new(Retrying::new(
            PerplexityClient::new(api_key, timeout)?,
            config.max_retries,
            config.backoff_base_ms,
        )),
        Engine::GoogleAio => Box::new(Retrying::new(
            GoogleAioClient::new(api_key, timeout)?,
            config.max_retries,
            config.backoff_base_ms,
        )),
    };
    Ok(client)
}

pub(crate) fn build_http_client(timeout_secs: u64) -> Result<Client, EngineError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?)
}

/// Strip trailing slashes so endpoint paths can be appended with `/`.
pub(crate) fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Send a request and decode a JSON body, mapping status codes to
/// [`EngineError`] variants.
pub(crate) async fn send_json<T: DeserializeOwned>(
    engine: Engine,
    request: RequestBuilder,
) -> Result<T, EngineError> {
    let response = request.send().await?;
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        return Err(EngineError::RateLimited {
            engine,
            retry_after_secs,
        });
    }
    if !status.is_success() {
        return Err(EngineError::UnexpectedStatus {
            engine,
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| EngineError::Deserialize {
        context: format!("{engine} response"),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EngineConfig {
        EngineConfig {
            openai_api_key: Some("sk-test".to_string()),
            perplexity_api_key: None,
            serpapi_api_key: Some("serp".to_string()),
            timeout_secs: 5,
            max_retries: 0,
            backoff_base_ms: 0,
        }
    }

    #[test]
    fn factory_selects_engine_by_identifier() {
        let client = build_engine_client("chatgpt", &config()).unwrap();
        assert_eq!(client.engine(), Engine::ChatGpt);
        let client = build_engine_client("google_aio", &config()).unwrap();
        assert_eq!(client.engine(), Engine::GoogleAio);
    }

    #[test]
    fn factory_rejects_unknown_engine() {
        let result = build_engine_client("bard", &config());
        assert!(matches!(result, Err(EngineError::UnknownEngine(_))));
    }

    #[test]
    fn factory_requires_api_key() {
        let result = build_engine_client("perplexity", &config());
        assert!(matches!(
            result,
            Err(EngineError::MissingApiKey(Engine::Perplexity))
        ));
    }

    #[test]
    fn debug_redacts_keys() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("sk-test"));
        assert!(rendered.contains("[redacted]"));
    }

    #[test]
    fn base_url_trailing_slashes_are_trimmed() {
        assert_eq!(normalize_base_url("http://x//"), "http://x");
        assert_eq!(normalize_base_url("http://x"), "http://x");
    }
}
