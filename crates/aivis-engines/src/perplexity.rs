//! Perplexity via its chat-completions API.
//!
//! Perplexity returns its sources in a top-level `citations` array alongside
//! the usual `choices`.

use aivis_core::Engine;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::citations::dedup;
use crate::client::{build_http_client, normalize_base_url, send_json, EngineClient, EngineResponse};
use crate::error::EngineError;

const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";
const DEFAULT_MODEL: &str = "sonar";

pub struct PerplexityClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct PerplexityResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    citations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl PerplexityClient {
    /// Creates a client pointed at the production Perplexity API.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, EngineError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            client: build_http_client(timeout_secs)?,
            api_key: api_key.to_owned(),
            base_url: normalize_base_url(base_url),
            model: DEFAULT_MODEL.to_owned(),
        })
    }
}

#[async_trait]
impl EngineClient for PerplexityClient {
    fn engine(&self) -> Engine {
        Engine::Perplexity
    }

    async fn query(&self, prompt: &str) -> Result<EngineResponse, EngineError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        let request = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body);

        let response: PerplexityResponse = send_json(Engine::Perplexity, request).await?;
        let text = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::MalformedResponse {
                engine: Engine::Perplexity,
                reason: "no choices in completion".to_owned(),
            })?
            .message
            .content
            .unwrap_or_default();

        let citation_urls = dedup(response.citations);
        tracing::debug!(
            engine = %Engine::Perplexity,
            chars = text.len(),
            citations = citation_urls.len(),
            "engine query complete"
        );
        Ok(EngineResponse {
            engine: Engine::Perplexity,
            text,
            citation_urls,
        })
    }
}
