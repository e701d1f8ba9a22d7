//! Google AI Overviews via the `SerpApi` search endpoint.
//!
//! The overview arrives as a list of text blocks, some of which nest a `list`
//! of further blocks. The answer text is every snippet joined in document
//! order. A search with no AI overview yields an empty answer, not an error.

use aivis_core::Engine;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::citations::dedup;
use crate::client::{build_http_client, normalize_base_url, send_json, EngineClient, EngineResponse};
use crate::error::EngineError;

const DEFAULT_BASE_URL: &str = "https://serpapi.com";

pub struct GoogleAioClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    ai_overview: Option<AiOverview>,
}

#[derive(Debug, Default, Deserialize)]
struct AiOverview {
    #[serde(default)]
    text_blocks: Vec<TextBlock>,
    #[serde(default)]
    references: Vec<Reference>,
}

#[derive(Debug, Deserialize)]
struct TextBlock {
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default)]
    list: Vec<TextBlock>,
}

#[derive(Debug, Deserialize)]
struct Reference {
    #[serde(default)]
    link: Option<String>,
}

fn collect_snippets(blocks: &[TextBlock], out: &mut Vec<String>) {
    for block in blocks {
        if let Some(snippet) = block.snippet.as_deref().map(str::trim) {
            if !snippet.is_empty() {
                out.push(snippet.to_owned());
            }
        }
        collect_snippets(&block.list, out);
    }
}

impl GoogleAioClient {
    /// Creates a client pointed at the production `SerpApi` endpoint.
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
        })
    }
}

#[async_trait]
impl EngineClient for GoogleAioClient {
    fn engine(&self) -> Engine {
        Engine::GoogleAio
    }

    async fn query(&self, prompt: &str) -> Result<EngineResponse, EngineError> {
        let url = format!("{}/search.json", self.base_url);
        let request = self.client.get(&url).query(&[
            ("engine", "google"),
            ("q", prompt),
            ("api_key", self.api_key.as_str()),
        ]);

        let response: SearchResponse = send_json(Engine::GoogleAio, request).await?;
        let Some(overview) = response.ai_overview else {
            tracing::debug!(engine = %Engine::GoogleAio, "no AI overview for query");
            return Ok(EngineResponse {
                engine: Engine::GoogleAio,
                text: String::new(),
                citation_urls: Vec::new(),
            });
        };

        let mut snippets = Vec::new();
        collect_snippets(&overview.text_blocks, &mut snippets);
        let text = snippets.join("\n");
        let citation_urls = dedup(overview.references.into_iter().filter_map(|r| r.link));

        tracing::debug!(
            engine = %Engine::GoogleAio,
            chars = text.len(),
            citations = citation_urls.len(),
            "engine query complete"
        );
        Ok(EngineResponse {
            engine: Engine::GoogleAio,
            text,
            citation_urls,
        })
    }
}
