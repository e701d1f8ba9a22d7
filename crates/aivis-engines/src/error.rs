use aivis_core::{Engine, UnknownEngine};
use thiserror::Error;

/// Errors returned by engine clients.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The engine answered with a non-2xx status other than 429.
    #[error("{engine} returned unexpected HTTP status {status}")]
    UnexpectedStatus { engine: Engine, status: u16 },

    /// The engine answered 429.
    #[error("rate limited by {engine} (retry after {retry_after_secs:?}s)")]
    RateLimited {
        engine: Engine,
        retry_after_secs: Option<u64>,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The body parsed but did not carry the answer where expected.
    #[error("malformed {engine} response: {reason}")]
    MalformedResponse { engine: Engine, reason: String },

    #[error("no API key configured for {0}")]
    MissingApiKey(Engine),

    #[error(transparent)]
    UnknownEngine(#[from] UnknownEngine),
}
