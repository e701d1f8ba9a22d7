//! Query clients for the monitored AI answer engines.
//!
//! Each engine sits behind the [`EngineClient`] trait. [`build_engine_client`]
//! selects an implementation by engine identifier and wraps it in the
//! [`Retrying`] decorator so every engine gets the same back-off policy.

pub mod chatgpt;
pub mod client;
pub mod error;
pub mod google_aio;
pub mod perplexity;
pub mod retry;

mod citations;

pub use chatgpt::ChatGptClient;
pub use client::{build_engine_client, EngineClient, EngineConfig, EngineResponse};
pub use error::EngineError;
pub use google_aio::GoogleAioClient;
pub use perplexity::PerplexityClient;
pub use retry::Retrying;
