//! Shared domain types and configuration for the AI visibility pipeline.

pub mod app_config;
pub mod brands;
pub mod config;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use brands::{load_brands, BrandEntry, BrandsFile, Entity};
pub use config::{load_app_config, load_app_config_from_env};
pub use types::{
    AlertEvent, AlertSettings, AlertType, CompetitorMention, CompetitorStats, ContentScoreResult,
    Engine, MentionResult, PromptResult, SentimentBreakdown, SentimentLabel, SentimentResult,
    Severity, UnknownEngine, VisibilitySnapshot,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read brands file {path}: {source}")]
    BrandsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse brands file: {0}")]
    BrandsFileParse(#[from] serde_yaml::Error),

    #[error("brands validation failed: {0}")]
    Validation(String),
}
