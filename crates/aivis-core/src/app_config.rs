use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub brands_path: PathBuf,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub openai_api_key: Option<String>,
    pub perplexity_api_key: Option<String>,
    pub serpapi_api_key: Option<String>,
    pub engine_timeout_secs: u64,
    pub engine_max_retries: u32,
    pub engine_backoff_base_ms: u64,
    pub webhook_timeout_secs: u64,
}

fn redact(secret: Option<&String>) -> Option<&'static str> {
    secret.map(|_| "[redacted]")
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("brands_path", &self.brands_path)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("openai_api_key", &redact(self.openai_api_key.as_ref()))
            .field(
                "perplexity_api_key",
                &redact(self.perplexity_api_key.as_ref()),
            )
            .field("serpapi_api_key", &redact(self.serpapi_api_key.as_ref()))
            .field("engine_timeout_secs", &self.engine_timeout_secs)
            .field("engine_max_retries", &self.engine_max_retries)
            .field("engine_backoff_base_ms", &self.engine_backoff_base_ms)
            .field("webhook_timeout_secs", &self.webhook_timeout_secs)
            .finish()
    }
}
