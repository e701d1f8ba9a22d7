mod content;
mod monitor;
mod snapshots;

use std::path::PathBuf;

use aivis_core::{AlertType, AppConfig, ConfigError};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Parser)]
#[command(name = "aivis-cli")]
#[command(about = "AI visibility monitoring command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Score an HTML page for answer-engine readiness
    ScoreContent {
        /// Path to the HTML file
        file: PathBuf,

        /// Source URL of the page, recorded with the score
        #[arg(long)]
        url: Option<String>,

        /// Persist the score to the database
        #[arg(long)]
        save: bool,
    },
    /// Process a saved engine response for a roster brand and print the result
    Analyze {
        /// Brand name as listed in the roster file
        #[arg(long)]
        brand: String,

        /// Engine that produced the response (chatgpt, perplexity, google_aio)
        #[arg(long)]
        engine: String,

        /// Path to the response text
        file: PathBuf,

        /// URL the engine cited; repeat for several
        #[arg(long = "citation")]
        citations: Vec<String>,

        /// Brand roster YAML
        #[arg(long, env = "AIVIS_BRANDS_PATH", default_value = "./config/brands.yaml")]
        brands: PathBuf,
    },
    /// Query AI engines with a prompt, process the answers and store them
    Query {
        /// Brand name as listed in the roster file
        #[arg(long)]
        brand: String,

        #[arg(long)]
        brand_id: Uuid,

        #[arg(long)]
        prompt_id: Uuid,

        /// Engine to query; repeat to query several concurrently
        #[arg(long = "engine", required = true)]
        engines: Vec<String>,

        #[arg(long)]
        prompt: String,

        /// Print the processed results without writing to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Aggregate a brand's prompt results for one day into a snapshot
    Aggregate {
        #[arg(long)]
        brand_id: Uuid,

        /// Day to aggregate (YYYY-MM-DD); defaults to today in UTC
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Evaluate trend alerts for a brand's snapshot
    Alerts {
        #[arg(long)]
        brand_id: Uuid,

        /// Snapshot day (YYYY-MM-DD); defaults to today in UTC
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Store a brand's alert toggles and webhook; unlisted alert types stay on
    SetAlerts {
        #[arg(long)]
        brand_id: Uuid,

        /// Alert type to switch off (visibility_drop, new_mention, sentiment_shift,
        /// competitor_new); repeat for several
        #[arg(long = "disable")]
        disabled: Vec<AlertType>,

        /// URL that receives triggered alerts as JSON POSTs
        #[arg(long)]
        webhook_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    // Only commands that need the database or an engine require a valid config.
    let config = aivis_core::load_app_config();
    let log_level = config
        .as_ref()
        .map_or(DEFAULT_LOG_LEVEL, |c| c.log_level.as_str());
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Migrate) => {
            let config = require_config(&config)?;
            let pool = connect(config).await?;
            let applied = aivis_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        Some(Commands::ScoreContent { file, url, save }) => {
            let pool = if save {
                Some(connect(require_config(&config)?).await?)
            } else {
                None
            };
            content::run_score_content(pool.as_ref(), &file, url.as_deref()).await?;
        }
        Some(Commands::Analyze {
            brand,
            engine,
            file,
            citations,
            brands,
        }) => {
            monitor::run_analyze(&brands, &brand, &engine, &file, &citations)?;
        }
        Some(Commands::Query {
            brand,
            brand_id,
            prompt_id,
            engines,
            prompt,
            dry_run,
        }) => {
            let config = require_config(&config)?;
            let pool = if dry_run {
                None
            } else {
                Some(connect(config).await?)
            };
            let request = monitor::QueryRequest {
                brand: &brand,
                brand_id,
                prompt_id,
                engines: &engines,
                prompt: &prompt,
            };
            monitor::run_query(config, pool.as_ref(), &request).await?;
        }
        Some(Commands::Aggregate { brand_id, date }) => {
            let config = require_config(&config)?;
            let pool = connect(config).await?;
            snapshots::run_aggregate(pool, brand_id, date.unwrap_or_else(today)).await?;
        }
        Some(Commands::Alerts { brand_id, date }) => {
            let config = require_config(&config)?;
            let pool = connect(config).await?;
            snapshots::run_alerts(config, pool, brand_id, date.unwrap_or_else(today)).await?;
        }
        Some(Commands::SetAlerts {
            brand_id,
            disabled,
            webhook_url,
        }) => {
            let config = require_config(&config)?;
            let pool = connect(config).await?;
            snapshots::run_set_alerts(&pool, brand_id, &disabled, webhook_url).await?;
        }
        None => println!("aivis-cli: run with --help to list commands"),
    }

    Ok(())
}

fn require_config(config: &Result<AppConfig, ConfigError>) -> anyhow::Result<&AppConfig> {
    config
        .as_ref()
        .map_err(|e| anyhow::anyhow!("configuration error: {e}"))
}

async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = aivis_db::PoolConfig::from_app_config(config);
    let pool = aivis_db::connect_pool(&config.database_url, pool_config).await?;
    aivis_db::ping(&pool).await?;
    tracing::debug!(env = %config.env, "database connection ready");
    Ok(pool)
}

fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
