//! `analyze` and `query` command handlers.

use std::path::Path;

use aivis_core::{AppConfig, BrandEntry, BrandsFile, Engine, Entity, PromptResult};
use aivis_engines::{build_engine_client, EngineClient, EngineConfig, EngineError, EngineResponse};
use aivis_monitor::{process_engine_response, ResponseInput};
use aivis_scoring::SentimentAnalyzer;
use anyhow::Context;
use futures::stream::{self, StreamExt};
use uuid::Uuid;

const MAX_CONCURRENT_ENGINES: usize = 3;

fn find_brand<'a>(roster: &'a BrandsFile, name: &str) -> anyhow::Result<&'a BrandEntry> {
    roster
        .find(name)
        .ok_or_else(|| anyhow::anyhow!("brand '{name}' not found in roster"))
}

/// Run the result-processing flow over a saved response and print the
/// resulting prompt result as JSON. Nothing is persisted.
///
/// # Errors
///
/// Returns an error if the roster or response file cannot be read, the brand
/// is not in the roster, or the engine identifier is unknown.
pub(crate) fn run_analyze(
    brands_path: &Path,
    brand_name: &str,
    engine: &str,
    file: &Path,
    citations: &[String],
) -> anyhow::Result<()> {
    let roster = aivis_core::load_brands(brands_path)?;
    let brand = find_brand(&roster, brand_name)?;
    let engine: Engine = engine.parse()?;
    let response = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let analyzer = SentimentAnalyzer::new();
    let entity = brand.entity();
    let result = process_engine_response(
        &analyzer,
        &ResponseInput {
            brand_id: Uuid::nil(),
            prompt_id: Uuid::nil(),
            engine,
            brand: &entity,
            competitors: &brand.competitors,
            response: &response,
            citation_urls: citations,
        },
    );

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub(crate) struct QueryRequest<'a> {
    pub brand: &'a str,
    pub brand_id: Uuid,
    pub prompt_id: Uuid,
    pub engines: &'a [String],
    pub prompt: &'a str,
}

/// Put one prompt to every requested engine concurrently, process each
/// answer, and store the results unless `pool` is `None` (dry run).
///
/// Per-engine failures are logged and skipped; the command fails only when
/// every engine failed.
///
/// # Errors
///
/// Returns an error if the roster cannot be loaded, an engine client cannot
/// be built, an insert fails, or no engine returned an answer.
pub(crate) async fn run_query(
    config: &AppConfig,
    pool: Option<&sqlx::PgPool>,
    request: &QueryRequest<'_>,
) -> anyhow::Result<()> {
    let roster = aivis_core::load_brands(&config.brands_path)?;
    let brand = find_brand(&roster, request.brand)?;
    let entity = brand.entity();

    let engine_config = EngineConfig::from_app_config(config);
    let clients = request
        .engines
        .iter()
        .map(|id| build_engine_client(id, &engine_config))
        .collect::<Result<Vec<_>, _>>()?;

    let answers: Vec<(Engine, Result<EngineResponse, EngineError>)> = stream::iter(&clients)
        .map(|client| async move { (client.engine(), client.query(request.prompt).await) })
        .buffer_unordered(MAX_CONCURRENT_ENGINES)
        .collect()
        .await;

    let analyzer = SentimentAnalyzer::new();
    let mut results: Vec<PromptResult> = Vec::new();
    for (engine, answer) in answers {
        match answer {
            Ok(response) => results.push(process(
                &analyzer,
                request,
                &entity,
                &brand.competitors,
                &response,
            )),
            Err(e) => {
                tracing::error!(engine = %engine, error = %e, "engine query failed");
            }
        }
    }

    if results.is_empty() {
        anyhow::bail!("no engine returned an answer");
    }

    for result in &results {
        if let Some(pool) = pool {
            aivis_db::insert_prompt_result(pool, result).await?;
        }
        tracing::info!(
            engine = %result.engine,
            brand_mentioned = result.brand_mentioned,
            visibility_score = result.visibility_score,
            stored = pool.is_some(),
            "prompt result ready"
        );
    }
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn process(
    analyzer: &SentimentAnalyzer,
    request: &QueryRequest<'_>,
    brand: &Entity,
    competitors: &[Entity],
    response: &EngineResponse,
) -> PromptResult {
    process_engine_response(
        analyzer,
        &ResponseInput {
            brand_id: request.brand_id,
            prompt_id: request.prompt_id,
            engine: response.engine,
            brand,
            competitors,
            response: &response.text,
            citation_urls: &response.citation_urls,
        },
    )
}
