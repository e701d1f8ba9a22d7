//! `score-content` command handler.

use std::path::Path;

use anyhow::Context;

/// Score an HTML file and print the result as JSON, optionally persisting it.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the insert fails.
pub(crate) async fn run_score_content(
    pool: Option<&sqlx::PgPool>,
    file: &Path,
    url: Option<&str>,
) -> anyhow::Result<()> {
    let markup = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let score = aivis_scoring::score_content(&markup, url);
    println!("{}", serde_json::to_string_pretty(&score)?);

    if let Some(pool) = pool {
        let id = aivis_db::insert_content_score(pool, url, &score).await?;
        tracing::info!(%id, overall = score.overall_score, "content score saved");
    }
    Ok(())
}
