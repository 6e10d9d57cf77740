//! Collection command handlers for the CLI.
//!
//! Each handler resolves its entities, builds a paced fetcher, and drives the
//! shared collection loop. Per-entity failures are logged and recorded in the
//! run summary rather than propagated, so a single bad entity does not abort
//! the full run.

pub(crate) mod contacts;
pub(crate) mod directory;
pub(crate) mod reddit;
pub(crate) mod runner;
pub(crate) mod trustpilot;

#[cfg(test)]
pub(crate) mod test_support;

use std::path::Path;

use mktscrape_core::{load_names_list, AppConfig, DelayRange, Entity, VariationRules};
use mktscrape_scraper::{HttpFetcher, Pacing};

use runner::RunSummary;

/// Read the names list and resolve each identifier into an entity.
pub(crate) fn load_entities(
    names_path: &Path,
    column: &str,
    rules: &VariationRules,
) -> anyhow::Result<Vec<Entity>> {
    let names = load_names_list(names_path, column)?;
    let entities: Vec<Entity> = names
        .iter()
        .map(|raw| Entity::resolve(raw, rules))
        .collect();
    tracing::info!(
        names = entities.len(),
        path = %names_path.display(),
        "loaded names list"
    );
    Ok(entities)
}

/// HTTP fetcher with the configured timeout and user agent, pacing every
/// request by `delay`.
pub(crate) fn build_fetcher(config: &AppConfig, delay: DelayRange) -> anyhow::Result<HttpFetcher> {
    Ok(HttpFetcher::new(
        config.request_timeout_secs,
        &config.user_agent,
        Pacing::from_range(delay),
    )?)
}

/// Print every summary and turn an aborted or fully failed run into an error.
pub(crate) fn conclude(summaries: &[RunSummary]) -> anyhow::Result<()> {
    for summary in summaries {
        println!("{summary}");
    }

    if let Some(reason) = summaries.iter().find_map(|s| s.aborted.as_deref()) {
        anyhow::bail!("run aborted: {reason}");
    }
    if let Some(failed) = summaries.iter().find(|s| s.all_failed()) {
        anyhow::bail!(
            "all {} entities failed for {}",
            failed.outcomes.len(),
            failed.source
        );
    }
    Ok(())
}
