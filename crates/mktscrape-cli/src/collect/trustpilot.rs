use mktscrape_core::{AppConfig, Direction, Entity, TrustpilotRunConfig, VariationRules};
use mktscrape_scraper::{Fetcher, TrustpilotReviewSource};
use mktscrape_store::CsvStore;

use super::runner::{collect_source, LoopSettings, RunSummary};
use super::{build_fetcher, conclude, load_entities};

/// Collect up to `n_pages` pages of TrustPilot reviews for every website.
///
/// # Errors
///
/// Returns an error if the names list or HTTP client cannot be set up, or if
/// every entity failed.
pub(crate) async fn run(
    config: &AppConfig,
    run_config: &TrustpilotRunConfig,
    rules: &VariationRules,
) -> anyhow::Result<()> {
    let entities = load_entities(&run_config.names_path, &run_config.column_name, rules)?;
    let fetcher = build_fetcher(config, config.page_delay)?;

    let summary = collect(&fetcher, config, run_config, &entities).await;
    conclude(&[summary])
}

async fn collect<F: Fetcher>(
    fetcher: &F,
    config: &AppConfig,
    run_config: &TrustpilotRunConfig,
    entities: &[Entity],
) -> RunSummary {
    for entity in entities.iter().filter(|e| e.domain.is_none()) {
        tracing::warn!(
            entity = %entity.key,
            "not a URL; looking up TrustPilot page by key"
        );
    }

    let source = TrustpilotReviewSource::new(&config.trustpilot_base_url, run_config.n_pages);
    let store = CsvStore::new(&run_config.output_folder);
    // Pages are always walked newest first; the page cap is the only limit.
    let settings = LoopSettings {
        direction: Direction::Backward,
        n_stop: 0,
        max_retries: config.max_retries,
        backoff_base_secs: config.retry_backoff_base_secs,
    };
    collect_source(&source, fetcher, &store, entities, settings).await
}
