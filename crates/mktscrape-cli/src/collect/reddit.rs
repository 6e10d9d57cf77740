use mktscrape_core::{AppConfig, Entity, RedditRunConfig, VariationRules};
use mktscrape_scraper::{Fetcher, PullPushSource, RedditComment, RedditSubmission};
use mktscrape_store::CsvStore;

use super::runner::{collect_source, LoopSettings, RunSummary};
use super::{build_fetcher, conclude, load_entities};

/// Collect Reddit comments and/or submissions for every name in the list.
///
/// # Errors
///
/// Returns an error if the names list or HTTP client cannot be set up, if
/// PullPush starts blocking requests, or if every entity failed.
pub(crate) async fn run(
    config: &AppConfig,
    run_config: &RedditRunConfig,
    rules: &VariationRules,
) -> anyhow::Result<()> {
    let entities = load_entities(&run_config.names_path, &run_config.column_name, rules)?;
    let fetcher = build_fetcher(config, config.search_delay)?;

    let summaries = collect(&fetcher, config, run_config, &entities).await;
    conclude(&summaries)
}

async fn collect<F: Fetcher>(
    fetcher: &F,
    config: &AppConfig,
    run_config: &RedditRunConfig,
    entities: &[Entity],
) -> Vec<RunSummary> {
    let settings = LoopSettings {
        direction: run_config.direction,
        n_stop: run_config.n_stop,
        max_retries: config.max_retries,
        backoff_base_secs: config.retry_backoff_base_secs,
    };
    let mut summaries = Vec::new();

    if run_config.choice.includes_comments() {
        let source = PullPushSource::<RedditComment>::comments(&config.pullpush_base_url);
        let store = CsvStore::new(&run_config.comments_output_folder);
        let summary = collect_source(&source, fetcher, &store, entities, settings).await;
        let aborted = summary.aborted.is_some();
        summaries.push(summary);
        if aborted {
            tracing::warn!("comments run aborted; skipping submissions");
            return summaries;
        }
    }

    if run_config.choice.includes_submissions() {
        let source = PullPushSource::<RedditSubmission>::submissions(&config.pullpush_base_url);
        let store = CsvStore::new(&run_config.submissions_output_folder);
        summaries.push(collect_source(&source, fetcher, &store, entities, settings).await);
    }

    summaries
}
