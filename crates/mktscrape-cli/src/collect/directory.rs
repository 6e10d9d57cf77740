use mktscrape_core::{AppConfig, DirectoryRunConfig};
use mktscrape_scraper::{directory, retry_with_backoff, DirectoryLink, Fetcher};
use mktscrape_store::{load_file, persist_file, MergeOutcome, ResultSet};

use super::build_fetcher;

/// Scrape member website links from the listing page into the output CSV.
///
/// # Errors
///
/// Returns an error if the page cannot be fetched, the selector is invalid,
/// or the output file cannot be read or written.
pub(crate) async fn run(config: &AppConfig, run_config: &DirectoryRunConfig) -> anyhow::Result<()> {
    let fetcher = build_fetcher(config, config.page_delay)?;
    let (merge, total) = collect(&fetcher, config, run_config).await?;
    println!(
        "directory: {} links on page, {} new, {total} saved to {}",
        merge.fetched,
        merge.added,
        run_config.output_path.display()
    );
    Ok(())
}

async fn collect<F: Fetcher>(
    fetcher: &F,
    config: &AppConfig,
    run_config: &DirectoryRunConfig,
) -> anyhow::Result<(MergeOutcome, usize)> {
    let request = directory::listing_request(&run_config.listing_url);
    let raw = retry_with_backoff(config.max_retries, config.retry_backoff_base_secs, || {
        fetcher.fetch(&request)
    })
    .await?;

    let links = directory::parse_listing(&raw.body, &run_config.listing_url, &run_config.selector)?;
    if links.is_empty() {
        tracing::warn!(
            url = %run_config.listing_url,
            selector = %run_config.selector,
            "no links matched the selector"
        );
    }

    let mut set: ResultSet<DirectoryLink> = load_file(&run_config.output_path)?;
    let merge = set.merge(links);
    persist_file(&run_config.output_path, &set)?;
    tracing::info!(
        fetched = merge.fetched,
        added = merge.added,
        total = set.len(),
        "directory merged"
    );
    Ok((merge, set.len()))
}
