//! Contact-info waterfall.
//!
//! Stages run in order and stop as soon as an email is known:
//! TrustPilot contact box, search snippet, root page, keyword subpages,
//! then a Browserless render of the root page.

use std::path::Path;

use mktscrape_core::{AppConfig, ContactsRunConfig, Entity, VariationRules};
use mktscrape_scraper::contacts::{search, site, trustpilot};
use mktscrape_scraper::{
    retry_with_backoff, BrowserlessClient, ContactFindings, ContactRecord, Fetcher, RawResponse,
    RequestDescriptor, ScraperError,
};
use mktscrape_store::{load_file, persist_file, ResultSet};

use super::runner::{EntityOutcome, EntityState, RunSummary};
use super::{build_fetcher, conclude, load_entities};

/// Look up contact details for every website and merge them into one CSV.
///
/// # Errors
///
/// Returns an error if the names list, HTTP clients, or existing output file
/// cannot be loaded, or if every website failed to persist.
pub(crate) async fn run(
    config: &AppConfig,
    run_config: &ContactsRunConfig,
    rules: &VariationRules,
) -> anyhow::Result<()> {
    let entities = load_entities(&run_config.names_path, &run_config.column_name, rules)?;
    let fetcher = build_fetcher(config, config.page_delay)?;
    let renderer = match &config.browserless_url {
        Some(url) => Some(BrowserlessClient::new(
            url,
            config.browserless_token.as_deref(),
        )?),
        None => {
            tracing::info!("MKTSCRAPE_BROWSERLESS_URL not set; render stage disabled");
            None
        }
    };

    let waterfall = Waterfall {
        fetcher: &fetcher,
        renderer: renderer.as_ref(),
        trustpilot_base_url: &config.trustpilot_base_url,
        search_base_url: &config.search_base_url,
        max_retries: config.max_retries,
        backoff_base_secs: config.retry_backoff_base_secs,
    };

    let summary = collect(&waterfall, &run_config.output_path, &entities).await?;
    conclude(&[summary])
}

async fn collect<F: Fetcher>(
    waterfall: &Waterfall<'_, F>,
    output_path: &Path,
    entities: &[Entity],
) -> anyhow::Result<RunSummary> {
    let mut set: ResultSet<ContactRecord> = load_file(output_path)?;
    let mut summary = RunSummary::new("contacts");

    for entity in entities {
        let mut outcome = EntityOutcome::new(&entity.key);
        let website = entity.url.as_deref().unwrap_or(&entity.raw);

        let lookup = waterfall.lookup(entity).await;
        outcome.cycles = 1;
        outcome.total = set.len();
        if lookup.all_failed() {
            tracing::error!(
                entity = %entity.key,
                "every lookup stage failed; saved contacts are kept"
            );
            outcome.state = EntityState::Failed;
            outcome.error = lookup.last_error;
            summary.outcomes.push(outcome);
            continue;
        }

        let findings = lookup.findings;
        tracing::info!(
            entity = %entity.key,
            emails = findings.emails.len(),
            phones = findings.phones.len(),
            addresses = findings.addresses.len(),
            "lookup complete"
        );

        let mut record = findings.into_record(website, &entity.key);
        if let Some(previous) = set.get(&record.id) {
            record.fill_blanks_from(previous);
        }
        let merge = set.merge(vec![record]);
        outcome.fetched = merge.fetched;
        outcome.added = merge.added;
        outcome.total = set.len();

        match persist_file(output_path, &set) {
            Ok(()) => outcome.state = EntityState::Exhausted,
            Err(e) => {
                tracing::error!(entity = %entity.key, error = %e, "failed to save contacts");
                outcome.state = EntityState::Failed;
                outcome.error = Some(e.to_string());
            }
        }
        summary.outcomes.push(outcome);
    }

    Ok(summary)
}

/// Findings of one waterfall run and how its stages fared.
#[derive(Debug, Default)]
pub(crate) struct Lookup {
    pub findings: ContactFindings,
    pub succeeded: usize,
    pub last_error: Option<String>,
}

impl Lookup {
    /// `true` when stages ran and none of them got an answer.
    pub(crate) fn all_failed(&self) -> bool {
        self.succeeded == 0 && self.last_error.is_some()
    }

    fn has_email(&self) -> bool {
        self.findings.has_email()
    }

    fn record(
        &mut self,
        entity: &Entity,
        stage: &'static str,
        result: Result<ContactFindings, ScraperError>,
    ) {
        match result {
            Ok(found) => {
                tracing::debug!(entity = %entity.key, stage, empty = found.is_empty(), "stage done");
                self.succeeded += 1;
                self.findings.absorb(found);
            }
            Err(e) => {
                tracing::warn!(entity = %entity.key, stage, error = %e, "stage failed");
                self.last_error = Some(format!("{stage}: {e}"));
            }
        }
    }
}

/// Everything the lookup stages need; borrowed for the length of one run.
pub(crate) struct Waterfall<'a, F> {
    pub fetcher: &'a F,
    pub renderer: Option<&'a BrowserlessClient>,
    pub trustpilot_base_url: &'a str,
    pub search_base_url: &'a str,
    pub max_retries: u32,
    pub backoff_base_secs: u64,
}

impl<F: Fetcher> Waterfall<'_, F> {
    /// Run the stages for one entity. Stage failures are logged and skipped.
    pub(crate) async fn lookup(&self, entity: &Entity) -> Lookup {
        let mut lookup = Lookup::default();

        let profile = entity.domain.as_deref().unwrap_or(&entity.key);
        let stage = self.trustpilot_box(profile).await;
        lookup.record(entity, "trustpilot", stage);
        if lookup.has_email() {
            return lookup;
        }

        let stage = self.search_snippet(&entity.key).await;
        lookup.record(entity, "search", stage);
        if lookup.has_email() {
            return lookup;
        }

        let Some(url) = entity.url.as_deref() else {
            tracing::debug!(entity = %entity.key, "no website; skipping site stages");
            return lookup;
        };

        let root_html = match self.get(RequestDescriptor::get(url)).await {
            Ok(raw) => {
                lookup.record(entity, "root", Ok(site::extract_contacts(&raw.body)));
                Some(raw.body)
            }
            Err(e) => {
                lookup.record(entity, "root", Err(e));
                None
            }
        };
        if lookup.has_email() {
            return lookup;
        }

        if let Some(html) = root_html {
            self.subpages(entity, url, &html, &mut lookup).await;
            if lookup.has_email() {
                return lookup;
            }
        }

        if let Some(renderer) = self.renderer {
            let stage = renderer
                .content(url)
                .await
                .map(|html| site::extract_contacts(&html));
            lookup.record(entity, "render", stage);
        }

        lookup
    }

    async fn trustpilot_box(&self, domain: &str) -> Result<ContactFindings, ScraperError> {
        let raw = self
            .get(trustpilot::profile_request(self.trustpilot_base_url, domain)?)
            .await?;
        trustpilot::parse_contact_box(&raw.body)
    }

    async fn search_snippet(&self, query: &str) -> Result<ContactFindings, ScraperError> {
        let raw = self
            .get(search::snippet_request(self.search_base_url, query)?)
            .await?;
        search::parse_snippet(&raw.body)
    }

    async fn subpages(
        &self,
        entity: &Entity,
        root_url: &str,
        root_html: &str,
        lookup: &mut Lookup,
    ) {
        let links = match site::first_level_links(root_html, root_url) {
            Ok(links) => links,
            Err(e) => {
                lookup.record(entity, "subpages", Err(e));
                return;
            }
        };

        for page in site::contact_pages(links) {
            if lookup.has_email() {
                break;
            }
            let stage = self
                .get(RequestDescriptor::get(&page))
                .await
                .map(|raw| site::extract_contacts(&raw.body));
            lookup.record(entity, "subpages", stage);
        }
    }

    async fn get(&self, request: RequestDescriptor) -> Result<RawResponse, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            self.fetcher.fetch(&request)
        })
        .await
    }
}

#[cfg(test)]
#[path = "contacts_test.rs"]
mod tests;
