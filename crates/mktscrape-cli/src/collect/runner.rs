//! Shared collection loop for incremental sources.
//!
//! For each entity: load its snapshot, then repeat fetch cycles over all of
//! its name variations until the row limit is passed, a cycle adds nothing
//! new, or the source's page cap is reached. Every non-empty batch is merged
//! and persisted before the next request, so an interrupted run loses at most
//! the in-flight cycle.

use std::fmt;

use mktscrape_core::{Direction, Entity};
use mktscrape_scraper::{retry_with_backoff, Fetcher, ScraperError, SourceAdapter};
use mktscrape_store::CsvStore;

/// Terminal (or current) state of one entity in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntityState {
    Collecting,
    StoppedAtLimit,
    Exhausted,
    Failed,
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Collecting => "collecting",
            Self::StoppedAtLimit => "stopped at limit",
            Self::Exhausted => "exhausted",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// What happened to one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EntityOutcome {
    pub key: String,
    pub state: EntityState,
    pub cycles: u32,
    /// Rows returned by the source this run.
    pub fetched: usize,
    /// Rows whose id was not held before.
    pub added: usize,
    /// Rows held after the run.
    pub total: usize,
    pub error: Option<String>,
}

impl EntityOutcome {
    pub(crate) fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            state: EntityState::Collecting,
            cycles: 0,
            fetched: 0,
            added: 0,
            total: 0,
            error: None,
        }
    }
}

/// Aggregated outcomes of one source run; printed at the end of every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub source: &'static str,
    pub outcomes: Vec<EntityOutcome>,
    /// Set when the run stopped early; entities after the failing one were
    /// not attempted.
    pub aborted: Option<String>,
    pub skipped: usize,
}

impl RunSummary {
    pub(crate) fn new(source: &'static str) -> Self {
        Self {
            source,
            outcomes: Vec::new(),
            aborted: None,
            skipped: 0,
        }
    }

    pub(crate) fn count(&self, state: EntityState) -> usize {
        self.outcomes.iter().filter(|o| o.state == state).count()
    }

    pub(crate) fn total_added(&self) -> usize {
        self.outcomes.iter().map(|o| o.added).sum()
    }

    /// `true` when at least one entity was attempted and every one failed.
    pub(crate) fn all_failed(&self) -> bool {
        !self.outcomes.is_empty() && self.count(EntityState::Failed) == self.outcomes.len()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} summary ==", self.source)?;
        for o in &self.outcomes {
            write!(
                f,
                "  {:<24} {:<16} +{} new of {} fetched, {} total, {} cycles",
                o.key, o.state, o.added, o.fetched, o.total, o.cycles
            )?;
            if let Some(err) = &o.error {
                write!(f, " ({err})")?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "  {} entities: {} exhausted, {} at limit, {} failed; {} new rows",
            self.outcomes.len(),
            self.count(EntityState::Exhausted),
            self.count(EntityState::StoppedAtLimit),
            self.count(EntityState::Failed),
            self.total_added()
        )?;
        if let Some(reason) = &self.aborted {
            write!(
                f,
                "\n  run aborted, {} entities not attempted: {reason}",
                self.skipped
            )?;
        }
        Ok(())
    }
}

/// Loop settings shared by every entity in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LoopSettings {
    pub direction: Direction,
    /// Stop once an entity holds more than this many rows; `0` means unlimited.
    pub n_stop: usize,
    pub max_retries: u32,
    pub backoff_base_secs: u64,
}

/// Run `source` over every entity in order and summarize the result.
///
/// A failure for one entity marks it [`EntityState::Failed`] and the run
/// continues. [`ScraperError::RateLimitSuspected`] stops the run instead:
/// every further request would extend the block.
pub(crate) async fn collect_source<S, F>(
    source: &S,
    fetcher: &F,
    store: &CsvStore,
    entities: &[Entity],
    settings: LoopSettings,
) -> RunSummary
where
    S: SourceAdapter,
    F: Fetcher,
{
    let mut summary = RunSummary::new(source.name());

    for (i, entity) in entities.iter().enumerate() {
        tracing::info!(entity = %entity.key, source = source.name(), "collecting");
        let mut outcome = EntityOutcome::new(&entity.key);

        match collect_entity(source, fetcher, store, entity, settings, &mut outcome).await {
            Ok(state) => outcome.state = state,
            Err(e) => {
                outcome.state = EntityState::Failed;
                outcome.error = Some(format!("{e:#}"));
                tracing::error!(
                    entity = %entity.key,
                    source = source.name(),
                    error = %e,
                    "collection failed; progress so far is kept"
                );

                let suspected = matches!(
                    e.downcast_ref::<ScraperError>(),
                    Some(ScraperError::RateLimitSuspected { .. })
                );
                if suspected {
                    summary.aborted = Some(format!(
                        "{e}. The API appears to be blocking requests; wait a few minutes \
                         or lengthen MKTSCRAPE_SEARCH_DELAY_MIN_SECS/MAX_SECS"
                    ));
                    summary.skipped = entities.len() - i - 1;
                    summary.outcomes.push(outcome);
                    break;
                }
            }
        }

        tracing::info!(
            entity = %entity.key,
            source = source.name(),
            state = %outcome.state,
            added = outcome.added,
            total = outcome.total,
            "entity done"
        );
        summary.outcomes.push(outcome);
    }

    summary
}

async fn collect_entity<S, F>(
    source: &S,
    fetcher: &F,
    store: &CsvStore,
    entity: &Entity,
    settings: LoopSettings,
    outcome: &mut EntityOutcome,
) -> anyhow::Result<EntityState>
where
    S: SourceAdapter,
    F: Fetcher,
{
    let mut set = store.load::<S::Row>(&entity.key)?;
    outcome.total = set.len();
    let variations = source.variations(entity);
    let mut cycle = 0u32;

    loop {
        if settings.n_stop > 0 && set.len() > settings.n_stop {
            return Ok(EntityState::StoppedAtLimit);
        }
        if source.max_cycles().is_some_and(|max| cycle >= max) {
            return Ok(EntityState::StoppedAtLimit);
        }

        let mut batch = Vec::new();
        for variation in &variations {
            let bookmark = source.bookmark(&set, variation, settings.direction, cycle);
            let request =
                source.build_request(entity, variation, bookmark, settings.direction)?;
            let raw = retry_with_backoff(settings.max_retries, settings.backoff_base_secs, || {
                fetcher.fetch(&request)
            })
            .await?;

            if source.is_end_of_pages(&raw) {
                tracing::debug!(entity = %entity.key, variation = %variation, "end of pages");
                continue;
            }
            batch.extend(source.parse(&raw, variation)?);
        }

        let merge = set.merge(batch);
        if merge.fetched > 0 {
            store.persist(&entity.key, &set)?;
        }

        cycle += 1;
        outcome.cycles = cycle;
        outcome.fetched += merge.fetched;
        outcome.added += merge.added;
        outcome.total = set.len();
        tracing::info!(
            entity = %entity.key,
            source = source.name(),
            cycle,
            fetched = merge.fetched,
            added = merge.added,
            total = set.len(),
            "cycle complete"
        );

        if merge.added == 0 {
            return Ok(EntityState::Exhausted);
        }
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
