//! In-memory result set for one entity and source: merge and bookmark logic.

use std::collections::{HashMap, HashSet};

use mktscrape_core::{Bookmark, Direction, Record};

/// Counts from one [`ResultSet::merge`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Rows in the supplied batch.
    pub fetched: usize,
    /// Batch rows whose `id` was not held before.
    pub added: usize,
    /// Held rows overwritten by a batch row with the same `id`.
    pub replaced: usize,
}

/// All rows collected so far for one entity and source, unique by `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet<R> {
    rows: Vec<R>,
}

impl<R> Default for ResultSet<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<R: Record> ResultSet<R> {
    /// Build a set from rows in storage order, collapsing duplicate ids (last wins).
    #[must_use]
    pub fn from_rows(rows: Vec<R>) -> Self {
        let mut set = Self::default();
        set.merge(rows);
        set
    }

    #[must_use]
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn contains_id(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&R> {
        self.rows.iter().find(|r| r.id() == id)
    }

    /// Concatenate `new_rows` after the held rows and keep only the last
    /// occurrence of each `id`.
    ///
    /// Surviving rows are ordered by the position of their last occurrence,
    /// so merging the same batch twice yields the same set.
    pub fn merge(&mut self, new_rows: Vec<R>) -> MergeOutcome {
        let before: HashSet<String> = self.rows.iter().map(|r| r.id().to_string()).collect();
        let held = self.rows.len();
        let fetched = new_rows.len();

        let mut combined = std::mem::take(&mut self.rows);
        combined.extend(new_rows);

        let mut last_index: HashMap<String, usize> = HashMap::with_capacity(combined.len());
        for (i, row) in combined.iter().enumerate() {
            last_index.insert(row.id().to_string(), i);
        }

        let mut batch_ids: HashSet<String> = HashSet::new();
        self.rows = combined
            .into_iter()
            .enumerate()
            .filter(|(i, row)| last_index.get(row.id()) == Some(i))
            .map(|(i, row)| {
                if i >= held {
                    batch_ids.insert(row.id().to_string());
                }
                row
            })
            .collect();

        let added = batch_ids.iter().filter(|id| !before.contains(*id)).count();
        MergeOutcome {
            fetched,
            added,
            replaced: batch_ids.len() - added,
        }
    }

    /// Bookmark for `variation` using the current wall clock as "now".
    #[must_use]
    pub fn compute_bookmark(&self, variation: &str, direction: Direction) -> Bookmark {
        self.compute_bookmark_at(variation, direction, chrono::Utc::now().timestamp())
    }

    /// Bookmark for `variation`: max (forward) or min (backward) timestamp of
    /// its rows, or `now` when no row for the variation carries a timestamp.
    #[must_use]
    pub fn compute_bookmark_at(&self, variation: &str, direction: Direction, now: i64) -> Bookmark {
        let stamps = self
            .rows
            .iter()
            .filter(|r| r.search_term() == variation)
            .filter_map(R::timestamp);

        let boundary = match direction {
            Direction::Forward => stamps.max(),
            Direction::Backward => stamps.min(),
        };
        Bookmark::Timestamp(boundary.unwrap_or(now))
    }
}

#[cfg(test)]
#[path = "result_set_test.rs"]
mod tests;
