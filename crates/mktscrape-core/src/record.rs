//! Row model shared by the merge store and the source adapters.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Which way in time a collection run walks from the bookmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Fetch rows newer than the newest row held (`after=` the max timestamp).
    Forward,
    /// Fetch rows older than the oldest row held (`before=` the min timestamp).
    Backward,
}

impl Direction {
    /// `fetch_newest = true` in the run config selects [`Direction::Forward`].
    #[must_use]
    pub fn from_fetch_newest(fetch_newest: bool) -> Self {
        if fetch_newest {
            Self::Forward
        } else {
            Self::Backward
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Backward => write!(f, "backward"),
        }
    }
}

/// Boundary of previously collected data for one (entity, name variation).
///
/// Always recomputed from the persisted rows, never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bookmark {
    /// Epoch seconds.
    Timestamp(i64),
    /// 1-based page number for page-oriented sources.
    Page(u32),
}

/// One persisted row. Implemented by every source's typed row schema.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Stable dedup key.
    fn id(&self) -> &str;

    /// Name variation that produced the row.
    fn search_term(&self) -> &str;

    /// Epoch seconds used for bookmarking; `None` when the row has no usable time.
    fn timestamp(&self) -> Option<i64>;
}
