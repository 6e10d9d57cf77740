//! Source adapters: how one data source is queried and parsed.
//!
//! An adapter never performs I/O. It turns (entity, variation, bookmark) into
//! a [`RequestDescriptor`] and a [`RawResponse`] into typed rows; the
//! collection loop owns fetching, retries, merging, and persistence.

pub mod pullpush;
pub mod trustpilot;

use mktscrape_core::{Bookmark, Direction, Entity, Record};
use mktscrape_store::ResultSet;

use crate::error::ScraperError;
use crate::fetch::{RawResponse, RequestDescriptor};

pub use pullpush::{PullPushKind, PullPushRow, PullPushSource};
pub use trustpilot::TrustpilotReviewSource;

/// PullPush rejects larger pages.
pub const MAX_PAGE_SIZE: u32 = 100;

pub trait SourceAdapter {
    type Row: Record;

    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Query strings to run for `entity`.
    fn variations(&self, entity: &Entity) -> Vec<String> {
        entity.variations.clone()
    }

    /// Where the next request for `variation` should start. `cycle` is the
    /// 0-based fetch cycle within this run.
    fn bookmark(
        &self,
        set: &ResultSet<Self::Row>,
        variation: &str,
        direction: Direction,
        cycle: u32,
    ) -> Bookmark {
        let _ = cycle;
        set.compute_bookmark(variation, direction)
    }

    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] when the request cannot be formed.
    fn build_request(
        &self,
        entity: &Entity,
        variation: &str,
        bookmark: Bookmark,
        direction: Direction,
    ) -> Result<RequestDescriptor, ScraperError>;

    /// Parse a response into rows tagged with `variation` as their search term.
    ///
    /// # Errors
    ///
    /// Returns an error when the body is not the expected structure. An empty
    /// result is `Ok(vec![])`.
    fn parse(&self, raw: &RawResponse, variation: &str) -> Result<Vec<Self::Row>, ScraperError>;

    /// `true` when the response marks the end of the available pages.
    fn is_end_of_pages(&self, raw: &RawResponse) -> bool {
        let _ = raw;
        false
    }

    /// Upper bound on fetch cycles per entity, for page-capped sources.
    fn max_cycles(&self) -> Option<u32> {
        None
    }
}

/// Parse `base` joined with `path` as an absolute URL.
pub(crate) fn join_url(base: &str, path: &str) -> Result<String, ScraperError> {
    let url = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    reqwest::Url::parse(&url)
        .map(|u| u.to_string())
        .map_err(|e| ScraperError::InvalidUrl {
            url,
            reason: e.to_string(),
        })
}
