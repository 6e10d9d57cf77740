//! Reddit comment and submission search through the PullPush archive API.

use std::marker::PhantomData;

use mktscrape_core::{Bookmark, Direction, Entity, Record};
use serde_json::{Map, Value};

use super::{join_url, SourceAdapter, MAX_PAGE_SIZE};
use crate::error::ScraperError;
use crate::fetch::{RawResponse, RequestDescriptor};
use crate::html::preview;
use crate::types::{RedditComment, RedditSubmission};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullPushKind {
    Comments,
    Submissions,
}

impl PullPushKind {
    fn endpoint(self) -> &'static str {
        match self {
            Self::Comments => "comment",
            Self::Submissions => "submission",
        }
    }
}

/// A row type PullPush can produce.
pub trait PullPushRow: Record {
    const KIND: PullPushKind;

    /// Build a row from one `data` object. `None` when the object has no id.
    fn from_object(obj: &Map<String, Value>, search_term: &str) -> Option<Self>;
}

/// `GET {base}/reddit/search/{comment|submission}/?q=..&before|after=..&size=100`.
#[derive(Debug, Clone)]
pub struct PullPushSource<R> {
    base_url: String,
    _row: PhantomData<fn() -> R>,
}

impl PullPushSource<RedditComment> {
    pub fn comments(base_url: impl Into<String>) -> Self {
        Self::new(base_url)
    }
}

impl PullPushSource<RedditSubmission> {
    pub fn submissions(base_url: impl Into<String>) -> Self {
        Self::new(base_url)
    }
}

impl<R: PullPushRow> PullPushSource<R> {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            _row: PhantomData,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PullPushKind {
        R::KIND
    }
}

impl<R: PullPushRow> SourceAdapter for PullPushSource<R> {
    type Row = R;

    fn name(&self) -> &'static str {
        match R::KIND {
            PullPushKind::Comments => "reddit-comments",
            PullPushKind::Submissions => "reddit-submissions",
        }
    }

    fn build_request(
        &self,
        _entity: &Entity,
        variation: &str,
        bookmark: Bookmark,
        direction: Direction,
    ) -> Result<RequestDescriptor, ScraperError> {
        let url = join_url(
            &self.base_url,
            &format!("reddit/search/{}/", R::KIND.endpoint()),
        )?;
        let Bookmark::Timestamp(ts) = bookmark else {
            return Err(ScraperError::InvalidUrl {
                url,
                reason: format!("PullPush needs a timestamp bookmark, got {bookmark:?}"),
            });
        };
        let bound = match direction {
            Direction::Forward => "after",
            Direction::Backward => "before",
        };

        Ok(RequestDescriptor::get(url)
            .param("q", variation)
            .param(bound, ts)
            .param("size", MAX_PAGE_SIZE))
    }

    fn parse(&self, raw: &RawResponse, variation: &str) -> Result<Vec<R>, ScraperError> {
        let value: Value =
            serde_json::from_str(&raw.body).map_err(|_| ScraperError::RateLimitSuspected {
                url: raw.url.clone(),
                body_preview: preview(&raw.body),
            })?;

        let data = value
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| ScraperError::Parse {
                context: format!("PullPush response from {}", raw.url),
                reason: "missing `data` array".to_string(),
            })?;

        let mut rows = Vec::with_capacity(data.len());
        for item in data {
            let Some(obj) = item.as_object() else {
                tracing::warn!(source = self.name(), "skipping non-object result");
                continue;
            };
            match R::from_object(obj, variation) {
                Some(row) => rows.push(row),
                None => tracing::warn!(source = self.name(), "skipping result without id"),
            }
        }
        Ok(rows)
    }
}

fn str_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Integer field; PullPush serves `created_utc` as int, float, or string.
#[allow(clippy::cast_possible_truncation)]
fn int_field(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

fn id_field(obj: &Map<String, Value>) -> Option<String> {
    let id = str_field(obj, "id");
    (!id.is_empty()).then_some(id)
}

impl PullPushRow for RedditComment {
    const KIND: PullPushKind = PullPushKind::Comments;

    fn from_object(obj: &Map<String, Value>, search_term: &str) -> Option<Self> {
        Some(Self {
            id: id_field(obj)?,
            created_utc: int_field(obj, "created_utc"),
            author: str_field(obj, "author"),
            subreddit: str_field(obj, "subreddit"),
            body: str_field(obj, "body"),
            score: int_field(obj, "score"),
            permalink: str_field(obj, "permalink"),
            link_id: str_field(obj, "link_id"),
            parent_id: str_field(obj, "parent_id"),
            search_term: search_term.to_string(),
        })
    }
}

impl PullPushRow for RedditSubmission {
    const KIND: PullPushKind = PullPushKind::Submissions;

    fn from_object(obj: &Map<String, Value>, search_term: &str) -> Option<Self> {
        Some(Self {
            id: id_field(obj)?,
            created_utc: int_field(obj, "created_utc"),
            author: str_field(obj, "author"),
            subreddit: str_field(obj, "subreddit"),
            title: str_field(obj, "title"),
            selftext: str_field(obj, "selftext"),
            score: int_field(obj, "score"),
            num_comments: int_field(obj, "num_comments"),
            url: str_field(obj, "url"),
            permalink: str_field(obj, "permalink"),
            search_term: search_term.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "pullpush_test.rs"]
mod tests;
