//! Typed row schemas, one per source. CSV column order follows field order.

use mktscrape_core::Record;
use serde::{Deserialize, Serialize};

/// A Reddit comment as returned by the PullPush comment search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedditComment {
    pub id: String,
    pub created_utc: Option<i64>,
    pub author: String,
    pub subreddit: String,
    pub body: String,
    pub score: Option<i64>,
    pub permalink: String,
    pub link_id: String,
    pub parent_id: String,
    pub search_term: String,
}

/// A Reddit submission (post) as returned by the PullPush submission search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedditSubmission {
    pub id: String,
    pub created_utc: Option<i64>,
    pub author: String,
    pub subreddit: String,
    pub title: String,
    pub selftext: String,
    pub score: Option<i64>,
    pub num_comments: Option<i64>,
    pub url: String,
    pub permalink: String,
    pub search_term: String,
}

/// One TrustPilot review card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustpilotReview {
    pub id: String,
    pub star_rating: Option<u8>,
    pub review_title: String,
    pub review_content: String,
    /// RFC 3339 timestamp of the review.
    pub date_of_rating: String,
    pub date_of_experience: String,
    pub reviewer_name: String,
    pub num_reviews: Option<u32>,
    pub country: String,
    pub review_link: String,
    pub profile_link: String,
    pub search_term: String,
}

/// Contact details found for one website. List fields are `; `-joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    /// The website URL.
    pub id: String,
    pub name: String,
    pub emails: String,
    pub phones: String,
    pub addresses: String,
    pub search_term: String,
}

/// A member website link scraped from a directory listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryLink {
    /// The linked URL.
    pub id: String,
    /// The listing page the link was found on.
    pub search_term: String,
}

impl Record for RedditComment {
    fn id(&self) -> &str {
        &self.id
    }
    fn search_term(&self) -> &str {
        &self.search_term
    }
    fn timestamp(&self) -> Option<i64> {
        self.created_utc
    }
}

impl Record for RedditSubmission {
    fn id(&self) -> &str {
        &self.id
    }
    fn search_term(&self) -> &str {
        &self.search_term
    }
    fn timestamp(&self) -> Option<i64> {
        self.created_utc
    }
}

impl Record for TrustpilotReview {
    fn id(&self) -> &str {
        &self.id
    }
    fn search_term(&self) -> &str {
        &self.search_term
    }
    fn timestamp(&self) -> Option<i64> {
        chrono::DateTime::parse_from_rfc3339(&self.date_of_rating)
            .ok()
            .map(|dt| dt.timestamp())
    }
}

impl Record for ContactRecord {
    fn id(&self) -> &str {
        &self.id
    }
    fn search_term(&self) -> &str {
        &self.search_term
    }
    fn timestamp(&self) -> Option<i64> {
        None
    }
}

impl ContactRecord {
    /// Keep `previous` values for every list this lookup came back empty on.
    pub fn fill_blanks_from(&mut self, previous: &ContactRecord) {
        for (field, kept) in [
            (&mut self.emails, &previous.emails),
            (&mut self.phones, &previous.phones),
            (&mut self.addresses, &previous.addresses),
        ] {
            if field.trim().is_empty() {
                field.clone_from(kept);
            }
        }
    }
}

impl Record for DirectoryLink {
    fn id(&self) -> &str {
        &self.id
    }
    fn search_term(&self) -> &str {
        &self.search_term
    }
    fn timestamp(&self) -> Option<i64> {
        None
    }
}
