pub mod browserless;
pub mod contacts;
pub mod directory;
pub mod error;
pub mod fetch;
mod html;
pub mod rate_limit;
pub mod sources;
pub mod types;

pub use browserless::BrowserlessClient;
pub use contacts::{ContactFindings, CONTACT_KEYWORDS};
pub use error::ScraperError;
pub use fetch::{Fetcher, HttpFetcher, RawResponse, RequestDescriptor};
pub use rate_limit::{is_retriable, retry_with_backoff, Pacing};
pub use sources::{PullPushKind, PullPushSource, SourceAdapter, TrustpilotReviewSource};
pub use types::{ContactRecord, DirectoryLink, RedditComment, RedditSubmission, TrustpilotReview};
