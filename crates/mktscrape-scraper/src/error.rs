use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    /// The API answered 200 with a body that is not the expected JSON. PullPush
    /// does this when it starts blocking a client.
    #[error(
        "suspected rate limiting: {url} returned a non-JSON body ({body_preview:?}); \
         wait before running again"
    )]
    RateLimitSuspected { url: String, body_preview: String },

    #[error("parse error for {context}: {reason}")]
    Parse { context: String, reason: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("render failed for {url}: status {status}: {message}")]
    Render {
        url: String,
        status: u16,
        message: String,
    },
}

impl ScraperError {
    /// `true` for 5xx responses, which are worth another attempt.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::UnexpectedStatus { status, .. } if *status >= 500)
    }
}
