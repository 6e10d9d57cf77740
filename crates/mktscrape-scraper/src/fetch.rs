//! One-request HTTP fetcher with pacing.
//!
//! [`Fetcher`] is the seam between the collection loop and the network: the
//! loop only ever sees [`RequestDescriptor`] in and [`RawResponse`] out, so
//! tests drive it with a scripted in-memory fetcher.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;

use crate::error::ScraperError;
use crate::rate_limit::Pacing;

/// A single GET request, described independently of the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub url: String,
    pub query: Vec<(String, String)>,
    /// Return non-2xx bodies instead of failing, for sources that read
    /// "not found" from the page content.
    pub allow_error_status: bool,
}

impl RequestDescriptor {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            allow_error_status: false,
        }
    }

    #[must_use]
    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn allow_error_status(mut self) -> Self {
        self.allow_error_status = true;
        self
    }

    /// Value of the first query parameter named `key`.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Status, final URL, and text body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub url: String,
    pub body: String,
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Perform exactly one request. Retries belong to the caller.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] on network failure, timeout, or an unreadable body.
    /// - [`ScraperError::RateLimited`] on HTTP 429.
    /// - [`ScraperError::UnexpectedStatus`] on any other non-2xx status, unless
    ///   the request allows error statuses.
    async fn fetch(&self, request: &RequestDescriptor) -> Result<RawResponse, ScraperError>;
}

/// Browser-like headers sent with every request; sites serve bot user agents
/// stripped-down or blocked pages.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,application/json;q=0.9,*/*;q=0.8",
        ),
    );
    headers.insert(
        reqwest::header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(
        reqwest::header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache"),
    );
    headers.insert(reqwest::header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(reqwest::header::DNT, HeaderValue::from_static("1"));
    headers.insert(
        reqwest::header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    headers
}

/// reqwest-backed [`Fetcher`] that waits out its [`Pacing`] after every request.
pub struct HttpFetcher {
    client: Client,
    pacing: Pacing,
}

impl HttpFetcher {
    /// Creates a fetcher with the given request timeout, `User-Agent`, and pacing.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str, pacing: Pacing) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(browser_headers())
            .build()?;
        Ok(Self { client, pacing })
    }

    #[must_use]
    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, ScraperError> {
        let response = self
            .client
            .get(&request.url)
            .query(&request.query)
            .send()
            .await?;
        let status = response.status();
        let url = response.url().to_string();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            let domain = response
                .url()
                .host_str()
                .unwrap_or_default()
                .to_string();
            return Err(ScraperError::RateLimited {
                domain,
                retry_after_secs,
            });
        }

        if !status.is_success() && !request.allow_error_status {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        Ok(RawResponse {
            status: status.as_u16(),
            url,
            body,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &RequestDescriptor) -> Result<RawResponse, ScraperError> {
        let result = self.send(request).await;
        if let Err(e) = &result {
            tracing::debug!(url = %request.url, error = %e, "request failed");
        }
        self.pacing.wait().await;
        result
    }
}
