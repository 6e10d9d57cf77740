//! In-memory [`Fetcher`] for driving collectors without a network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use mktscrape_core::{AppConfig, DelayRange, DEFAULT_USER_AGENT};
use mktscrape_scraper::{Fetcher, RawResponse, RequestDescriptor, ScraperError};

/// Replays canned responses in order, then `fallback` forever.
pub(crate) struct ScriptedFetcher {
    responses: Mutex<VecDeque<Result<RawResponse, ScraperError>>>,
    fallback: String,
    requests: Mutex<Vec<RequestDescriptor>>,
}

impl ScriptedFetcher {
    pub(crate) fn new(responses: Vec<Result<RawResponse, ScraperError>>, fallback: &str) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            fallback: fallback.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Falls back to an empty PullPush page.
    pub(crate) fn pullpush(responses: Vec<Result<RawResponse, ScraperError>>) -> Self {
        Self::new(responses, r#"{"data": []}"#)
    }

    pub(crate) fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, request: &RequestDescriptor) -> Result<RawResponse, ScraperError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(body(&self.fallback)))
    }
}

pub(crate) fn body(text: &str) -> RawResponse {
    RawResponse {
        status: 200,
        url: "http://scripted.test/".to_string(),
        body: text.to_string(),
    }
}

pub(crate) fn not_found(text: &str) -> RawResponse {
    RawResponse {
        status: 404,
        ..body(text)
    }
}

/// Config pointing every service at `base_url`, with no pacing or retries.
pub(crate) fn app_config(base_url: &str) -> AppConfig {
    let no_delay = DelayRange {
        min_secs: 0,
        max_secs: 0,
    };
    AppConfig {
        log_level: "debug".to_string(),
        request_timeout_secs: 5,
        user_agent: DEFAULT_USER_AGENT.to_string(),
        max_retries: 0,
        retry_backoff_base_secs: 0,
        search_delay: no_delay,
        page_delay: no_delay,
        pullpush_base_url: base_url.to_string(),
        trustpilot_base_url: base_url.to_string(),
        search_base_url: base_url.to_string(),
        aliases_path: None,
        browserless_url: None,
        browserless_token: None,
    }
}
