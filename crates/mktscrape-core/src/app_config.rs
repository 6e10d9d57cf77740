use std::path::PathBuf;

/// Inclusive delay range in seconds applied after each request to one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min_secs: u64,
    pub max_secs: u64,
}

/// Process-wide settings read from the environment.
///
/// Built once in `main` and passed down explicitly; nothing reads env vars
/// after startup.
#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub search_delay: DelayRange,
    pub page_delay: DelayRange,
    pub pullpush_base_url: String,
    pub trustpilot_base_url: String,
    pub search_base_url: String,
    pub aliases_path: Option<PathBuf>,
    pub browserless_url: Option<String>,
    pub browserless_token: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("search_delay", &self.search_delay)
            .field("page_delay", &self.page_delay)
            .field("pullpush_base_url", &self.pullpush_base_url)
            .field("trustpilot_base_url", &self.trustpilot_base_url)
            .field("search_base_url", &self.search_base_url)
            .field("aliases_path", &self.aliases_path)
            .field("browserless_url", &self.browserless_url)
            .field(
                "browserless_token",
                &self.browserless_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
