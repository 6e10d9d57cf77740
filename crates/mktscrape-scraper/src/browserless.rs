//! JavaScript-rendered page fetches through a Browserless `/content` endpoint.

use std::time::Duration;

use crate::error::ScraperError;

const RENDER_TIMEOUT_SECS: u64 = 30;

pub struct BrowserlessClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for BrowserlessClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserlessClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .finish_non_exhaustive()
    }
}

impl BrowserlessClient {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self, ScraperError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(RENDER_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        })
    }

    /// Fetch fully-rendered HTML for `url`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] on network failure or timeout.
    /// - [`ScraperError::Render`] when Browserless answers with a non-2xx status.
    pub async fn content(&self, url: &str) -> Result<String, ScraperError> {
        let endpoint = format!("{}/content", self.base_url);
        let mut request = self
            .client
            .post(&endpoint)
            .json(&serde_json::json!({ "url": url }));
        if let Some(token) = &self.token {
            request = request.query(&[("token", token)]);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ScraperError::Render {
                url: url.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.text().await?)
    }
}
