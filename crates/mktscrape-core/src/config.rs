use crate::app_config::{AppConfig, DelayRange};
use crate::ConfigError;

/// Desktop browser user agent; the review and search sites reject obvious bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/109.0.0.0 Safari/537.36 Edg/109.0.1518.78";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can use a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_range = |prefix: &str, min: &str, max: &str| -> Result<DelayRange, ConfigError> {
        let range = DelayRange {
            min_secs: parse_u64(&format!("{prefix}_MIN_SECS"), min)?,
            max_secs: parse_u64(&format!("{prefix}_MAX_SECS"), max)?,
        };
        if range.min_secs > range.max_secs {
            return Err(ConfigError::Validation(format!(
                "{prefix}_MIN_SECS ({}) must not exceed {prefix}_MAX_SECS ({})",
                range.min_secs, range.max_secs
            )));
        }
        Ok(range)
    };

    let log_level = or_default("MKTSCRAPE_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("MKTSCRAPE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("MKTSCRAPE_USER_AGENT", DEFAULT_USER_AGENT);
    let max_retries = parse_u32("MKTSCRAPE_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("MKTSCRAPE_RETRY_BACKOFF_BASE_SECS", "30")?;
    let search_delay = parse_range("MKTSCRAPE_SEARCH_DELAY", "10", "30")?;
    let page_delay = parse_range("MKTSCRAPE_PAGE_DELAY", "2", "5")?;

    let pullpush_base_url = or_default("MKTSCRAPE_PULLPUSH_BASE_URL", "https://api.pullpush.io");
    let trustpilot_base_url = or_default(
        "MKTSCRAPE_TRUSTPILOT_BASE_URL",
        "https://www.trustpilot.com",
    );
    let search_base_url = or_default("MKTSCRAPE_SEARCH_BASE_URL", "https://www.google.com");

    let aliases_path = optional("MKTSCRAPE_ALIASES_PATH").map(PathBuf::from);
    let browserless_url = optional("MKTSCRAPE_BROWSERLESS_URL");
    let browserless_token = optional("MKTSCRAPE_BROWSERLESS_TOKEN");

    Ok(AppConfig {
        log_level,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        search_delay,
        page_delay,
        pullpush_base_url,
        trustpilot_base_url,
        search_base_url,
        aliases_path,
        browserless_url,
        browserless_token,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
