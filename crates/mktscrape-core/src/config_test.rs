use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(cfg.max_retries, 3);
    assert_eq!(cfg.retry_backoff_base_secs, 30);
    assert_eq!(
        cfg.search_delay,
        DelayRange {
            min_secs: 10,
            max_secs: 30
        }
    );
    assert_eq!(
        cfg.page_delay,
        DelayRange {
            min_secs: 2,
            max_secs: 5
        }
    );
    assert_eq!(cfg.pullpush_base_url, "https://api.pullpush.io");
    assert_eq!(cfg.trustpilot_base_url, "https://www.trustpilot.com");
    assert_eq!(cfg.search_base_url, "https://www.google.com");
    assert!(cfg.aliases_path.is_none());
    assert!(cfg.browserless_url.is_none());
    assert!(cfg.browserless_token.is_none());
}

#[test]
fn request_timeout_override() {
    let mut map = HashMap::new();
    map.insert("MKTSCRAPE_REQUEST_TIMEOUT_SECS", "60");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 60);
}

#[test]
fn request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("MKTSCRAPE_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MKTSCRAPE_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(MKTSCRAPE_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn max_retries_invalid() {
    let mut map = HashMap::new();
    map.insert("MKTSCRAPE_MAX_RETRIES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MKTSCRAPE_MAX_RETRIES"),
        "expected InvalidEnvVar(MKTSCRAPE_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn search_delay_override() {
    let mut map = HashMap::new();
    map.insert("MKTSCRAPE_SEARCH_DELAY_MIN_SECS", "1");
    map.insert("MKTSCRAPE_SEARCH_DELAY_MAX_SECS", "2");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.search_delay,
        DelayRange {
            min_secs: 1,
            max_secs: 2
        }
    );
}

#[test]
fn inverted_delay_range_is_rejected() {
    let mut map = HashMap::new();
    map.insert("MKTSCRAPE_PAGE_DELAY_MIN_SECS", "9");
    map.insert("MKTSCRAPE_PAGE_DELAY_MAX_SECS", "3");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("MKTSCRAPE_PAGE_DELAY")),
        "expected Validation error, got: {result:?}"
    );
}

#[test]
fn blank_optional_values_are_treated_as_unset() {
    let mut map = HashMap::new();
    map.insert("MKTSCRAPE_BROWSERLESS_URL", "   ");
    map.insert("MKTSCRAPE_ALIASES_PATH", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.browserless_url.is_none());
    assert!(cfg.aliases_path.is_none());
}

#[test]
fn debug_redacts_browserless_token() {
    let mut map = HashMap::new();
    map.insert("MKTSCRAPE_BROWSERLESS_URL", "http://localhost:3000");
    map.insert("MKTSCRAPE_BROWSERLESS_TOKEN", "super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("[redacted]"));
}
