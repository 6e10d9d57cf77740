//! Emails and phones scraped from a company's own pages.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use super::{ContactFindings, CONTACT_KEYWORDS};
use crate::error::ScraperError;
use crate::html::selector;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9-]+(?:\.[a-z0-9-]+)*\.[a-z]{2,}\b")
        .expect("valid email regex")
});

static TEL_HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)href\s*=\s*["']tel:(\+?[0-9()\-. ]+)["']"#).expect("valid tel regex")
});

static US_PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+1\s?)?(?:1[\s-]?)?\(?\d{3}\)?[\s-]\d{3}[\s-]\d{4}")
        .expect("valid phone regex")
});

/// Asset filenames like `logo@2x.png` look like addresses.
const ASSET_SUFFIXES: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".avif"];

/// Emails and phone numbers found anywhere in the page source.
#[must_use]
pub fn extract_contacts(html: &str) -> ContactFindings {
    let emails = EMAIL_RE
        .find_iter(html)
        .map(|m| m.as_str().to_string())
        .filter(|e| {
            let lower = e.to_lowercase();
            !ASSET_SUFFIXES.iter().any(|s| lower.ends_with(s))
        })
        .collect();

    let phones = TEL_HREF_RE
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .chain(US_PHONE_RE.find_iter(html).map(|m| m.as_str().to_string()))
        .collect();

    ContactFindings {
        emails,
        phones,
        addresses: Vec::new(),
    }
}

fn bare_host(url: &reqwest::Url) -> Option<String> {
    url.host_str()
        .map(|h| h.strip_prefix("www.").unwrap_or(h).to_lowercase())
}

/// Same-domain links exactly one path segment deep, as
/// `{scheme}://{domain}/{segment}`, in first-seen order.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] if `page_url` is not absolute.
pub fn first_level_links(html: &str, page_url: &str) -> Result<Vec<String>, ScraperError> {
    let base = reqwest::Url::parse(page_url).map_err(|e| ScraperError::InvalidUrl {
        url: page_url.to_string(),
        reason: e.to_string(),
    })?;
    let domain = bare_host(&base).unwrap_or_default();

    let document = Html::parse_document(html);
    let mut links: Vec<String> = Vec::new();
    for anchor in document.select(&selector("a[href]")?) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Ok(resolved) = base.join(href.trim()) else {
            continue;
        };
        if !matches!(resolved.scheme(), "http" | "https")
            || bare_host(&resolved).as_deref() != Some(domain.as_str())
        {
            continue;
        }
        let segments: Vec<&str> = resolved
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();
        if let [segment] = segments.as_slice() {
            let link = format!("{}://{domain}/{segment}", resolved.scheme());
            if !links.contains(&link) {
                links.push(link);
            }
        }
    }
    Ok(links)
}

/// Keep links whose path mentions one of [`CONTACT_KEYWORDS`].
#[must_use]
pub fn contact_pages(links: Vec<String>) -> Vec<String> {
    links
        .into_iter()
        .filter(|link| {
            let path = link
                .split("://")
                .nth(1)
                .and_then(|rest| rest.split_once('/'))
                .map(|(_, p)| p.to_lowercase())
                .unwrap_or_default();
            CONTACT_KEYWORDS.iter().any(|k| path.contains(k))
        })
        .collect()
}
