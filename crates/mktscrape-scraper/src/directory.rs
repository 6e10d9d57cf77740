//! Member-directory scraping: collect outbound website links from a listing page.

use scraper::Html;

use crate::error::ScraperError;
use crate::fetch::RequestDescriptor;
use crate::html::selector;
use crate::types::DirectoryLink;

#[must_use]
pub fn listing_request(listing_url: &str) -> RequestDescriptor {
    RequestDescriptor::get(listing_url)
}

/// `href`s of the elements matching `css`, resolved against `listing_url`, in
/// page order without duplicates.
///
/// # Errors
///
/// Returns [`ScraperError::Parse`] if `css` is not a valid selector.
pub fn parse_listing(
    html: &str,
    listing_url: &str,
    css: &str,
) -> Result<Vec<DirectoryLink>, ScraperError> {
    let sel = selector(css)?;
    let base = reqwest::Url::parse(listing_url).ok();
    let document = Html::parse_document(html);

    let mut links: Vec<DirectoryLink> = Vec::new();
    for el in document.select(&sel) {
        let Some(href) = el.value().attr("href").map(str::trim) else {
            continue;
        };
        if href.is_empty() || href.starts_with('#') {
            continue;
        }
        let url = base
            .as_ref()
            .and_then(|b| b.join(href).ok())
            .map_or_else(|| href.to_string(), |u| u.to_string());
        if links.iter().any(|l| l.id == url) {
            continue;
        }
        links.push(DirectoryLink {
            id: url,
            search_term: listing_url.to_string(),
        });
    }
    Ok(links)
}
