//! Business snippet on a search-engine results page.

use scraper::Html;

use super::ContactFindings;
use crate::error::ScraperError;
use crate::fetch::RequestDescriptor;
use crate::html::{selector, text_of};
use crate::sources::join_url;

/// Address line of the knowledge-panel snippet.
const ADDRESS: &str = "span.LrzXr";
/// Phone numbers are rendered in labelled spans.
const LABELLED: &str = "span[aria-label]";

/// `GET {base}/search?q={query}&hl=en`.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] if the URL cannot be formed.
pub fn snippet_request(base_url: &str, query: &str) -> Result<RequestDescriptor, ScraperError> {
    Ok(RequestDescriptor::get(join_url(base_url, "search")?)
        .param("q", query)
        .param("hl", "en"))
}

fn looks_like_phone(text: &str) -> bool {
    let digits = text.chars().filter(char::is_ascii_digit).count();
    digits >= 7
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || "()+-.".contains(c))
}

/// Phones and addresses from the results page. No email is ever found here.
///
/// # Errors
///
/// Returns [`ScraperError::Parse`] only if a built-in selector fails to compile.
pub fn parse_snippet(html: &str) -> Result<ContactFindings, ScraperError> {
    let document = Html::parse_document(html);

    let addresses = document
        .select(&selector(ADDRESS)?)
        .map(text_of)
        .filter(|a| !a.is_empty())
        .collect();
    let phones = document
        .select(&selector(LABELLED)?)
        .map(text_of)
        .filter(|t| looks_like_phone(t))
        .collect();

    Ok(ContactFindings {
        emails: Vec::new(),
        phones,
        addresses,
    })
}
