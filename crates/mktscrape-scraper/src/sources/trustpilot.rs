//! TrustPilot review pages: `GET {base}/review/{domain}?page={n}&sort=recency`.

use mktscrape_core::{Bookmark, Direction, Entity};
use scraper::{ElementRef, Html};

use super::{join_url, SourceAdapter};
use crate::error::ScraperError;
use crate::fetch::{RawResponse, RequestDescriptor};
use crate::html::{first_attr, first_text, selector};
use crate::types::TrustpilotReview;

/// Marker TrustPilot renders instead of reviews past the last page or for an
/// unknown domain.
pub(crate) const NOT_FOUND_SELECTOR: &str = r#"div[class*="errors_error404"]"#;

const CARD: &str = r#"article[data-service-review-card-paper], div[class*="styles_reviewCardInner"]"#;
const REVIEW_LINK: &str = r#"a[href^="/reviews/"]"#;
const REVIEWER_NAME: &str = "[data-consumer-name-typography]";
const REVIEW_COUNT: &str = "[data-consumer-reviews-count-typography]";
const PROFILE_LINK: &str = "a[data-consumer-profile-link]";
const COUNTRY: &str = r#"[data-consumer-country-typography], div[class*="styles_detailsIcon"]"#;
const RATING: &str = "[data-service-review-rating]";
const TITLE: &str = "h2";
const CONTENT: &str = r#"[data-service-review-text-typography], p[class*="typography_body-l"]"#;
const RATED_AT: &str = "time[datetime]";
const EXPERIENCE: &str = "[data-service-review-date-of-experience-typography]";

/// `true` when `html` carries the TrustPilot "page not found" marker.
pub(crate) fn has_not_found_marker(html: &str) -> bool {
    let Ok(sel) = selector(NOT_FOUND_SELECTOR) else {
        return false;
    };
    Html::parse_document(html).select(&sel).next().is_some()
}

/// Reviews for an entity's domain, newest first, one page per fetch cycle.
#[derive(Debug, Clone)]
pub struct TrustpilotReviewSource {
    base_url: String,
    n_pages: u32,
}

impl TrustpilotReviewSource {
    pub fn new(base_url: impl Into<String>, n_pages: u32) -> Self {
        Self {
            base_url: base_url.into(),
            n_pages,
        }
    }
}

impl SourceAdapter for TrustpilotReviewSource {
    type Row = TrustpilotReview;

    fn name(&self) -> &'static str {
        "trustpilot"
    }

    /// TrustPilot is keyed by domain, so the name variations do not apply.
    fn variations(&self, entity: &Entity) -> Vec<String> {
        vec![entity.domain.clone().unwrap_or_else(|| entity.key.clone())]
    }

    fn bookmark(
        &self,
        _set: &mktscrape_store::ResultSet<TrustpilotReview>,
        _variation: &str,
        _direction: Direction,
        cycle: u32,
    ) -> Bookmark {
        Bookmark::Page(cycle + 1)
    }

    fn build_request(
        &self,
        _entity: &Entity,
        variation: &str,
        bookmark: Bookmark,
        _direction: Direction,
    ) -> Result<RequestDescriptor, ScraperError> {
        let url = join_url(&self.base_url, &format!("review/{variation}"))?;
        let Bookmark::Page(page) = bookmark else {
            return Err(ScraperError::InvalidUrl {
                url,
                reason: format!("TrustPilot needs a page bookmark, got {bookmark:?}"),
            });
        };
        Ok(RequestDescriptor::get(url)
            .param("page", page)
            .param("sort", "recency")
            .allow_error_status())
    }

    fn parse(
        &self,
        raw: &RawResponse,
        variation: &str,
    ) -> Result<Vec<TrustpilotReview>, ScraperError> {
        parse_reviews(&raw.body, &self.base_url, variation)
    }

    fn is_end_of_pages(&self, raw: &RawResponse) -> bool {
        raw.status == 404 || has_not_found_marker(&raw.body)
    }

    fn max_cycles(&self) -> Option<u32> {
        Some(self.n_pages)
    }
}

struct ReviewSelectors {
    card: scraper::Selector,
    review_link: scraper::Selector,
    reviewer_name: scraper::Selector,
    review_count: scraper::Selector,
    profile_link: scraper::Selector,
    country: scraper::Selector,
    rating: scraper::Selector,
    title: scraper::Selector,
    content: scraper::Selector,
    rated_at: scraper::Selector,
    experience: scraper::Selector,
}

impl ReviewSelectors {
    fn new() -> Result<Self, ScraperError> {
        Ok(Self {
            card: selector(CARD)?,
            review_link: selector(REVIEW_LINK)?,
            reviewer_name: selector(REVIEWER_NAME)?,
            review_count: selector(REVIEW_COUNT)?,
            profile_link: selector(PROFILE_LINK)?,
            country: selector(COUNTRY)?,
            rating: selector(RATING)?,
            title: selector(TITLE)?,
            content: selector(CONTENT)?,
            rated_at: selector(RATED_AT)?,
            experience: selector(EXPERIENCE)?,
        })
    }
}

/// Parse every review card on a page. Cards without a review link or without
/// any review text are skipped; any other missing field is left empty.
///
/// `review_content` carries the title as a prefix (`title: text`), or the
/// title alone when the card has no body text.
///
/// # Errors
///
/// Returns [`ScraperError::Parse`] only if a built-in selector fails to compile.
pub fn parse_reviews(
    html: &str,
    base_url: &str,
    search_term: &str,
) -> Result<Vec<TrustpilotReview>, ScraperError> {
    let sel = ReviewSelectors::new()?;
    let document = Html::parse_document(html);
    let base = base_url.trim_end_matches('/');

    let mut reviews = Vec::new();
    for card in document.select(&sel.card) {
        match parse_card(card, &sel, base, search_term) {
            Some(review) => reviews.push(review),
            None => tracing::debug!("skipping review card without a link or text"),
        }
    }
    Ok(reviews)
}

fn parse_card(
    card: ElementRef<'_>,
    sel: &ReviewSelectors,
    base: &str,
    search_term: &str,
) -> Option<TrustpilotReview> {
    let href = first_attr(card, &sel.review_link, "href")?;
    let id = href
        .trim_start_matches("/reviews/")
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .to_string();
    if id.is_empty() {
        return None;
    }

    let num_reviews = first_text(card, &sel.review_count)
        .split_whitespace()
        .next()
        .and_then(|n| n.replace(',', "").parse::<u32>().ok());
    let profile_link = first_attr(card, &sel.profile_link, "href")
        .map(|h| absolutize(base, &h))
        .unwrap_or_default();
    let star_rating = first_attr(card, &sel.rating, "data-service-review-rating")
        .and_then(|r| r.parse::<u8>().ok());
    let review_title = first_text(card, &sel.title);
    let review_content = match (review_title.as_str(), first_text(card, &sel.content)) {
        ("", text) if text.is_empty() => return None,
        ("", text) => text,
        (title, text) if text.is_empty() => title.to_string(),
        (title, text) => format!("{title}: {text}"),
    };
    let date_of_experience = {
        let text = first_text(card, &sel.experience);
        match text.split_once(':') {
            Some((_, date)) => date.trim().to_string(),
            None => text,
        }
    };

    Some(TrustpilotReview {
        id,
        star_rating,
        review_title,
        review_content,
        date_of_rating: first_attr(card, &sel.rated_at, "datetime").unwrap_or_default(),
        date_of_experience,
        reviewer_name: first_text(card, &sel.reviewer_name),
        num_reviews,
        country: first_text(card, &sel.country),
        review_link: absolutize(base, &href),
        profile_link,
        search_term: search_term.to_string(),
    })
}

fn absolutize(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{base}/{}", href.trim_start_matches('/'))
    }
}

#[cfg(test)]
#[path = "trustpilot_test.rs"]
mod tests;
