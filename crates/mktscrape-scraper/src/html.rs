//! Small helpers over the `scraper` DOM shared by the HTML sources.

use scraper::{ElementRef, Selector};

use crate::error::ScraperError;

pub(crate) fn selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::Parse {
        context: format!("CSS selector `{css}`"),
        reason: e.to_string(),
    })
}

/// Text content of `el` with whitespace runs collapsed.
pub(crate) fn text_of(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapsed text of the first match under `root`, or empty.
pub(crate) fn first_text(root: ElementRef<'_>, sel: &Selector) -> String {
    root.select(sel).next().map(text_of).unwrap_or_default()
}

/// Attribute of the first match under `root`.
pub(crate) fn first_attr(root: ElementRef<'_>, sel: &Selector, attr: &str) -> Option<String> {
    root.select(sel)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|v| v.trim().to_string())
}

/// Leading characters of a body for log and error messages.
pub(crate) fn preview(body: &str) -> String {
    const PREVIEW_CHARS: usize = 120;
    body.trim().chars().take(PREVIEW_CHARS).collect()
}
