//! Contact-info extraction: the request builders and parsers used by each
//! stage of the contact waterfall.

pub mod search;
pub mod site;
pub mod trustpilot;

use crate::types::ContactRecord;

/// Path keywords that make a first-level subdirectory worth scraping.
pub const CONTACT_KEYWORDS: &[&str] = &["contact", "about", "faq", "help", "privacy", "terms"];

/// Emails, phones, and addresses accumulated across waterfall stages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFindings {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub addresses: Vec<String>,
}

impl ContactFindings {
    /// Union `other` into `self`.
    pub fn absorb(&mut self, other: ContactFindings) {
        self.emails.extend(other.emails);
        self.phones.extend(other.phones);
        self.addresses.extend(other.addresses);
    }

    #[must_use]
    pub fn has_email(&self) -> bool {
        self.emails.iter().any(|e| !e.trim().is_empty())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty() && self.addresses.is_empty()
    }

    /// Trim, drop empties, and dedup each list in first-seen order. Emails are
    /// compared case-insensitively and phones are reduced to digits.
    #[must_use]
    pub fn cleaned(self) -> Self {
        Self {
            emails: dedup(self.emails.iter().map(|e| e.trim().to_lowercase())),
            phones: dedup(self.phones.iter().filter_map(|p| clean_phone(p))),
            addresses: dedup(self.addresses.iter().map(|a| a.trim().to_string())),
        }
    }

    /// Clean the findings and build the persisted row for `website`.
    #[must_use]
    pub fn into_record(self, website: &str, name: &str) -> ContactRecord {
        let clean = self.cleaned();
        ContactRecord {
            id: website.to_string(),
            name: name.to_string(),
            emails: clean.emails.join("; "),
            phones: clean.phones.join("; "),
            addresses: clean.addresses.join("; "),
            search_term: website.to_string(),
        }
    }
}

fn dedup(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !item.is_empty() && !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// Digits of `raw`, keeping a leading `+`. `None` when no digit remains.
#[must_use]
pub fn clean_phone(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    if trimmed.starts_with('+') {
        Some(format!("+{digits}"))
    } else {
        Some(digits)
    }
}
