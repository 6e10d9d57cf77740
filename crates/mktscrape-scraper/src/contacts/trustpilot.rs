//! Contact box on a company's TrustPilot profile page.

use scraper::Html;

use super::ContactFindings;
use crate::error::ScraperError;
use crate::fetch::RequestDescriptor;
use crate::html::{selector, text_of};
use crate::sources::join_url;
use crate::sources::trustpilot::NOT_FOUND_SELECTOR;

const CONTACT_BOX: &str = r#"ul[class*="styles_contactInfoElements"]"#;
const ADDRESS_ITEMS: &str = r#"ul[class*="styles_contactInfoAddressList"] li"#;

/// `GET {base}/review/{domain}`; a 404 body is returned so the not-found
/// marker can be read.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] if the URL cannot be formed.
pub fn profile_request(base_url: &str, domain: &str) -> Result<RequestDescriptor, ScraperError> {
    Ok(RequestDescriptor::get(join_url(base_url, &format!("review/{domain}"))?).allow_error_status())
}

/// Emails, phones, and the address from the profile's contact box. A
/// "not found" page or a profile without a contact box yields no findings.
///
/// # Errors
///
/// Returns [`ScraperError::Parse`] only if a built-in selector fails to compile.
pub fn parse_contact_box(html: &str) -> Result<ContactFindings, ScraperError> {
    let document = Html::parse_document(html);
    if document.select(&selector(NOT_FOUND_SELECTOR)?).next().is_some() {
        return Ok(ContactFindings::default());
    }

    let Some(contact_box) = document.select(&selector(CONTACT_BOX)?).next() else {
        return Ok(ContactFindings::default());
    };

    let href_values = |prefix: &str| -> Result<Vec<String>, ScraperError> {
        let sel = selector(&format!(r#"a[href^="{prefix}"]"#))?;
        Ok(contact_box
            .select(&sel)
            .filter_map(|a| a.value().attr("href"))
            .map(|h| h.trim_start_matches(prefix).trim().to_string())
            .filter(|v| !v.is_empty())
            .collect())
    };

    let address: Vec<String> = contact_box
        .select(&selector(ADDRESS_ITEMS)?)
        .map(text_of)
        .filter(|line| !line.is_empty())
        .collect();

    Ok(ContactFindings {
        emails: href_values("mailto:")?,
        phones: href_values("tel:")?,
        addresses: if address.is_empty() {
            Vec::new()
        } else {
            vec![address.join(", ")]
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = r#"
    <html><body>
      <ul class="styles_contactInfoElements__YqQAJ">
        <li class="styles_contactInfoElement__SxlS3"><a href="mailto:hello@acme.com">hello@acme.com</a></li>
        <li class="styles_contactInfoElement__SxlS3"><a href="tel:+1 555 010 2030">+1 555 010 2030</a></li>
        <li>
          <ul class="typography_body-m__xgxZ_ styles_contactInfoAddressList__RxiJI">
            <li>1 Main St</li><li>Springfield</li><li>United States</li>
          </ul>
        </li>
      </ul>
    </body></html>
    "#;

    #[test]
    fn reads_mailto_tel_and_address_list() {
        let findings = parse_contact_box(PROFILE).unwrap();
        assert_eq!(findings.emails, vec!["hello@acme.com"]);
        assert_eq!(findings.phones, vec!["+1 555 010 2030"]);
        assert_eq!(
            findings.addresses,
            vec!["1 Main St, Springfield, United States"]
        );
    }

    #[test]
    fn not_found_page_yields_nothing() {
        let html = r#"<html><body><div class="errors_error404__tUqzU">Not found</div></body></html>"#;
        assert!(parse_contact_box(html).unwrap().is_empty());
    }

    #[test]
    fn profile_without_contact_box_yields_nothing() {
        assert!(parse_contact_box("<html><body><h1>Acme</h1></body></html>")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn request_allows_error_status() {
        let req = profile_request("https://www.trustpilot.com/", "acme.com").unwrap();
        assert_eq!(req.url, "https://www.trustpilot.com/review/acme.com");
        assert!(req.allow_error_status);
    }
}
