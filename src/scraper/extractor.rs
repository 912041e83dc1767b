// src/scraper/extractor.rs
use std::collections::HashSet;
use tracing::debug;

use crate::entity_filter::filter_phones;
use crate::patterns::{EMAIL_PATTERN, PHONE_PATTERN, SOCIAL_PATTERNS};

/// Contact fields pulled out of one captured page. Pure function of the
/// HTML and the outbound links, so identical input always reproduces the
/// same field sets.
#[derive(Debug, Default, PartialEq)]
pub struct ExtractedContacts {
    pub emails: HashSet<String>,
    pub phones: HashSet<String>,
    pub facebook: String,
    pub instagram: String,
    pub linkedin: String,
}

pub fn extract(html: &str, links: &[String]) -> ExtractedContacts {
    let emails: HashSet<String> = EMAIL_PATTERN
        .find_iter(html)
        .map(|m| m.as_str().to_string())
        .collect();

    let raw_phones = PHONE_PATTERN
        .find_iter(html)
        .map(|m| m.as_str().trim().to_string());
    let phones = filter_phones(raw_phones);

    debug!(
        "Extracted {} emails and {} phone numbers",
        emails.len(),
        phones.len()
    );

    // First matching link wins, independently per platform.
    let mut facebook = String::new();
    let mut instagram = String::new();
    let mut linkedin = String::new();
    for link in links {
        if facebook.is_empty() && SOCIAL_PATTERNS.facebook.is_match(link) {
            facebook = link.clone();
        }
        if instagram.is_empty() && SOCIAL_PATTERNS.instagram.is_match(link) {
            instagram = link.clone();
        }
        if linkedin.is_empty() && SOCIAL_PATTERNS.linkedin.is_match(link) {
            linkedin = link.clone();
        }
    }

    ExtractedContacts {
        emails,
        phones,
        facebook,
        instagram,
        linkedin,
    }
}
