use once_cell::sync::Lazy;
use regex::Regex;

/// Compiled once at first use; nothing in this module is mutable.
pub static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
});

/// Optional leading `+`, then digits interleaved with spaces, parentheses,
/// hyphens and dots. Deliberately loose: the entity filter owns the
/// minimum-digit floor and the false-positive rejection.
pub static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\d[\d\s().-]{7,}\d").unwrap());

/// Anchor text that suggests a contact/about/support page.
pub static CONTACT_LINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)contact|about|support").unwrap());

pub struct SocialPatterns {
    pub facebook: Regex,
    pub instagram: Regex,
    pub linkedin: Regex,
}

pub static SOCIAL_PATTERNS: Lazy<SocialPatterns> = Lazy::new(|| SocialPatterns {
    facebook: Regex::new(r#"facebook\.com/[^\s"'<>]+"#).unwrap(),
    instagram: Regex::new(r#"instagram\.com/[^\s"'<>]+"#).unwrap(),
    linkedin: Regex::new(r#"linkedin\.com/[^\s"'<>]+"#).unwrap(),
});

static DATE_FULL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}[-/]\d{2}[-/]\d{2}$").unwrap());
static DATE_YEAR_MONTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}[-/]\d{2}$").unwrap());
static DATE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").unwrap());

/// Dates embedded in page text are the most common phone false positive:
/// `2023-05-01` matches the phone shape. Spaces are stripped before
/// classifying; anything longer than 10 characters cannot be a date here.
pub fn is_date_like(s: &str) -> bool {
    let clean: String = s.chars().filter(|c| *c != ' ').collect();
    if clean.len() > 10 {
        return false;
    }
    DATE_FULL.is_match(&clean) || DATE_YEAR_MONTH.is_match(&clean) || DATE_YEAR.is_match(&clean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_pattern_matches_plain_addresses() {
        let text = "reach us at hello@example.com or sales@sub.example.co.uk today";
        let found: Vec<&str> = EMAIL_PATTERN.find_iter(text).map(|m| m.as_str()).collect();
        assert_eq!(found, vec!["hello@example.com", "sales@sub.example.co.uk"]);
    }

    #[test]
    fn email_pattern_requires_a_tld() {
        assert!(!EMAIL_PATTERN.is_match("user@localhost"));
    }

    #[test]
    fn phone_pattern_matches_common_formats() {
        for sample in ["+41 22 345 67 89", "(020) 7946-0958", "212.555.0123"] {
            assert!(PHONE_PATTERN.is_match(sample), "expected match: {sample}");
        }
    }

    #[test]
    fn phone_pattern_needs_a_long_enough_run() {
        assert!(!PHONE_PATTERN.is_match("12 34"));
    }

    #[test]
    fn date_like_recognizes_all_three_shapes() {
        assert!(is_date_like("2023-05-01"));
        assert!(is_date_like("2023/05/01"));
        assert!(is_date_like("2023-05"));
        assert!(is_date_like("2023"));
        assert!(is_date_like("2023 - 05 - 01"));
    }

    #[test]
    fn date_like_rejects_real_numbers() {
        assert!(!is_date_like("+41 22 345 67 89"));
        assert!(!is_date_like("20230501999"));
    }

    #[test]
    fn social_patterns_stop_at_quotes_and_brackets() {
        let html = r#"<a href="https://facebook.com/acme">fb</a>"#;
        let m = SOCIAL_PATTERNS.facebook.find(html).unwrap();
        assert_eq!(m.as_str(), "facebook.com/acme");
    }

    #[test]
    fn contact_link_pattern_is_case_insensitive() {
        assert!(CONTACT_LINK_PATTERN.is_match("Contact Us"));
        assert!(CONTACT_LINK_PATTERN.is_match("ABOUT"));
        assert!(CONTACT_LINK_PATTERN.is_match("Support center"));
        assert!(!CONTACT_LINK_PATTERN.is_match("Products"));
    }
}
