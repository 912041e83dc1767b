use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::patterns::is_date_like;

// Year spans ("1990-1999", also with an en dash) survive the date check but
// are never phone numbers.
static RANGE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}\s?[-\u{2013}]\s?\d{4}$").unwrap());

// Runs of single digits with whitespace between them are list markers,
// pagination, table cells, not dialable numbers.
static SPACED_DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:\d\s){3,}\d$").unwrap());

const MIN_PHONE_DIGITS: usize = 8;

/// Reduce raw phone-pattern matches to a set of plausible numbers in
/// digits-only form. One policy for every caller: the per-candidate
/// discard rules run first, then the subsumption pass collapses partial
/// numbers already contained in a fuller one from the same page.
pub fn filter_phones<I>(raw_matches: I) -> HashSet<String>
where
    I: IntoIterator<Item = String>,
{
    let mut cleaned: HashSet<String> = HashSet::new();

    for raw in raw_matches {
        let collapsed = collapse_whitespace(&raw);
        if collapsed.is_empty() || is_date_like(&collapsed) {
            continue;
        }
        if RANGE_SHAPE.is_match(&collapsed) || SPACED_DIGIT_RUN.is_match(&collapsed) {
            continue;
        }
        let digits = digits_only(&collapsed);
        if digits.len() < MIN_PHONE_DIGITS {
            continue;
        }
        cleaned.insert(digits);
    }

    dedup_subsumed(cleaned)
}

/// Keep a number only if no longer retained number contains it. Longest
/// first, so "5551234" is dropped when "15551234" is already kept.
fn dedup_subsumed(candidates: HashSet<String>) -> HashSet<String> {
    let mut by_length: Vec<String> = candidates.into_iter().collect();
    by_length.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut unique: HashSet<String> = HashSet::new();
    for candidate in by_length {
        if !unique.iter().any(|kept| kept.contains(&candidate)) {
            unique.insert(candidate);
        }
    }
    unique
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}
