use std::collections::HashSet;
use tracing::info;

use crate::models::InputError;

/// How many non-empty cells per column feed the scoring pass.
const SAMPLE_SIZE: usize = 20;

const TLD_HINTS: [&str; 4] = [".net", ".org", ".io", ".co"];

/// A parsed spreadsheet, independent of the file format it came from:
/// named columns in input order, each a run of optional cells.
#[derive(Debug, Clone)]
pub struct Table {
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<String>>,
}

impl Column {
    pub fn non_empty_values(&self) -> impl Iterator<Item = &str> {
        self.values
            .iter()
            .filter_map(|v| v.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// URL/email-likeness of one column: one point per sampled cell that
    /// carries an `@` or a common TLD substring.
    fn score(&self) -> usize {
        self.non_empty_values()
            .take(SAMPLE_SIZE)
            .filter(|value| {
                let v = value.to_lowercase();
                v.contains('@') || v.contains(".com") || TLD_HINTS.iter().any(|tld| v.contains(tld))
            })
            .count()
    }
}

impl Table {
    /// Pick the column most likely to hold URLs or emails. Columns are
    /// scanned in input order and ties keep the first column that reached
    /// the maximum, so selection is deterministic for a given file.
    pub fn select_target_column(&self) -> Result<&Column, InputError> {
        let mut best: Option<(&Column, usize)> = None;
        for column in &self.columns {
            let score = column.score();
            if best.map_or(true, |(_, max)| score > max) {
                best = Some((column, score));
            }
        }

        match best {
            Some((column, score)) if score > 0 => {
                info!(
                    "Identified '{}' as the column containing URLs/emails (score {})",
                    column.name, score
                );
                Ok(column)
            }
            _ => Err(InputError::NoIdentifiableColumn),
        }
    }
}

/// Normalize column cells into a deduplicated target list: emails lose
/// their local part, bare domains pass through, everything else is
/// skipped. First-appearance order is preserved and identity is
/// case-sensitive.
pub fn extract_targets<'a, I>(values: I) -> Result<Vec<String>, InputError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut targets = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for value in values {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        if value.contains('@') {
            let domain = value.rsplit('@').next().unwrap_or("");
            if !domain.is_empty() && seen.insert(domain.to_string()) {
                targets.push(domain.to_string());
            }
        } else if value.contains('.') && !value.contains(char::is_whitespace) {
            let mut parts = value.split('.');
            let first_part_ok = parts.next().map_or(false, |p| !p.is_empty());
            if first_part_ok && parts.next().is_some() && seen.insert(value.to_string()) {
                targets.push(value.to_string());
            }
        }
    }

    if targets.is_empty() {
        return Err(InputError::NoTargetsFound);
    }
    info!("Extracted {} unique domains/URLs to process", targets.len());
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, values: &[&str]) -> Column {
        Column {
            name: name.to_string(),
            values: values.iter().map(|v| Some(v.to_string())).collect(),
        }
    }

    #[test]
    fn contact_column_beats_name_column() {
        let table = Table {
            columns: vec![
                column("Name", &["Acme Corp", "Globex"]),
                column("Contact", &["a@x.com", "y.com"]),
            ],
        };
        assert_eq!(table.select_target_column().unwrap().name, "Contact");
    }

    #[test]
    fn ties_break_to_the_first_column() {
        let table = Table {
            columns: vec![
                column("Primary", &["a@x.com"]),
                column("Secondary", &["b@y.com"]),
            ],
        };
        assert_eq!(table.select_target_column().unwrap().name, "Primary");
    }

    #[test]
    fn all_zero_scores_fail() {
        let table = Table {
            columns: vec![column("Name", &["Acme Corp", "Globex"])],
        };
        assert!(matches!(
            table.select_target_column(),
            Err(InputError::NoIdentifiableColumn)
        ));
    }

    #[test]
    fn empty_table_fails() {
        let table = Table { columns: vec![] };
        assert!(matches!(
            table.select_target_column(),
            Err(InputError::NoIdentifiableColumn)
        ));
    }

    #[test]
    fn scoring_samples_only_the_head_of_the_column() {
        let mut noise = vec!["nothing"; 25];
        noise.push("late@entry.com");
        let table = Table {
            columns: vec![column("Sparse", &noise)],
        };
        // the only scoring cell sits past the 20-row sample window
        assert!(table.select_target_column().is_err());
    }

    #[test]
    fn emails_become_their_domain() {
        let targets = extract_targets(["user@example.com"]).unwrap();
        assert_eq!(targets, vec!["example.com"]);
    }

    #[test]
    fn domains_pass_through_unchanged() {
        let targets = extract_targets(["sub.example.org"]).unwrap();
        assert_eq!(targets, vec!["sub.example.org"]);
    }

    #[test]
    fn junk_values_yield_no_targets() {
        assert!(matches!(
            extract_targets(["not a url", ".com", "plain"]),
            Err(InputError::NoTargetsFound)
        ));
    }

    #[test]
    fn duplicates_are_dropped_and_order_preserved() {
        let targets =
            extract_targets(["a@x.com", "y.com", "b@x.com", "y.com", "z.com"]).unwrap();
        assert_eq!(targets, vec!["x.com", "y.com", "z.com"]);
    }

    #[test]
    fn identity_is_case_sensitive() {
        let targets = extract_targets(["Example.com", "example.com"]).unwrap();
        assert_eq!(targets, vec!["Example.com", "example.com"]);
    }

    #[test]
    fn end_to_end_two_row_contact_sheet() {
        let table = Table {
            columns: vec![
                column("Name", &["Acme Corp", "Globex"]),
                column("Contact", &["a@x.com", "y.com"]),
            ],
        };
        let selected = table.select_target_column().unwrap();
        let targets = extract_targets(selected.non_empty_values()).unwrap();
        assert_eq!(targets, vec!["x.com", "y.com"]);
    }
}
