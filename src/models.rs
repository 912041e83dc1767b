use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Fatal input problems. All of these abort the run before a browser
/// session is ever launched.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("could not read input file '{path}': {reason}")]
    UnreadableInput { path: String, reason: String },

    #[error("could not identify a column containing URLs or emails")]
    NoIdentifiableColumn,

    #[error("no URLs or emails found in the identified column")]
    NoTargetsFound,
}

/// One output row per scraped target. Built exactly once by the batch
/// runner and never mutated afterwards; a failed target still gets a
/// record, with every field empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactRecord {
    pub target: String,
    pub emails: HashSet<String>,
    pub phones: HashSet<String>,
    pub facebook: String,
    pub instagram: String,
    pub linkedin: String,
}

impl ContactRecord {
    pub fn empty(target: &str) -> Self {
        Self {
            target: target.to_string(),
            ..Default::default()
        }
    }

    /// Emails as a single CSV cell. Sorted so the written artifact is
    /// stable across runs; the in-memory field stays a set.
    pub fn joined_emails(&self) -> String {
        join_sorted(&self.emails)
    }

    pub fn joined_phones(&self) -> String {
        join_sorted(&self.phones)
    }
}

fn join_sorted(values: &HashSet<String>) -> String {
    let mut sorted: Vec<&str> = values.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.join(", ")
}
