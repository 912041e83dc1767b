use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

use crate::models::Result;
use crate::resolver::{extract_targets, load_table};

/// Where the list of scrape targets comes from. Resolution happens before
/// any browser session exists, so everything fatal about the input
/// surfaces here.
#[async_trait]
pub trait ContactSource: Send + Sync {
    async fn resolve_targets(&self) -> Result<Vec<String>>;
}

/// A single URL given on the command line or in a request. Passed through
/// verbatim; normalization is the navigator's job.
pub struct SingleUrlSource {
    url: String,
}

impl SingleUrlSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl ContactSource for SingleUrlSource {
    async fn resolve_targets(&self) -> Result<Vec<String>> {
        Ok(vec![self.url.clone()])
    }
}

/// A spreadsheet of URLs/emails: load, pick the most URL-like column,
/// normalize its cells into unique targets.
pub struct SpreadsheetSource {
    path: PathBuf,
}

impl SpreadsheetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ContactSource for SpreadsheetSource {
    async fn resolve_targets(&self) -> Result<Vec<String>> {
        info!("Loading targets from {}", self.path.display());
        let table = load_table(&self.path)?;
        let column = table.select_target_column()?;
        let targets = extract_targets(column.non_empty_values())?;
        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InputError;
    use std::io::Write;

    #[tokio::test]
    async fn single_url_source_yields_its_url() {
        let targets = SingleUrlSource::new("example.com")
            .resolve_targets()
            .await
            .unwrap();
        assert_eq!(targets, vec!["example.com"]);
    }

    #[tokio::test]
    async fn spreadsheet_source_resolves_contact_column() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Name,Contact").unwrap();
        writeln!(file, "Acme Corp,a@x.com").unwrap();
        writeln!(file, "Globex,y.com").unwrap();
        file.flush().unwrap();

        let targets = SpreadsheetSource::new(file.path())
            .resolve_targets()
            .await
            .unwrap();
        assert_eq!(targets, vec!["x.com", "y.com"]);
    }

    #[tokio::test]
    async fn spreadsheet_without_contact_column_fails() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Name,City").unwrap();
        writeln!(file, "Acme Corp,Geneva").unwrap();
        file.flush().unwrap();

        let err = SpreadsheetSource::new(file.path())
            .resolve_targets()
            .await
            .unwrap_err();
        let input = err.downcast_ref::<InputError>().unwrap();
        assert!(matches!(input, InputError::NoIdentifiableColumn));
    }
}
