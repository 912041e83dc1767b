use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::models::{ContactRecord, Result};
use crate::scraper::browser::BrowserSession;
use crate::scraper::{extractor, navigator};

/// Drives one browser session across every target, strictly in order.
/// Each target gets exactly one record; a target that fails anywhere in
/// navigation or extraction contributes an empty-fields record and the
/// batch moves on.
pub struct BatchRunner {
    config: Config,
}

impl BatchRunner {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(&self, targets: &[String]) -> Result<Vec<ContactRecord>> {
        let session = BrowserSession::launch(Duration::from_secs(
            self.config.scraping.navigation_timeout_seconds,
        ))
        .await?;

        let mut records = Vec::with_capacity(targets.len());
        for (i, target) in targets.iter().enumerate() {
            info!("[{}/{}] Scraping: {}", i + 1, targets.len(), target);

            if i > 0 {
                self.inter_target_delay().await;
            }

            let capture = navigator::load(
                session.browser(),
                target,
                &self.config.scraping,
                &self.config.debug,
            )
            .await;
            let contacts = extractor::extract(&capture.html, &capture.links);

            records.push(ContactRecord {
                target: target.clone(),
                emails: contacts.emails,
                phones: contacts.phones,
                facebook: contacts.facebook,
                instagram: contacts.instagram,
                linkedin: contacts.linkedin,
            });
        }

        session.close().await;

        info!(
            "Scraped {} websites ({} with at least one contact)",
            records.len(),
            records
                .iter()
                .filter(|r| !r.emails.is_empty() || !r.phones.is_empty())
                .count()
        );
        Ok(records)
    }

    /// Politeness pause between consecutive sites, with jitter so the
    /// cadence is not perfectly regular.
    async fn inter_target_delay(&self) {
        let base = self.config.scraping.rate_limit_delay_ms;
        if base == 0 {
            return;
        }
        let jitter = fastrand::u64(0..=base / 2);
        tokio::time::sleep(Duration::from_millis(base + jitter)).await;
    }
}
