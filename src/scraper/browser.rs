use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::models::Result;

/// One headless Chrome per run. The CDP event handler runs on a tracked
/// task; it must be aborted once the browser is gone or it spins forever.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    pub async fn launch(request_timeout: Duration) -> Result<Self> {
        info!("Launching headless browser");

        let config = BrowserConfig::builder()
            .request_timeout(request_timeout)
            .window_size(1280, 800)
            .arg("--disable-notifications")
            .arg("--disable-popup-blocking")
            .arg("--mute-audio")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .build()
            .map_err(|e| format!("failed to build browser config: {e}"))?;

        let (browser, mut events) = Browser::launch(config).await?;

        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {e:?}");
                }
            }
            debug!("Browser event handler finished");
        });

        Ok(Self { browser, handler })
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Close the browser exactly once, reap the process, stop the handler.
    /// Close failures are logged, not propagated: by this point every
    /// record has already been emitted.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser cleanly: {e}");
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to reap browser process: {e}");
        }
        self.handler.abort();
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // fallback when close() was never reached
        self.handler.abort();
    }
}
