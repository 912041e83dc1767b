use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use scraper::{Html, Selector};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::{DebugConfig, ScrapingConfig};
use crate::models::Result;
use crate::patterns::CONTACT_LINK_PATTERN;

/// What one target's navigation produced: the settled page's HTML and
/// every outbound anchor href, resolved to an absolute URL.
#[derive(Debug, Default)]
pub struct PageCapture {
    pub html: String,
    pub links: Vec<String>,
}

impl PageCapture {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Navigate one target and capture its contact-relevant page. Failures
/// never propagate past this function: a malformed URL, a timeout or a
/// dead host all degrade to an empty capture, and the page is closed on
/// every exit path.
pub async fn load(
    browser: &Browser,
    target: &str,
    scraping: &ScrapingConfig,
    debug_cfg: &DebugConfig,
) -> PageCapture {
    let url = match normalize_target(target) {
        Some(url) => url,
        None => {
            warn!("Skipping malformed URL: {target}");
            return PageCapture::empty();
        }
    };

    let page = match browser.new_page("about:blank").await {
        Ok(page) => page,
        Err(e) => {
            error!("{target}: could not open a page: {e}");
            return PageCapture::empty();
        }
    };

    let capture = match capture_with_contact_hop(&page, &url, scraping).await {
        Ok(capture) => capture,
        Err(e) => {
            error!("{target}: error during scraping: {e}. Saving debug artifacts.");
            save_debug_artifacts(&page, debug_cfg).await;
            PageCapture::empty()
        }
    };

    if let Err(e) = page.close().await {
        warn!("{target}: failed to close page: {e}");
    }
    capture
}

async fn capture_with_contact_hop(
    page: &Page,
    url: &Url,
    scraping: &ScrapingConfig,
) -> Result<PageCapture> {
    navigate_settled(page, url.as_str(), scraping).await?;

    // Opportunistic hop to a contact/about page. Anything that goes wrong
    // here leaves us scraping whatever page is currently loaded.
    match find_contact_link(page, url, scraping).await {
        Some(contact_url) => {
            info!("{url}: found contact page, navigating to {contact_url}");
            if let Err(e) = navigate_settled(page, contact_url.as_str(), scraping).await {
                debug!("{url}: contact page navigation failed ({e}), scraping current page");
            }
        }
        None => debug!("{url}: no contact page found, scraping landing page"),
    }

    let html = page.content().await?;
    let base = current_url(page).await.unwrap_or_else(|| url.clone());
    let links = collect_links(&html, &base);
    Ok(PageCapture { html, links })
}

/// `https://` unless a scheme is already present, then a parse that must
/// produce a non-empty host.
fn normalize_target(target: &str) -> Option<Url> {
    let trimmed = target.trim();
    if trimmed.is_empty() {
        return None;
    }
    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    let url = Url::parse(&with_scheme).ok()?;
    url.host_str().filter(|h| !h.is_empty())?;
    Some(url)
}

async fn navigate_settled(page: &Page, url: &str, scraping: &ScrapingConfig) -> Result<()> {
    let budget = Duration::from_secs(scraping.navigation_timeout_seconds);
    timeout(budget, async {
        page.goto(url).await?;
        page.wait_for_navigation().await?;
        Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
    })
    .await
    .map_err(|_| format!("navigation to {url} timed out"))??;

    wait_for_network_idle(page, Duration::from_secs(scraping.settle_timeout_seconds)).await;
    Ok(())
}

/// In-page settle heuristic: the page counts as quiet once readyState is
/// complete and the resource count has been stable for a short idle
/// window. Best-effort; a failed evaluation just means we scrape sooner.
async fn wait_for_network_idle(page: &Page, budget: Duration) {
    let timeout_ms = budget.as_millis().min(u128::from(u64::MAX)) as u64;
    let js = format!(
        r#"(async () => {{
            const timeoutMs = {timeout_ms};
            const idleMs = 500;
            const interval = 250;
            const start = Date.now();
            let last = performance.getEntriesByType('resource').length;
            let stable = 0;
            while (Date.now() - start < timeoutMs) {{
                await new Promise(r => setTimeout(r, interval));
                const cur = performance.getEntriesByType('resource').length;
                if (document.readyState === 'complete' && cur === last) {{
                    stable += interval;
                    if (stable >= idleMs) return true;
                }} else {{
                    stable = 0;
                }}
                last = cur;
            }}
            return false;
        }})()"#
    );

    match page.evaluate(js).await {
        Ok(result) => {
            if !result.into_value::<bool>().unwrap_or(false) {
                debug!("Network did not fully settle within {timeout_ms}ms");
            }
        }
        Err(e) => debug!("Network-settle heuristic failed: {e}"),
    }
}

/// First anchor whose visible text looks like contact/about/support,
/// resolved against the page we are on. Bounded by the probe budget and
/// silent about every kind of failure.
async fn find_contact_link(page: &Page, base: &Url, scraping: &ScrapingConfig) -> Option<Url> {
    let budget = Duration::from_millis(scraping.contact_probe_timeout_ms);
    let html = timeout(budget, page.content()).await.ok()?.ok()?;
    let current = current_url(page).await.unwrap_or_else(|| base.clone());
    first_contact_href(&html, &current)
}

fn first_contact_href(html: &str, base: &Url) -> Option<Url> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a[href]").unwrap();
    for element in document.select(&anchors) {
        let text: String = element.text().collect();
        if !CONTACT_LINK_PATTERN.is_match(text.trim()) {
            continue;
        }
        if let Some(href) = element.value().attr("href") {
            if let Ok(resolved) = base.join(href) {
                if resolved.scheme() == "http" || resolved.scheme() == "https" {
                    return Some(resolved);
                }
            }
        }
    }
    None
}

fn collect_links(html: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a[href]").unwrap();
    document
        .select(&anchors)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| base.join(href).ok())
        .map(|url| url.to_string())
        .collect()
}

async fn current_url(page: &Page) -> Option<Url> {
    match page.url().await {
        Ok(Some(url)) => Url::parse(&url).ok(),
        _ => None,
    }
}

/// Postmortem capture for a target that blew up mid-navigation. Both
/// writes are best-effort; their own failures only get logged.
async fn save_debug_artifacts(page: &Page, debug_cfg: &DebugConfig) {
    let params = ScreenshotParams::builder()
        .format(CaptureScreenshotFormat::Png)
        .full_page(true)
        .build();
    match page.save_screenshot(params, &debug_cfg.screenshot_path).await {
        Ok(_) => info!("Saved screenshot to {}", debug_cfg.screenshot_path),
        Err(e) => warn!("Failed to save debug screenshot: {e}"),
    }

    match page.content().await {
        Ok(html) => match tokio::fs::write(&debug_cfg.html_path, html).await {
            Ok(()) => info!("Saved HTML to {}", debug_cfg.html_path),
            Err(e) => warn!("Failed to save debug HTML: {e}"),
        },
        Err(e) => warn!("Could not read page content for debug HTML: {e}"),
    }
}
