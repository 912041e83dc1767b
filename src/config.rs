use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub scraping: ScrapingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScrapingConfig {
    /// Hard ceiling on a single page navigation, load event included.
    pub navigation_timeout_seconds: u64,
    /// Budget for locating a contact/about link and reading its href.
    pub contact_probe_timeout_ms: u64,
    /// How long the in-page settle heuristic may wait for network quiescence.
    pub settle_timeout_seconds: u64,
    /// Base delay between consecutive targets; jitter is added on top.
    pub rate_limit_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub directory: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DebugConfig {
    pub screenshot_path: String,
    pub html_path: String,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            navigation_timeout_seconds: 30,
            contact_probe_timeout_ms: 2000,
            settle_timeout_seconds: 8,
            rate_limit_delay_ms: 1000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "out".to_string(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            screenshot_path: "error_screenshot.png".to_string(),
            html_path: "error_page.html".to_string(),
        }
    }
}

pub async fn load_config(
    path: &str,
) -> std::result::Result<Config, Box<dyn std::error::Error + Send + Sync>> {
    let content = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.scraping.navigation_timeout_seconds, 30);
        assert_eq!(config.scraping.contact_probe_timeout_ms, 2000);
        assert_eq!(config.output.directory, "out");
        assert_eq!(config.debug.screenshot_path, "error_screenshot.png");
    }

    #[test]
    fn partial_yaml_falls_back_to_section_defaults() {
        let config: Config = serde_yaml::from_str("scraping:\n  navigation_timeout_seconds: 10\n  contact_probe_timeout_ms: 500\n  settle_timeout_seconds: 2\n  rate_limit_delay_ms: 0\n").unwrap();
        assert_eq!(config.scraping.navigation_timeout_seconds, 10);
        assert_eq!(config.logging.level, "info");
    }
}
