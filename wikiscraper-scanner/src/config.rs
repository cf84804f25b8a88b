use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://bulbapedia.bulbagarden.net";
pub const DEFAULT_ARTICLE_PREFIX: &str = "/wiki/";
pub const DEFAULT_USER_AGENT: &str = "WikiScraper/0.1 (+https://github.com/wikiscraper/wikiscraper)";

/// How to reach the wiki. Passed to the fetcher and crawler at construction.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub base_url: String,
    pub article_prefix: String,
    pub headers: BTreeMap<String, String>,
    pub timeout_secs: u64,
    /// Extra attempts after the first one for transient failures.
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    /// When set, every fetch reads this file instead of going to the network.
    pub local_html_path: Option<PathBuf>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string());
        headers.insert(
            "Accept".to_string(),
            "text/html,application/xhtml+xml".to_string(),
        );
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            article_prefix: DEFAULT_ARTICLE_PREFIX.to_string(),
            headers,
            timeout_secs: 15,
            max_retries: 3,
            retry_backoff_ms: 1000,
            local_html_path: None,
        }
    }
}

impl ScraperConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_local_html(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_html_path = Some(path.into());
        self
    }

    pub fn with_retries(mut self, max_retries: u32, backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff_ms = backoff.as_millis() as u64;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_takes_defaults() {
        let config: ScraperConfig =
            serde_json::from_str(r#"{"base_url": "http://localhost:9000", "max_retries": 1}"#)
                .unwrap();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.article_prefix, DEFAULT_ARTICLE_PREFIX);
        assert_eq!(config.timeout(), Duration::from_secs(15));
        assert!(config.headers.contains_key("User-Agent"));
        assert!(config.local_html_path.is_none());
    }
}
