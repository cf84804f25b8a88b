use crate::config::ScraperConfig;
use crate::crawler::PageSource;
use crate::error::{Result, ScanError};
use crate::phrase::Phrase;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Rate limiting and gateway/server hiccups; anything else non-200 is final.
const TRANSIENT_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Resolves phrases to raw article markup, over HTTP or from a local file.
pub struct Fetcher {
    client: Client,
    config: ScraperConfig,
}

impl Fetcher {
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ScanError::InvalidHeader(format!("{}: {}", name, e)))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| ScanError::InvalidHeader(format!("{}: {}", name, e)))?;
            headers.insert(header_name, header_value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .connect_timeout(config.timeout())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client, config })
    }

    /// Canonical article URL: base URL + article prefix + phrase segment.
    ///
    /// Slashes in the title stay path separators so subpages like `AC/DC`
    /// resolve to `/wiki/AC/DC`.
    pub fn article_url(&self, phrase: &Phrase) -> Result<Url> {
        let base = format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.article_prefix
        );
        let mut url = Url::parse(&base).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", base, e)))?;
        url.path_segments_mut()
            .map_err(|_| ScanError::InvalidUrl(format!("{} cannot be a base URL", base)))?
            .pop_if_empty()
            .extend(phrase.url_segment().split('/'));
        Ok(url)
    }

    pub async fn fetch(&self, phrase: &Phrase) -> Result<String> {
        match &self.config.local_html_path {
            Some(path) => read_local_html(path).await,
            None => self.fetch_remote(phrase).await,
        }
    }

    async fn fetch_remote(&self, phrase: &Phrase) -> Result<String> {
        let url = self.article_url(phrase)?;
        let max_retries = self.config.max_retries;
        let mut attempt: u32 = 0;

        loop {
            let failure = match self.fetch_once(&url).await {
                Ok(body) => return Ok(body),
                Err(e) if is_transient(&e) => e,
                Err(e) => return Err(e),
            };

            if attempt >= max_retries {
                warn!("Giving up on {} after {} attempts: {}", url, attempt + 1, failure);
                return Err(failure);
            }

            let delay = backoff_delay(self.config.retry_backoff(), attempt);
            warn!(
                "Transient failure for {} (attempt {}/{}): {}; retrying in {:?}",
                url,
                attempt + 1,
                max_retries + 1,
                failure,
                delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn fetch_once(&self, url: &Url) -> Result<String> {
        debug!("Fetching {}", url);
        let transport = |source| ScanError::FetchTransport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url.clone()).send().await.map_err(transport)?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ScanError::FetchStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Decoded with the Content-Type charset, UTF-8 when none is declared
        let body = response.text().await.map_err(transport)?;
        info!("Fetched {} ({} bytes)", url, body.len());
        Ok(body)
    }
}

impl PageSource for Fetcher {
    async fn fetch_page(&self, phrase: &Phrase) -> Result<String> {
        self.fetch(phrase).await
    }
}

async fn read_local_html(path: &Path) -> Result<String> {
    debug!("Reading local HTML from {}", path.display());
    tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => ScanError::NotFound(path.to_path_buf()),
        _ => ScanError::IoError(e),
    })
}

fn is_transient(error: &ScanError) -> bool {
    match error {
        ScanError::FetchTransport { .. } => true,
        ScanError::FetchStatus { status, .. } => TRANSIENT_STATUSES.contains(status),
        _ => false,
    }
}

/// `base × 2^attempt`, saturating instead of overflowing.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}
