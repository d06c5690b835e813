//! HTTP fetching of kworb chart pages.

use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, PRAGMA};
use reqwest::Client;

use hitlist_core::model::RawTrackRecord;

use super::parse::parse_rows;
use super::ChartFetcher;
use crate::error::{ScrapeError, ScrapeResult};
use crate::sources::SourceConfig;

/// kworb serves stripped-down pages to unknown agents, so present as a
/// desktop browser.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

const ACCEPT_LANGUAGES: &str = "en-US,en;q=0.9,es;q=0.8,pt;q=0.7";

/// Chart fetcher for kworb.net pages.
#[derive(Debug, Clone)]
pub struct KworbFetcher {
    http: Client,
    max_rows: usize,
    retries: usize,
}

impl KworbFetcher {
    /// Create a new fetcher.
    ///
    /// `retries` bounds the extra attempts made for transient failures
    /// (429, 5xx, timeouts and connection errors).
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(timeout: Duration, max_rows: usize, retries: usize) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            max_rows,
            retries,
        })
    }

    /// Fetch a page body, retrying transient failures with exponential backoff.
    pub async fn fetch_text(&self, url: &str) -> ScrapeResult<String> {
        (|| self.fetch_once(url))
            .retry(ExponentialBuilder::default().with_max_times(self.retries))
            .when(ScrapeError::is_transient)
            .notify(|err: &ScrapeError, dur: Duration| {
                log::warn!("Fetching {} failed ({}), retrying in {:?}", url, err, dur);
            })
            .await
    }

    async fn fetch_once(&self, url: &str) -> ScrapeResult<String> {
        let response = self
            .http
            .get(url)
            .header(ACCEPT, ACCEPT_HTML)
            .header(ACCEPT_LANGUAGE, ACCEPT_LANGUAGES)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl ChartFetcher for KworbFetcher {
    async fn fetch_source_rows(&self, source: &SourceConfig) -> ScrapeResult<Vec<RawTrackRecord>> {
        log::debug!("Fetching {}", source.url);
        let html = self.fetch_text(&source.url).await?;
        Ok(parse_rows(&html, &source.record_template(), self.max_rows))
    }
}
