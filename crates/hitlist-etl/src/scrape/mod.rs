//! Chart page scraping.

pub mod fetch;
pub mod parse;

use async_trait::async_trait;

use hitlist_core::model::{ErrorRecord, RawTrackRecord};

use crate::error::ScrapeResult;
use crate::sources::SourceConfig;

pub use fetch::KworbFetcher;
pub use parse::{clean_track_text, parse_rows, split_artist_title};

/// Fetches one chart source and extracts its rows.
///
/// An empty vector means the page had no usable rows.
#[async_trait]
pub trait ChartFetcher: Send + Sync {
    async fn fetch_source_rows(&self, source: &SourceConfig) -> ScrapeResult<Vec<RawTrackRecord>>;
}

/// Scrape every source in order.
///
/// Failures never stop the loop: a source that cannot be fetched is
/// recorded as `fetch_failed`, one that yields no rows as `parse_empty`.
pub async fn scrape_all<F: ChartFetcher + ?Sized>(
    fetcher: &F,
    sources: &[SourceConfig],
) -> (Vec<RawTrackRecord>, Vec<ErrorRecord>) {
    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for source in sources {
        let name = source.display_name();
        match fetcher.fetch_source_rows(source).await {
            Ok(found) if found.is_empty() => {
                log::warn!("No rows parsed from {}", name);
                errors.push(ErrorRecord::parse_empty(name));
            }
            Ok(found) => {
                log::info!("{}: {} rows", name, found.len());
                rows.extend(found);
            }
            Err(e) => {
                log::warn!("Failed to fetch {}: {}", name, e);
                errors.push(ErrorRecord::fetch_failed(name, e.to_string()));
            }
        }
    }

    (rows, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use hitlist_core::model::ErrorKind;

    struct CannedFetcher;

    #[async_trait]
    impl ChartFetcher for CannedFetcher {
        async fn fetch_source_rows(
            &self,
            source: &SourceConfig,
        ) -> ScrapeResult<Vec<RawTrackRecord>> {
            match source.url.as_str() {
                "https://down.example" => Err(ScrapeError::Status { status: 503 }),
                "https://empty.example" => Ok(Vec::new()),
                _ => Ok(vec![
                    source
                        .record_template()
                        .with_position(Some(1))
                        .with_track("A - B", "A", "B"),
                    source
                        .record_template()
                        .with_position(Some(2))
                        .with_track("C - D", "C", "D"),
                ]),
            }
        }
    }

    #[tokio::test]
    async fn test_scrape_all_records_failures_and_continues() {
        let sources = vec![
            SourceConfig::new("https://down.example").with_name("Down"),
            SourceConfig::new("https://empty.example"),
            SourceConfig::new("https://ok.example").with_name("Ok"),
        ];

        let (rows, errors) = scrape_all(&CannedFetcher, &sources).await;

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].source_name, "Ok");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].source, "Down");
        assert_eq!(errors[0].error, ErrorKind::FetchFailed);
        assert_eq!(errors[0].detail.as_deref(), Some("HTTP 503"));
        assert_eq!(errors[1].source, "https://empty.example");
        assert_eq!(errors[1].error, ErrorKind::ParseEmpty);
    }

    #[tokio::test]
    async fn test_scrape_all_no_sources() {
        let (rows, errors) = scrape_all(&CannedFetcher, &[]).await;
        assert!(rows.is_empty());
        assert!(errors.is_empty());
    }
}
