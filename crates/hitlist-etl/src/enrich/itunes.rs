//! iTunes Search API client.
//!
//! Looks up one song per artist/title pair and maps the first result onto
//! [`TrackMetadata`]. The endpoint needs no key; it answers with
//! `text/javascript` JSON which `reqwest` parses regardless.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::metadata::{TrackLookup, TrackMetadata};
use crate::error::{LookupError, LookupResult};

pub const ITUNES_SEARCH_URL: &str = "https://itunes.apple.com/search";

const USER_AGENT: &str = concat!("hitlist/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ItunesSong>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ItunesSong {
    #[serde(rename = "primaryGenreName")]
    primary_genre_name: Option<String>,
    #[serde(rename = "releaseDate")]
    release_date: Option<String>,
    #[serde(rename = "trackViewUrl")]
    track_view_url: Option<String>,
    #[serde(rename = "artworkUrl100")]
    artwork_url_100: Option<String>,
    #[serde(rename = "artworkUrl60")]
    artwork_url_60: Option<String>,
    #[serde(rename = "artworkUrl30")]
    artwork_url_30: Option<String>,
}

impl ItunesSong {
    fn into_metadata(self) -> TrackMetadata {
        let artwork = [self.artwork_url_100, self.artwork_url_60, self.artwork_url_30]
            .into_iter()
            .flatten()
            .find(|url| !url.is_empty())
            .map(|url| upgrade_artwork(&url))
            .unwrap_or_default();

        TrackMetadata {
            itunes_genre: self.primary_genre_name.unwrap_or_default(),
            release_date: self
                .release_date
                .map(|d| d.chars().take(10).collect())
                .unwrap_or_default(),
            track_view_url: self.track_view_url.unwrap_or_default(),
            artwork,
        }
    }
}

/// Ask for the 300px rendition of a 100px artwork URL.
fn upgrade_artwork(url: &str) -> String {
    url.replacen("100x100", "300x300", 1)
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// iTunes Search API client.
#[derive(Debug, Clone)]
pub struct ItunesClient {
    http: Client,
    base_url: String,
}

impl ItunesClient {
    /// Create a new client against `base_url` (normally [`ITUNES_SEARCH_URL`]).
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Search for the best matching song.
    ///
    /// # Errors
    /// Returns [`LookupError::Status`] for a non-success response, and
    /// request or parse errors otherwise.
    pub async fn search(&self, artist: &str, title: &str) -> LookupResult<Option<TrackMetadata>> {
        let term = format!("{artist} {title}");
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("term", term.trim()), ("entity", "song"), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
            });
        }

        let body: SearchResponse = response.json().await.map_err(|e| LookupError::Parse {
            source_name: "iTunes".to_string(),
            message: e.to_string(),
        })?;

        Ok(body.results.into_iter().next().map(ItunesSong::into_metadata))
    }
}

#[async_trait]
impl TrackLookup for ItunesClient {
    async fn lookup(&self, artist: &str, title: &str) -> LookupResult<Option<TrackMetadata>> {
        log::debug!("iTunes lookup: {} - {}", artist, title);
        self.search(artist, title).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(json: &str) -> Option<TrackMetadata> {
        let body: SearchResponse = serde_json::from_str(json).unwrap();
        body.results.into_iter().next().map(ItunesSong::into_metadata)
    }

    #[test]
    fn test_client_creation() {
        let client = ItunesClient::new(ITUNES_SEARCH_URL, Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn test_parse_full_result() {
        let json = r#"{
            "resultCount": 1,
            "results": [{
                "wrapperType": "track",
                "kind": "song",
                "artistName": "Bad Bunny",
                "trackName": "MONACO",
                "primaryGenreName": "Urbano latino",
                "releaseDate": "2023-10-13T12:00:00Z",
                "trackViewUrl": "https://music.apple.com/us/album/monaco/1?i=2",
                "artworkUrl30": "https://is1.mzstatic.com/image/thumb/x/30x30bb.jpg",
                "artworkUrl60": "https://is1.mzstatic.com/image/thumb/x/60x60bb.jpg",
                "artworkUrl100": "https://is1.mzstatic.com/image/thumb/x/100x100bb.jpg"
            }]
        }"#;

        let meta = first(json).unwrap();
        assert_eq!(meta.itunes_genre, "Urbano latino");
        assert_eq!(meta.release_date, "2023-10-13");
        assert_eq!(
            meta.track_view_url,
            "https://music.apple.com/us/album/monaco/1?i=2"
        );
        assert_eq!(
            meta.artwork,
            "https://is1.mzstatic.com/image/thumb/x/300x300bb.jpg"
        );
    }

    #[test]
    fn test_artwork_falls_back_to_smaller_sizes() {
        let json = r#"{"results": [{
            "artworkUrl60": "https://is1.mzstatic.com/image/thumb/x/60x60bb.jpg"
        }]}"#;
        let meta = first(json).unwrap();
        assert_eq!(meta.artwork, "https://is1.mzstatic.com/image/thumb/x/60x60bb.jpg");
        assert_eq!(meta.itunes_genre, "");
        assert_eq!(meta.release_date, "");
    }

    #[test]
    fn test_no_results() {
        assert!(first(r#"{"resultCount": 0, "results": []}"#).is_none());
        assert!(first("{}").is_none());
    }

    #[test]
    fn test_upgrade_artwork() {
        assert_eq!(upgrade_artwork("a/100x100bb.jpg"), "a/300x300bb.jpg");
        assert_eq!(upgrade_artwork("a/60x60bb.jpg"), "a/60x60bb.jpg");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_a_lookup_error() {
        let client = ItunesClient::new("http://127.0.0.1:9/search", Duration::from_secs(2)).unwrap();
        let result = client.lookup("Feid", "Luna").await;
        assert!(matches!(result, Err(LookupError::Request(_))));
    }
}
