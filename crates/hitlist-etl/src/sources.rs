//! Chart source list.

use std::path::Path;

use serde::{Deserialize, Serialize};

use hitlist_core::model::{RawTrackRecord, SourceType};
use hitlist_core::persist;

/// One chart page to scrape, as listed in the sources file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub bucket: String,
}

impl SourceConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: None,
            region: String::new(),
            bucket: String::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_placement(mut self, region: impl Into<String>, bucket: impl Into<String>) -> Self {
        self.region = region.into();
        self.bucket = bucket.into();
        self
    }

    /// The name recorded on rows and errors; the URL when no name is set.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.url,
        }
    }

    pub fn source_type(&self) -> SourceType {
        SourceType::from_url(&self.url)
    }

    /// A record carrying this source's fields, to be completed per row.
    pub fn record_template(&self) -> RawTrackRecord {
        RawTrackRecord::new(self.source_type(), self.display_name(), &self.url)
            .with_placement(&self.region, &self.bucket)
    }
}

/// Load the ordered source list.
///
/// # Errors
/// Returns an error if the file is missing or is not a JSON array of
/// sources. Either is fatal for a run.
pub fn load_sources(path: &Path) -> hitlist_core::Result<Vec<SourceConfig>> {
    let sources: Vec<SourceConfig> = persist::read_json(path)?;
    log::debug!("Loaded {} sources from {}", sources.len(), path.display());
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_display_name_falls_back_to_url() {
        let url = "https://kworb.net/spotify/country/mx_daily.html";
        assert_eq!(SourceConfig::new(url).display_name(), url);
        assert_eq!(SourceConfig::new(url).with_name("").display_name(), url);
        assert_eq!(
            SourceConfig::new(url).with_name("Spotify MX").display_name(),
            "Spotify MX"
        );
    }

    #[test]
    fn test_record_template() {
        let source = SourceConfig::new("https://kworb.net/youtube/insights/co.html")
            .with_name("YT CO")
            .with_placement("CO", "weekly");
        let template = source.record_template();
        assert_eq!(template.source_type, SourceType::YoutubeInsights);
        assert_eq!(template.source_name, "YT CO");
        assert_eq!(template.region, "CO");
        assert_eq!(template.bucket, "weekly");
        assert!(template.track_raw.is_empty());
    }

    #[test]
    fn test_load_sources() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sources.json");
        std::fs::write(
            &path,
            r#"[
                {"url": "https://kworb.net/spotify/country/mx_daily.html", "name": "Spotify MX", "region": "MX", "bucket": "daily"},
                {"url": "https://kworb.net/itunes/"}
            ]"#,
        )
        .unwrap();

        let sources = load_sources(&path).unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].display_name(), "Spotify MX");
        assert_eq!(sources[1].name, None);
        assert_eq!(sources[1].region, "");
    }

    #[test]
    fn test_load_sources_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(load_sources(&dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn test_load_sources_rejects_non_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sources.json");
        std::fs::write(&path, r#"{"url": "https://kworb.net/"}"#).unwrap();
        assert!(load_sources(&path).is_err());
    }
}
