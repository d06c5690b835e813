use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::source::SourceType;

/// One chart-listing row scraped from one source.
///
/// Besides the parsed track, every record carries a fixed set of
/// enrichment placeholders that start out empty and are only ever filled
/// in on the de-duplicated [`UniqueTrack`](crate::model::UniqueTrack).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTrackRecord {
    pub source_type: SourceType,
    pub source_name: String,
    pub source_url: String,
    pub region: String,

    /// Source-defined sub-category (chart flavour), carried through as-is.
    pub bucket: String,

    /// Chart position; `None` when the row had no usable number.
    pub pos: Option<u32>,

    /// Cleaned free-text track cell, before the artist/title split.
    pub track_raw: String,
    pub artist: String,
    pub title: String,

    // --- Reserved chart statistics (not parsed) ---
    pub streams: Option<u64>,
    pub delta: Option<i64>,

    // --- Enrichment placeholders ---
    pub itunes_genre: String,
    pub genre_label: String,
    pub release_date: String,
    pub release_year: Option<i32>,
    pub age_days: Option<i64>,
    pub freshness_code: String,
    pub freshness_label: String,
    pub youtube_video_id: String,
    pub youtube_url: String,
    pub cover_url: String,

    /// When this record was scraped.
    pub published: DateTime<Utc>,
}

impl Default for RawTrackRecord {
    fn default() -> Self {
        Self {
            source_type: SourceType::Unknown,
            source_name: String::new(),
            source_url: String::new(),
            region: String::new(),
            bucket: String::new(),
            pos: None,
            track_raw: String::new(),
            artist: String::new(),
            title: String::new(),
            streams: None,
            delta: None,
            itunes_genre: String::new(),
            genre_label: String::new(),
            release_date: String::new(),
            release_year: None,
            age_days: None,
            freshness_code: "unknown".to_string(),
            freshness_label: String::new(),
            youtube_video_id: String::new(),
            youtube_url: String::new(),
            cover_url: String::new(),
            published: Utc::now(),
        }
    }
}

impl RawTrackRecord {
    #[must_use]
    pub fn new(
        source_type: SourceType,
        source_name: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            source_type,
            source_name: source_name.into(),
            source_url: source_url.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_placement(mut self, region: impl Into<String>, bucket: impl Into<String>) -> Self {
        self.region = region.into();
        self.bucket = bucket.into();
        self
    }

    #[must_use]
    pub fn with_position(mut self, pos: Option<u32>) -> Self {
        self.pos = pos;
        self
    }

    #[must_use]
    pub fn with_track(
        mut self,
        track_raw: impl Into<String>,
        artist: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        self.track_raw = track_raw.into();
        self.artist = artist.into();
        self.title = title.into();
        self
    }

    /// The title used for de-duplication: the parsed title, or the raw
    /// track text when no title could be split off.
    #[must_use]
    pub fn key_title(&self) -> &str {
        if self.title.is_empty() {
            &self.track_raw
        } else {
            &self.title
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let record = RawTrackRecord::new(SourceType::SpotifyCountry, "Spotify MX", "https://x")
            .with_placement("MX", "daily")
            .with_position(Some(4))
            .with_track("Karol G - Si Antes", "Karol G", "Si Antes");

        assert_eq!(record.source_name, "Spotify MX");
        assert_eq!(record.region, "MX");
        assert_eq!(record.bucket, "daily");
        assert_eq!(record.pos, Some(4));
        assert_eq!(record.artist, "Karol G");
        assert_eq!(record.freshness_code, "unknown");
        assert!(record.itunes_genre.is_empty());
        assert!(record.release_year.is_none());
    }

    #[test]
    fn test_key_title_falls_back_to_raw_text() {
        let record = RawTrackRecord::default().with_track("Mystery Jam", "", "");
        assert_eq!(record.key_title(), "Mystery Jam");

        let record = RawTrackRecord::default().with_track("A - B", "A", "B");
        assert_eq!(record.key_title(), "B");
    }

    #[test]
    fn test_missing_fields_deserialize_as_empty() {
        let json = r#"{"source_name": "S1", "pos": 3}"#;
        let record: RawTrackRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.source_name, "S1");
        assert_eq!(record.pos, Some(3));
        assert!(record.artist.is_empty());
        assert!(record.title.is_empty());
        assert_eq!(record.source_type, SourceType::Unknown);
    }
}
