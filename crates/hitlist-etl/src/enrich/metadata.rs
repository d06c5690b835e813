//! Track metadata returned by a lookup, and how it fills a track.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use hitlist_core::model::UniqueTrack;

use crate::error::LookupResult;

/// Metadata for one track, as returned by a lookup and stored in the cache.
///
/// An entry with every field empty records a lookup that found nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackMetadata {
    pub itunes_genre: String,
    /// `YYYY-MM-DD`
    pub release_date: String,
    pub track_view_url: String,
    pub artwork: String,
}

impl TrackMetadata {
    /// Whether this is a "nothing found" entry.
    pub fn is_empty(&self) -> bool {
        self.itunes_genre.is_empty()
            && self.release_date.is_empty()
            && self.track_view_url.is_empty()
            && self.artwork.is_empty()
    }

    /// Fill the track's empty metadata fields from this entry.
    ///
    /// Non-empty fields are never overwritten. `release_year` and
    /// `age_days` are then derived from the track's release date when they
    /// are still unset.
    pub fn apply_to(&self, track: &mut UniqueTrack, now: DateTime<Utc>) {
        let record = &mut track.record;
        if record.itunes_genre.is_empty() {
            record.itunes_genre.clone_from(&self.itunes_genre);
        }
        if record.release_date.is_empty() {
            record.release_date.clone_from(&self.release_date);
        }
        if track.itunes_artwork.is_empty() {
            track.itunes_artwork.clone_from(&self.artwork);
        }
        if record.release_year.is_none() {
            record.release_year = release_year(&record.release_date);
        }
        if record.age_days.is_none() {
            record.age_days = age_days(&record.release_date, now);
        }
    }
}

/// A metadata source for artist/title pairs.
///
/// `Ok(None)` means the service answered but had no match.
#[async_trait]
pub trait TrackLookup: Send + Sync {
    async fn lookup(&self, artist: &str, title: &str) -> LookupResult<Option<TrackMetadata>>;
}

/// The year of a `YYYY...` date string.
pub fn release_year(release_date: &str) -> Option<i32> {
    release_date.get(..4)?.parse().ok()
}

/// Whole days between `release_date` and `now`, never negative.
///
/// Accepts `YYYY-MM-DD` (taken as UTC midnight) or a full RFC 3339
/// timestamp. Returns `None` for empty or unparseable dates.
pub fn age_days(release_date: &str, now: DateTime<Utc>) -> Option<i64> {
    let released = DateTime::parse_from_rfc3339(release_date)
        .map(|d| d.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(release_date, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|d| d.and_utc())
        })?;

    Some((now - released).num_days().max(0))
}
