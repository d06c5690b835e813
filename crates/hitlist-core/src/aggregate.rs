//! Cross-source merge, position aggregation and ranking.

use std::collections::HashMap;

use crate::key::TrackKey;
use crate::model::{RawTrackRecord, UniqueTrack};

/// Merge raw chart rows into ranked unique tracks.
///
/// Records are grouped by [`TrackKey`]; the first record of each group
/// provides the display fields and every record contributes one
/// [`SourcePosition`](crate::model::SourcePosition). The result is sorted by
/// score, highest first, keeping first-seen order between equal scores.
#[must_use]
pub fn aggregate(records: &[RawTrackRecord]) -> Vec<UniqueTrack> {
    let mut index: HashMap<TrackKey, usize> = HashMap::new();
    let mut tracks: Vec<UniqueTrack> = Vec::new();

    for record in records {
        let Some(key) = TrackKey::from_parts(&record.artist, record.key_title()) else {
            log::trace!(
                "Skipping row without a usable key from {}: {:?}",
                record.source_name,
                record.track_raw
            );
            continue;
        };

        let slot = *index.entry(key).or_insert_with(|| {
            tracks.push(UniqueTrack::seed(record));
            tracks.len() - 1
        });
        tracks[slot].observe(record);
    }

    for track in &mut tracks {
        track.finalize();
    }

    // `sort_by` is stable, which keeps seed order for ties.
    tracks.sort_by(|a, b| b.score.cmp(&a.score));

    log::debug!(
        "Aggregated {} rows into {} unique tracks",
        records.len(),
        tracks.len()
    );

    tracks
}
