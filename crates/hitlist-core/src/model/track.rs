use serde::{Deserialize, Serialize};

use crate::model::record::RawTrackRecord;

/// Upper bound of the ranking score; a track at position 1 scores 199.
pub const SCORE_CEILING: i64 = 200;

/// Stand-in best position for tracks with no known chart position.
pub const UNRANKED_POSITION: i64 = 999;

/// One piece of chart evidence contributing to a [`UniqueTrack`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePosition {
    pub source_name: String,
    pub bucket: String,
    pub region: String,
    pub pos: Option<u32>,
}

impl SourcePosition {
    #[must_use]
    pub fn from_record(record: &RawTrackRecord) -> Self {
        Self {
            source_name: record.source_name.clone(),
            bucket: record.bucket.clone(),
            region: record.region.clone(),
            pos: record.pos,
        }
    }

    /// The position if it counts for ranking. Zero is treated as unknown.
    #[must_use]
    pub fn ranked_pos(&self) -> Option<u32> {
        self.pos.filter(|p| *p != 0)
    }
}

/// A de-duplicated chart entry aggregated from one or more source rows.
///
/// Display fields come from the first record seen for the track; the
/// position evidence of every contributing record is kept in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueTrack {
    #[serde(flatten)]
    pub record: RawTrackRecord,

    /// Artwork URL from the metadata lookup.
    #[serde(default)]
    pub itunes_artwork: String,

    pub sources_positions: Vec<SourcePosition>,
    pub best_pos: Option<u32>,
    pub avg_pos: Option<u32>,
    pub score: i64,
}

impl UniqueTrack {
    /// Seed a track from its first record, with no evidence recorded yet.
    #[must_use]
    pub fn seed(record: &RawTrackRecord) -> Self {
        Self {
            record: record.clone(),
            itunes_artwork: String::new(),
            sources_positions: Vec::new(),
            best_pos: None,
            avg_pos: None,
            score: 0,
        }
    }

    /// Record one more source row for this track.
    pub fn observe(&mut self, record: &RawTrackRecord) {
        let position = SourcePosition::from_record(record);
        if let Some(pos) = position.ranked_pos() {
            self.best_pos = Some(self.best_pos.map_or(pos, |best| best.min(pos)));
        }
        self.sources_positions.push(position);
    }

    /// Compute `avg_pos` and `score` from the collected evidence.
    pub fn finalize(&mut self) {
        let ranked: Vec<u32> = self
            .sources_positions
            .iter()
            .filter_map(SourcePosition::ranked_pos)
            .collect();

        self.avg_pos = if ranked.is_empty() {
            None
        } else {
            let sum: u64 = ranked.iter().map(|p| u64::from(*p)).sum();
            let mean = sum as f64 / ranked.len() as f64;
            Some(mean.round() as u32)
        };

        let best = self.best_pos.map_or(UNRANKED_POSITION, i64::from);
        self.score = (SCORE_CEILING - best).max(1);
    }

    #[must_use]
    pub fn artist(&self) -> &str {
        &self.record.artist
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.record.title
    }
}
