use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::track::UniqueTrack;

/// Source label used for metadata lookup failures.
pub const LOOKUP_SOURCE: &str = "iTunes";

/// Kinds of non-fatal failure collected into a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A source page was fetched but yielded no rows.
    ParseEmpty,
    /// A source page could not be fetched.
    FetchFailed,
    /// A metadata lookup failed for one track.
    ItunesLookupFailed,
}

/// A non-fatal failure recorded in the output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub source: String,
    pub error: ErrorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
}

impl ErrorRecord {
    #[must_use]
    pub fn parse_empty(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            error: ErrorKind::ParseEmpty,
            detail: None,
            track: None,
        }
    }

    #[must_use]
    pub fn fetch_failed(source: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            error: ErrorKind::FetchFailed,
            detail: Some(detail.into()),
            track: None,
        }
    }

    #[must_use]
    pub fn lookup_failed(artist: &str, title: &str, detail: impl Into<String>) -> Self {
        Self {
            source: LOOKUP_SOURCE.to_string(),
            error: ErrorKind::ItunesLookupFailed,
            detail: Some(detail.into()),
            track: Some(format!("{artist} - {title}")),
        }
    }
}

/// The document written at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSnapshot {
    pub ok: bool,
    pub generated_at: DateTime<Utc>,
    pub raw_count: usize,
    pub count: usize,
    pub sources_count: usize,
    pub itunes_used: usize,
    /// Reserved for a second enrichment channel; always zero.
    pub yt_used: usize,
    pub errors: Vec<ErrorRecord>,
    pub items: Vec<UniqueTrack>,
}

impl OutputSnapshot {
    /// Assemble the snapshot from the outputs of the pipeline stages.
    ///
    /// `items` are expected to be already ranked by the aggregator.
    #[must_use]
    pub fn assemble(
        raw_count: usize,
        sources_count: usize,
        items: Vec<UniqueTrack>,
        itunes_used: usize,
        errors: Vec<ErrorRecord>,
    ) -> Self {
        Self {
            ok: true,
            generated_at: Utc::now(),
            raw_count,
            count: items.len(),
            sources_count,
            itunes_used,
            yt_used: 0,
            errors,
            items,
        }
    }
}
