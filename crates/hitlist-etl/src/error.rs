//! Error types for the scrape, enrich and pipeline stages.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from fetching a chart page.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The page answered with a non-success status.
    #[error("HTTP {status}")]
    Status { status: u16 },

    /// The request could not be completed.
    #[error("{0}")]
    Request(#[from] reqwest::Error),
}

impl ScrapeError {
    /// Returns `true` when the fetch may succeed if retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Status { status } => *status == 429 || *status >= 500,
            Self::Request(e) => e.is_timeout() || e.is_connect(),
        }
    }
}

/// Convenience alias for scrape results.
pub type ScrapeResult<T> = std::result::Result<T, ScrapeError>;

/// Errors from a single metadata lookup.
///
/// These never abort a batch; the scheduler records them and moves on.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The lookup service answered with a non-success status.
    #[error("itunes_http_{status}")]
    Status { status: u16 },

    /// An error propagated from `reqwest`.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body could not be parsed.
    #[error("parse error from {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },
}

/// Convenience alias for lookup results.
pub type LookupResult<T> = std::result::Result<T, LookupError>;

/// Errors that abort a whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to load sources from {path}: {source}")]
    Sources {
        path: PathBuf,
        #[source]
        source: hitlist_core::Error,
    },

    #[error("failed to write snapshot to {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: hitlist_core::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
