//! Scraping and enrichment stages for hitlist.
//!
//! Fetches kworb chart pages, merges their rows into unique tracks, fills
//! in track metadata from the iTunes Search API through a persistent cache,
//! and writes the resulting snapshot.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod enrich;
pub mod error;
pub mod pipeline;
pub mod scrape;
pub mod sources;

pub use config::Config;
pub use error::{LookupError, LookupResult, PipelineError, ScrapeError, ScrapeResult};
pub use pipeline::{build_pipeline, Pipeline, RunOptions};
pub use sources::{load_sources, SourceConfig};
