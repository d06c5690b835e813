//! Metadata enrichment of unique tracks.

pub mod cache;
pub mod itunes;
pub mod metadata;
pub mod scheduler;

pub use cache::{CacheStats, MetadataCache};
pub use itunes::{ItunesClient, ITUNES_SEARCH_URL};
pub use metadata::{age_days, release_year, TrackLookup, TrackMetadata};
pub use scheduler::{EnrichScheduler, DEFAULT_CONCURRENCY};
