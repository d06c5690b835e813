//! Bounded-concurrency enrichment of unique tracks.
//!
//! A fixed number of workers pull track indices from a shared cursor, so
//! every track is claimed by exactly one worker. The cache and the error
//! sink are shared behind async mutexes that are never held across a
//! lookup. Metadata found by the workers is applied to the tracks once all
//! of them have finished.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::Mutex;

use hitlist_core::key::lookup_key;
use hitlist_core::model::{ErrorRecord, UniqueTrack};

use super::cache::MetadataCache;
use super::metadata::{TrackLookup, TrackMetadata};

/// Concurrent lookups when not configured.
pub const DEFAULT_CONCURRENCY: usize = 6;

/// Runs a [`TrackLookup`] over a batch of tracks.
#[derive(Debug)]
pub struct EnrichScheduler<L> {
    lookup: L,
    concurrency: usize,
}

/// State shared by the workers of one batch.
struct Batch<'a> {
    tracks: &'a [UniqueTrack],
    cursor: AtomicUsize,
    fresh: AtomicUsize,
    cache: Mutex<MetadataCache>,
    errors: Mutex<Vec<ErrorRecord>>,
}

impl<L: TrackLookup> EnrichScheduler<L> {
    /// Create a scheduler running at most `concurrency` lookups at once.
    /// Zero is treated as one.
    pub fn new(lookup: L, concurrency: usize) -> Self {
        Self {
            lookup,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Enrich every track, consulting and updating `cache`.
    ///
    /// Failed lookups are appended to `errors` and leave their track
    /// untouched. Returns the number of successful fresh (uncached)
    /// lookups.
    pub async fn enrich(
        &self,
        tracks: &mut [UniqueTrack],
        cache: &mut MetadataCache,
        errors: &mut Vec<ErrorRecord>,
    ) -> usize {
        let total = tracks.len();
        let workers = self.concurrency.min(total);
        log::info!(
            "Enriching {} tracks with {} concurrent lookups",
            total,
            workers
        );

        let batch = Batch {
            tracks: &*tracks,
            cursor: AtomicUsize::new(0),
            fresh: AtomicUsize::new(0),
            cache: Mutex::new(std::mem::take(cache)),
            errors: Mutex::new(std::mem::take(errors)),
        };

        let resolved: Vec<(usize, TrackMetadata)> =
            join_all((0..workers).map(|_| self.worker(&batch)))
                .await
                .into_iter()
                .flatten()
                .collect();

        let fresh = batch.fresh.into_inner();
        *cache = batch.cache.into_inner();
        *errors = batch.errors.into_inner();

        let now = Utc::now();
        for (idx, metadata) in resolved {
            metadata.apply_to(&mut tracks[idx], now);
        }

        log::info!("Enrichment done: {} fresh lookups", fresh);
        fresh
    }

    /// Claim tracks until the cursor runs past the end, returning the
    /// metadata found for each claimed index.
    async fn worker(&self, batch: &Batch<'_>) -> Vec<(usize, TrackMetadata)> {
        let mut resolved = Vec::new();

        loop {
            let idx = batch.cursor.fetch_add(1, Ordering::Relaxed);
            let Some(track) = batch.tracks.get(idx) else {
                break;
            };
            let (artist, title) = (track.artist(), track.title());
            let key = lookup_key(artist, title);

            let cached = batch.cache.lock().await.get(&key).cloned();
            if let Some(metadata) = cached {
                log::trace!("Cache hit: {}", key);
                resolved.push((idx, metadata));
                continue;
            }

            match self.lookup.lookup(artist, title).await {
                Ok(Some(metadata)) => {
                    batch.cache.lock().await.insert(key, metadata.clone());
                    batch.fresh.fetch_add(1, Ordering::Relaxed);
                    resolved.push((idx, metadata));
                }
                Ok(None) => {
                    log::debug!("No match for {} - {}", artist, title);
                    batch
                        .cache
                        .lock()
                        .await
                        .insert(key, TrackMetadata::default());
                }
                Err(e) => {
                    log::warn!("Lookup failed for {} - {}: {}", artist, title, e);
                    batch
                        .errors
                        .lock()
                        .await
                        .push(ErrorRecord::lookup_failed(artist, title, e.to_string()));
                }
            }
        }

        resolved
    }
}
