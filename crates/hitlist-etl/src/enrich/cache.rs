//! Persistent metadata cache.
//!
//! A JSON object keyed by [`lookup_key`](hitlist_core::key::lookup_key).
//! Entries are never expired; a "nothing found" entry suppresses further
//! lookups of that track for good.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use hitlist_core::persist;

use super::metadata::TrackMetadata;

/// Lookup results keyed by normalized artist/title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataCache {
    entries: BTreeMap<String, TrackMetadata>,
}

/// Entry counts for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total: usize,
    /// Entries recording that a lookup found nothing.
    pub negative: usize,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the cache, starting empty when the file is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No metadata cache at {}, starting empty", path.display());
            return Self::default();
        }

        match persist::read_json::<Self>(path) {
            Ok(cache) => {
                log::debug!("Loaded {} cached entries from {}", cache.len(), path.display());
                cache
            }
            Err(e) => {
                log::warn!(
                    "Ignoring unreadable metadata cache {}: {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Atomically write the cache to `path`.
    pub fn save(&self, path: &Path) -> hitlist_core::Result<()> {
        persist::write_json_atomic(path, self)?;
        log::debug!("Saved {} cached entries to {}", self.len(), path.display());
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&TrackMetadata> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, metadata: TrackMetadata) {
        self.entries.insert(key.into(), metadata);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total: self.entries.len(),
            negative: self.entries.values().filter(|m| m.is_empty()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(genre: &str) -> TrackMetadata {
        TrackMetadata {
            itunes_genre: genre.to_string(),
            release_date: "2023-10-13".to_string(),
            ..TrackMetadata::default()
        }
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let cache = MetadataCache::load(&dir.path().join("itunes_cache.json"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("itunes_cache.json");
        std::fs::write(&path, "[1, 2").unwrap();
        assert!(MetadataCache::load(&path).is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("itunes_cache.json");

        let mut cache = MetadataCache::new();
        cache.insert("bad bunny — monaco", entry("Urbano latino"));
        cache.insert("nobody — nothing", TrackMetadata::default());
        cache.save(&path).unwrap();

        let loaded = MetadataCache::load(&path);
        assert_eq!(loaded, cache);
        assert_eq!(
            loaded.get("bad bunny — monaco").map(|m| m.itunes_genre.as_str()),
            Some("Urbano latino")
        );
    }

    #[test]
    fn test_file_is_a_plain_object() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("itunes_cache.json");

        let mut cache = MetadataCache::new();
        cache.insert("feid — luna", TrackMetadata::default());
        cache.save(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({
                "feid — luna": {
                    "itunes_genre": "",
                    "release_date": "",
                    "track_view_url": "",
                    "artwork": ""
                }
            })
        );
    }

    #[test]
    fn test_partial_entries_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("itunes_cache.json");
        std::fs::write(&path, r#"{"a — b": {"itunes_genre": "Pop"}}"#).unwrap();

        let cache = MetadataCache::load(&path);
        assert_eq!(cache.get("a — b").map(|m| m.itunes_genre.as_str()), Some("Pop"));
    }

    #[test]
    fn test_stats() {
        let mut cache = MetadataCache::new();
        cache.insert("a — b", entry("Pop"));
        cache.insert("c — d", TrackMetadata::default());
        cache.insert("e — f", TrackMetadata::default());

        assert_eq!(
            cache.stats(),
            CacheStats {
                total: 3,
                negative: 2
            }
        );
    }
}
