use std::path::Path;

use anyhow::{Context, Result};
use hitlist_etl::enrich::MetadataCache;

/// Show entry counts for the metadata cache.
pub fn show_cache_stats(path: &Path) -> Result<()> {
    let exists = path.exists();
    let stats = MetadataCache::load(path).stats();

    println!("\n📦 Metadata cache\n");
    println!("  File:    {}", path.display());
    println!("  Exists:  {}", if exists { "yes" } else { "no" });
    println!("  Entries: {}", stats.total);
    println!("  Matched: {}", stats.total - stats.negative);
    println!("  No match: {}", stats.negative);

    if stats.negative > 0 {
        println!("\n  No-match entries are never retried. Run `hitlist cache clear` to retry them.");
    }

    Ok(())
}

/// Delete the metadata cache file.
pub fn clear_cache(path: &Path) -> Result<()> {
    if !path.exists() {
        println!("No cache file at {}", path.display());
        return Ok(());
    }

    std::fs::remove_file(path)
        .with_context(|| format!("Failed to remove {}", path.display()))?;
    println!("✓ Removed {}", path.display());

    Ok(())
}
