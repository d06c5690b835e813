use std::path::PathBuf;

use anyhow::{Context, Result};
use hitlist_etl::{build_pipeline, Config, RunOptions};

/// Command-line overrides for a run.
#[derive(Debug, Default)]
pub struct RunOverrides {
    pub sources: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub cache: Option<PathBuf>,
    pub no_enrich: bool,
    pub concurrency: Option<usize>,
}

impl RunOverrides {
    fn apply(self, config: &Config) -> RunOptions {
        let mut options = RunOptions::from_config(config);
        if let Some(sources) = self.sources {
            options.sources_path = sources;
        }
        if let Some(output) = self.output {
            options.output_path = output;
        }
        if let Some(cache) = self.cache {
            options.cache_path = cache;
        }
        if let Some(concurrency) = self.concurrency {
            options.concurrency = concurrency;
        }
        if self.no_enrich {
            options.enrich = false;
        }
        options
    }
}

/// Build one chart snapshot.
pub async fn run_snapshot(config: &Config, overrides: RunOverrides) -> Result<()> {
    let options = overrides.apply(config);
    log::debug!("Run options: {:?}", options);
    let pipeline = build_pipeline(config, options).context("Failed to set up pipeline")?;

    println!("\n🎵 Building chart snapshot\n");
    println!("  Sources: {}", pipeline.options().sources_path.display());

    let snapshot = pipeline.run().await?;

    println!("\n✓ Snapshot written");
    println!("  Output:        {}", pipeline.options().output_path.display());
    println!("  Sources:       {}", snapshot.sources_count);
    println!("  Raw rows:      {}", snapshot.raw_count);
    println!("  Unique tracks: {}", snapshot.count);
    println!("  iTunes used:   {}", snapshot.itunes_used);
    println!("  Errors:        {}", snapshot.errors.len());

    if !snapshot.errors.is_empty() {
        log::warn!(
            "Snapshot written with {} failed sources or lookups",
            snapshot.errors.len()
        );
    }

    for error in &snapshot.errors {
        match (&error.track, &error.detail) {
            (Some(track), Some(detail)) => {
                println!("    - {} [{:?}] {}: {}", error.source, error.error, track, detail);
            }
            (None, Some(detail)) => {
                println!("    - {} [{:?}]: {}", error.source, error.error, detail);
            }
            _ => println!("    - {} [{:?}]", error.source, error.error),
        }
    }

    Ok(())
}
