//! One snapshot run: scrape, aggregate, enrich, write.

use std::path::PathBuf;
use std::time::Duration;

use hitlist_core::aggregate;
use hitlist_core::model::OutputSnapshot;
use hitlist_core::persist;

use crate::config::Config;
use crate::enrich::{EnrichScheduler, ItunesClient, MetadataCache, TrackLookup};
use crate::error::PipelineError;
use crate::scrape::{scrape_all, ChartFetcher, KworbFetcher};
use crate::sources::load_sources;

/// Paths and switches for a run, usually taken from [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub sources_path: PathBuf,
    pub output_path: PathBuf,
    pub cache_path: PathBuf,
    pub concurrency: usize,
    pub enrich: bool,
}

impl RunOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            sources_path: config.sources_path.clone(),
            output_path: config.output_path.clone(),
            cache_path: config.itunes_cache_path.clone(),
            concurrency: config.concurrency,
            enrich: config.enrich,
        }
    }
}

/// The snapshot pipeline over a chart fetcher and a metadata lookup.
#[derive(Debug)]
pub struct Pipeline<F, L> {
    fetcher: F,
    scheduler: EnrichScheduler<L>,
    options: RunOptions,
}

impl<F: ChartFetcher, L: TrackLookup> Pipeline<F, L> {
    pub fn new(fetcher: F, lookup: L, options: RunOptions) -> Self {
        let scheduler = EnrichScheduler::new(lookup, options.concurrency);
        Self {
            fetcher,
            scheduler,
            options,
        }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Run once and write the snapshot.
    ///
    /// Per-source and per-track failures end up in the snapshot's error
    /// list, and a cache that cannot be saved is only logged. An unreadable
    /// source list or a failed snapshot write aborts the run.
    pub async fn run(&self) -> Result<OutputSnapshot, PipelineError> {
        let opts = &self.options;

        let sources = load_sources(&opts.sources_path).map_err(|source| PipelineError::Sources {
            path: opts.sources_path.clone(),
            source,
        })?;
        log::info!("Scraping {} sources", sources.len());

        let (raw, mut errors) = scrape_all(&self.fetcher, &sources).await;
        let mut items = aggregate(&raw);
        log::info!("{} raw rows, {} unique tracks", raw.len(), items.len());

        let itunes_used = if opts.enrich {
            let mut cache = MetadataCache::load(&opts.cache_path);
            let fresh = self
                .scheduler
                .enrich(&mut items, &mut cache, &mut errors)
                .await;
            if let Err(e) = cache.save(&opts.cache_path) {
                log::warn!(
                    "Could not save lookup cache to {}: {}",
                    opts.cache_path.display(),
                    e
                );
            }
            fresh
        } else {
            log::info!("Skipping metadata enrichment");
            0
        };

        let snapshot =
            OutputSnapshot::assemble(raw.len(), sources.len(), items, itunes_used, errors);

        persist::write_json_atomic(&opts.output_path, &snapshot).map_err(|source| {
            PipelineError::Output {
                path: opts.output_path.clone(),
                source,
            }
        })?;

        log::info!(
            "Saved {} (raw: {}, count: {}, errors: {})",
            opts.output_path.display(),
            snapshot.raw_count,
            snapshot.count,
            snapshot.errors.len()
        );

        Ok(snapshot)
    }
}

/// Build the production pipeline: kworb pages and the iTunes Search API.
///
/// # Errors
/// Returns an error if an HTTP client cannot be created.
pub fn build_pipeline(
    config: &Config,
    options: RunOptions,
) -> Result<Pipeline<KworbFetcher, ItunesClient>, PipelineError> {
    let timeout = Duration::from_secs(config.http_timeout_secs);
    let fetcher = KworbFetcher::new(timeout, config.max_rows_per_source, config.fetch_retries)?;
    let lookup = ItunesClient::new(&config.itunes_base_url, timeout)?;
    Ok(Pipeline::new(fetcher, lookup, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_options_from_config() {
        let config = Config::default();
        let options = RunOptions::from_config(&config);
        assert_eq!(options.sources_path, PathBuf::from("sources.json"));
        assert_eq!(options.cache_path, PathBuf::from("itunes_cache.json"));
        assert_eq!(options.concurrency, 6);
        assert!(options.enrich);
    }

    #[test]
    fn test_build_pipeline() {
        let config = Config::default();
        let pipeline = build_pipeline(&config, RunOptions::from_config(&config)).unwrap();
        assert_eq!(pipeline.options().output_path, PathBuf::from("cache.json"));
    }
}
