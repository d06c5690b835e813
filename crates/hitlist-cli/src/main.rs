use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use hitlist_etl::Config;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "hitlist", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Scrape the configured charts and write a snapshot
    ///
    /// Runs one full pass over the sources file:
    ///
    /// - Fetches every chart page in order and extracts up to
    ///   `max_rows_per_source` rows from each
    /// - Merges rows naming the same track across charts, keeping every
    ///   chart position as evidence
    /// - Scores each track by its best position and sorts by score
    /// - Fills in genre, release date and artwork from the iTunes Search
    ///   API, reusing the lookup cache
    /// - Writes the snapshot document atomically
    ///
    /// Pages that fail or yield no rows, and lookups that fail, are listed
    /// in the snapshot's `errors` and do not stop the run. A missing or
    /// malformed sources file does.
    Run {
        /// Sources file (JSON array of chart pages)
        #[arg(long)]
        sources: Option<PathBuf>,

        /// Where to write the snapshot
        #[arg(long)]
        output: Option<PathBuf>,

        /// Lookup cache file
        #[arg(long)]
        cache: Option<PathBuf>,

        /// Skip metadata lookups
        #[arg(long)]
        no_enrich: bool,

        /// Concurrent metadata lookups
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Inspect or reset the metadata lookup cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,

        /// Lookup cache file (default: from config)
        #[arg(long, global = true)]
        cache: Option<PathBuf>,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print one value, or the whole config file
    Get {
        /// Config key (e.g. concurrency)
        key: Option<String>,
    },
    /// Set a value in the config file
    Set {
        key: String,
        value: String,
    },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file if it doesn't exist
    Init,
}

#[derive(Debug, clap::Subcommand)]
enum CacheAction {
    /// Show entry counts
    Stats,
    /// Delete the cache file so every track is looked up again
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;

    if let Err(e) = twyg::setup(config.logging.clone()) {
        eprintln!("Could not set up logging: {}", e);
    }

    match cli.command {
        Commands::Run {
            sources,
            output,
            cache,
            no_enrich,
            concurrency,
        } => {
            let overrides = commands::RunOverrides {
                sources,
                output,
                cache,
                no_enrich,
                concurrency,
            };
            commands::run_snapshot(&config, overrides).await?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config()?,
            ConfigAction::Get { key } => commands::config::get_config(key)?,
            ConfigAction::Set { key, value } => commands::config::set_config(key, value)?,
            ConfigAction::Path => commands::config::show_path()?,
            ConfigAction::Example => commands::config::show_example()?,
            ConfigAction::Init => commands::config::init_config()?,
        },
        Commands::Cache { action, cache } => {
            let path = cache.unwrap_or_else(|| config.itunes_cache_path.clone());
            match action {
                CacheAction::Stats => commands::show_cache_stats(&path)?,
                CacheAction::Clear => commands::clear_cache(&path)?,
            }
        }
    }

    Ok(())
}
