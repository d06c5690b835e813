use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Deserializer, Serialize};

use crate::enrich::itunes::ITUNES_SEARCH_URL;
use crate::enrich::scheduler::DEFAULT_CONCURRENCY;

/// Configuration for hitlist.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (HITLIST_* prefix)
/// 3. Config file (~/.config/hitlist/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JSON array of chart sources to scrape.
    ///
    /// Can be set via:
    /// - CLI: --sources /path/to/sources.json
    /// - ENV: HITLIST_SOURCES_PATH
    /// - Config: sources_path = "..."
    #[serde(default = "default_sources_path")]
    pub sources_path: PathBuf,

    /// Where the snapshot document is written.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Where looked-up track metadata is cached between runs.
    #[serde(default = "default_itunes_cache_path")]
    pub itunes_cache_path: PathBuf,

    /// iTunes Search endpoint.
    #[serde(default = "default_itunes_base_url")]
    pub itunes_base_url: String,

    /// Number of concurrent metadata lookups.
    #[serde(default = "default_concurrency", deserialize_with = "lenient")]
    pub concurrency: usize,

    /// Rows kept per chart page.
    #[serde(default = "default_max_rows", deserialize_with = "lenient")]
    pub max_rows_per_source: usize,

    /// Timeout applied to every HTTP request.
    #[serde(default = "default_http_timeout_secs", deserialize_with = "lenient")]
    pub http_timeout_secs: u64,

    /// Retries for chart page fetches that fail transiently.
    #[serde(default = "default_fetch_retries", deserialize_with = "lenient")]
    pub fetch_retries: usize,

    /// Whether to look up track metadata at all.
    #[serde(default = "default_enrich", deserialize_with = "lenient")]
    pub enrich: bool,

    /// Logger options (see `twyg::Opts`).
    #[serde(default = "default_logging")]
    pub logging: twyg::Opts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources_path: default_sources_path(),
            output_path: default_output_path(),
            itunes_cache_path: default_itunes_cache_path(),
            itunes_base_url: default_itunes_base_url(),
            concurrency: default_concurrency(),
            max_rows_per_source: default_max_rows(),
            http_timeout_secs: default_http_timeout_secs(),
            fetch_retries: default_fetch_retries(),
            enrich: default_enrich(),
            logging: default_logging(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/hitlist/config.toml
    /// Reads environment variables with HITLIST_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("hitlist");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?;

        Ok(config)
    }
}

/// Accept either a native TOML value or its string form.
///
/// Environment variables always arrive as strings, so `HITLIST_CONCURRENCY=8`
/// has to parse into a number.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: fmt::Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient<T> {
        Native(T),
        Text(String),
    }

    match Lenient::<T>::deserialize(deserializer)? {
        Lenient::Native(value) => Ok(value),
        Lenient::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn default_sources_path() -> PathBuf {
    PathBuf::from("sources.json")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("cache.json")
}

fn default_itunes_cache_path() -> PathBuf {
    PathBuf::from("itunes_cache.json")
}

fn default_itunes_base_url() -> String {
    ITUNES_SEARCH_URL.to_string()
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_max_rows() -> usize {
    200
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_fetch_retries() -> usize {
    2
}

fn default_enrich() -> bool {
    true
}

/// Info and above on stderr, so stdout stays clean for reports.
fn default_logging() -> twyg::Opts {
    twyg::OptsBuilder::new()
        .coloured(false)
        .output(twyg::Output::Stderr)
        .level(twyg::LogLevel::Info)
        .build()
        .unwrap_or_default()
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/hitlist/config.toml
/// - macOS: ~/Library/Application Support/hitlist/config.toml
/// - Windows: %APPDATA%\hitlist\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hitlist")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Hitlist Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (HITLIST_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# JSON array of chart pages: [{"url": "...", "name": "...", "region": "...", "bucket": "..."}]
# Also: --sources, HITLIST_SOURCES_PATH
#sources_path = "sources.json"

# Snapshot document written at the end of every run
# Also: --output, HITLIST_OUTPUT_PATH
#output_path = "cache.json"

# Track metadata cache, kept between runs
# Also: --cache, HITLIST_ITUNES_CACHE_PATH
#itunes_cache_path = "itunes_cache.json"

# Number of concurrent metadata lookups
#concurrency = 6

# Rows kept per chart page
#max_rows_per_source = 200

# Timeout for every HTTP request, in seconds
#http_timeout_secs = 30

# Retries for chart pages that fail with 429, 5xx or a network error
#fetch_retries = 2

# Set to false to skip metadata lookups (same as --no-enrich)
#enrich = true

# Logging (all four keys are required when this section is present)
#[logging]
#coloured = false
#output = "stderr"
#level = "info"
#report_caller = false
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
