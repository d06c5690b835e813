use anyhow::{Context, Result};
use hitlist_etl::{config, Config};

/// Top-level keys that `config get` and `config set` understand.
const KEYS: [&str; 9] = [
    "sources_path",
    "output_path",
    "itunes_cache_path",
    "itunes_base_url",
    "concurrency",
    "max_rows_per_source",
    "http_timeout_secs",
    "fetch_retries",
    "enrich",
];

/// Keys written as bare TOML values rather than strings.
const UNQUOTED_KEYS: [&str; 5] = [
    "concurrency",
    "max_rows_per_source",
    "http_timeout_secs",
    "fetch_retries",
    "enrich",
];

/// Show the current effective configuration.
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    println!("Settings:");
    for key in KEYS {
        println!("  {}: {}", key, value_of(&config, key)?);
    }
    println!("  logging.level: {:?}", config.logging.level());
    println!("  logging.coloured: {}", config.logging.coloured());
    println!("  logging.output: {:?}", config.logging.output());

    println!("\nPriority: CLI args > ENV vars (HITLIST_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value, or print the config file when no key is given.
pub fn get_config(key: Option<String>) -> Result<()> {
    if let Some(key) = key {
        let config = Config::load()?;
        println!("{}", value_of(&config, &key)?);
    } else {
        let config_path = config::config_file_path();

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'hitlist config init' to create it.");
        }
    }

    Ok(())
}

/// Set a config value in the config file, creating the file if needed.
pub fn set_config(key: String, value: String) -> Result<()> {
    if !KEYS.contains(&key.as_str()) {
        anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, KEYS.join(", "));
    }

    let config_path = config::config_file_path();
    config::ensure_config_file()?;

    let contents = std::fs::read_to_string(&config_path).context("Failed to read config file")?;
    let updated = set_line(&contents, &key, &toml_value(&key, &value));

    std::fs::write(&config_path, updated).context("Failed to write config file")?;

    // Catch values the loader would reject, e.g. `concurrency = lots`.
    Config::load().with_context(|| format!("{} = {} is not a valid setting", key, value))?;

    println!("✓ Updated {} = {}", key, value);
    println!("  in {}", config_path.display());

    Ok(())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    println!("{}", config::config_file_path().display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure hitlist.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}

fn value_of(config: &Config, key: &str) -> Result<String> {
    let value = match key {
        "sources_path" => config.sources_path.display().to_string(),
        "output_path" => config.output_path.display().to_string(),
        "itunes_cache_path" => config.itunes_cache_path.display().to_string(),
        "itunes_base_url" => config.itunes_base_url.clone(),
        "concurrency" => config.concurrency.to_string(),
        "max_rows_per_source" => config.max_rows_per_source.to_string(),
        "http_timeout_secs" => config.http_timeout_secs.to_string(),
        "fetch_retries" => config.fetch_retries.to_string(),
        "enrich" => config.enrich.to_string(),
        _ => anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, KEYS.join(", ")),
    };
    Ok(value)
}

fn toml_value(key: &str, value: &str) -> String {
    if UNQUOTED_KEYS.contains(&key) {
        value.to_string()
    } else {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

/// Replace the active `key = ...` line, else uncomment the example line,
/// else append before the first table header.
fn set_line(contents: &str, key: &str, value: &str) -> String {
    let line = format!("{key} = {value}");
    let mut lines: Vec<String> = contents.lines().map(str::to_string).collect();

    let is_key_line = |l: &str, commented: bool| {
        let l = l.trim();
        let l = if commented {
            match l.strip_prefix('#') {
                Some(rest) => rest.trim_start(),
                None => return false,
            }
        } else {
            l
        };
        l.strip_prefix(key)
            .is_some_and(|rest| rest.trim_start().starts_with('='))
    };

    if let Some(i) = lines.iter().position(|l| is_key_line(l.as_str(), false)) {
        lines[i] = line;
    } else if let Some(i) = lines.iter().position(|l| is_key_line(l.as_str(), true)) {
        lines[i] = line;
    } else {
        let table = lines
            .iter()
            .position(|l| {
                let l = l.trim().trim_start_matches('#');
                l.starts_with('[')
            })
            .unwrap_or(lines.len());
        lines.insert(table, line);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
