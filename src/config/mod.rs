mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./marquee.toml",
        "~/.config/marquee/config.toml",
        "/etc/marquee/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.cache.ttl_hours == 0 {
        anyhow::bail!("Cache TTL cannot be 0 hours");
    }

    if config.merge.max_items == 0 {
        anyhow::bail!("merge.max_items cannot be 0");
    }

    for source in &config.sources.order {
        if !KNOWN_SOURCES.contains(&source.as_str()) {
            anyhow::bail!(
                "Unknown source '{}' in sources.order (known: {})",
                source,
                KNOWN_SOURCES.join(", ")
            );
        }
    }

    for (i, genre) in config.genres.iter().enumerate() {
        if genre.label.trim().is_empty() {
            anyhow::bail!("Genre #{} has an empty label", i + 1);
        }
        if config
            .genres
            .iter()
            .filter(|g| g.label.eq_ignore_ascii_case(&genre.label))
            .count()
            > 1
        {
            anyhow::bail!("Duplicate genre label: '{}'", genre.label);
        }
        if genre.tmdb_id.is_none() && genre.imdb.is_none() && genre.rotten.is_none() {
            tracing::warn!(
                genre = %genre.label,
                "Genre has no source keys; it will always produce empty lists"
            );
        }
    }

    if config.tmdb.api_key.is_empty() && config.sources.order.iter().any(|s| s == "tmdb") {
        tracing::warn!("No TMDB API key configured; the tmdb source will be skipped");
    }

    Ok(())
}
