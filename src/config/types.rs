use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::aggregate::MatchMode;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub sources: SourcesConfig,

    #[serde(default)]
    pub tmdb: TmdbConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub merge: MergeConfig,

    #[serde(default)]
    pub filters: FilterConfig,

    #[serde(default = "default_genres")]
    pub genres: Vec<GenreConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: SourcesConfig::default(),
            tmdb: TmdbConfig::default(),
            cache: CacheConfig::default(),
            merge: MergeConfig::default(),
            filters: FilterConfig::default(),
            genres: default_genres(),
        }
    }
}

impl Config {
    /// Look up a configured genre by label, case-insensitively.
    pub fn genre(&self, label: &str) -> Option<&GenreConfig> {
        self.genres
            .iter()
            .find(|g| g.label.eq_ignore_ascii_case(label))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourcesConfig {
    /// Priority order for merging; the first source is the most authoritative
    /// and supplies display titles. An editorial choice, not a computed rank.
    #[serde(default = "default_source_order")]
    pub order: Vec<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            order: default_source_order(),
        }
    }
}

fn default_source_order() -> Vec<String> {
    vec![
        "tmdb".to_string(),
        "imdb".to_string(),
        "rotten".to_string(),
    ]
}

/// Source names the registry knows how to build.
pub const KNOWN_SOURCES: &[&str] = &["tmdb", "imdb", "rotten"];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// TMDB v3 API key. The source is skipped when empty.
    #[serde(default)]
    pub api_key: String,

    /// ISO-639-1 language tag for titles (default: en-US).
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            language: default_language(),
        }
    }
}

fn default_language() -> String {
    "en-US".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Snapshot file location.
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,

    /// Snapshot lifetime in hours (default: 12).
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
            ttl_hours: default_ttl_hours(),
        }
    }
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("./marquee-cache.json")
}

fn default_ttl_hours() -> u64 {
    12
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MergeConfig {
    /// Maximum entries per list (default: 10).
    #[serde(default = "default_max_items")]
    pub max_items: usize,

    /// Same-work predicate for dedup (default: substring).
    #[serde(default)]
    pub match_mode: MatchMode,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            max_items: default_max_items(),
            match_mode: MatchMode::default(),
        }
    }
}

fn default_max_items() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilterConfig {
    /// Oldest release year to include (default: 2015). Absent disables the
    /// recency filter.
    #[serde(default = "default_min_year")]
    pub min_year: Option<u16>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_year: default_min_year(),
        }
    }
}

fn default_min_year() -> Option<u16> {
    Some(2015)
}

/// One selectable genre with its per-source keys.
///
/// A source with no key for a genre simply contributes nothing for it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenreConfig {
    /// Display label the user picks (e.g. "Murder Mystery").
    pub label: String,

    /// TMDB numeric genre id.
    #[serde(default)]
    pub tmdb_id: Option<u64>,

    /// IMDb search genre key (e.g. "sci-fi").
    #[serde(default)]
    pub imdb: Option<String>,

    /// Rotten Tomatoes browse genre key (e.g. "mystery_and_thriller").
    #[serde(default)]
    pub rotten: Option<String>,
}

fn default_genres() -> Vec<GenreConfig> {
    fn genre(label: &str, tmdb_id: u64, imdb: &str, rotten: &str) -> GenreConfig {
        GenreConfig {
            label: label.to_string(),
            tmdb_id: Some(tmdb_id),
            imdb: Some(imdb.to_string()),
            rotten: Some(rotten.to_string()),
        }
    }

    vec![
        genre("Thriller", 53, "thriller", "mystery_and_thriller"),
        genre("Medical Dramas", 18, "drama", "drama"),
        genre("Comedy", 35, "comedy", "comedy"),
        genre("Murder Mystery", 9648, "mystery", "mystery_and_thriller"),
        genre("Sci-Fi", 878, "sci-fi", "sci_fi"),
    ]
}
