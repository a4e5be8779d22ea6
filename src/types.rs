//! Core type definitions for titles, merged entries, and per-genre results.
//!
//! All enums are serialized in lowercase so config files and JSON output stay
//! consistent with the CLI surface.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Rendered in place of a rating when a source had no matching record.
pub const RATING_NOT_AVAILABLE: &str = "not available";

/// Kind of media a list is assembled for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Feature films.
    Movies,
    /// Television series.
    Series,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movies => write!(f, "movies"),
            Self::Series => write!(f, "series"),
        }
    }
}

/// A single title as returned by one source, before merging.
///
/// Scoped to one (genre, media-type, source) fetch and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    /// Display title as the source printed it.
    pub title: String,
    /// Rating string in the source's own scale (e.g. `"8.5"`, `"94%"`).
    pub rating: Option<String>,
    /// Release / premiere year, if the source exposed it.
    pub year: Option<u16>,
    /// Detail-page URL at the source, if any.
    pub link: Option<String>,
}

/// One source's complete fetch output, tagged with the source name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRecords {
    /// Source name (e.g. `"tmdb"`). Matches [`crate::providers::TitleProvider::name`].
    pub source: String,
    /// Records in the order the source listed them. Empty on fetch failure.
    pub records: Vec<RawRecord>,
}

/// One deduplicated work with ratings from every source that matched it.
///
/// The display title comes from whichever source supplied the work first in
/// priority order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedEntry {
    /// Canonical display title.
    pub title: String,
    /// Release / premiere year, back-filled from any matching source.
    pub year: Option<u16>,
    /// Detail-page URL, back-filled from any matching source.
    pub link: Option<String>,
    /// Rating strings keyed by source name. Absent key = no matching record.
    pub ratings: HashMap<String, String>,
}

impl MergedEntry {
    /// Rating for `source`, or the `"not available"` placeholder.
    pub fn rating_for(&self, source: &str) -> &str {
        self.ratings
            .get(source)
            .map(String::as_str)
            .unwrap_or(RATING_NOT_AVAILABLE)
    }
}

/// The two merged lists produced by one aggregation pass over a genre.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryResult {
    /// Top movies, at most `max_items` entries.
    pub movies: Vec<MergedEntry>,
    /// Top series, at most `max_items` entries.
    pub series: Vec<MergedEntry>,
}

impl CategoryResult {
    /// The list for one media type.
    pub fn list(&self, media_type: MediaType) -> &[MergedEntry] {
        match media_type {
            MediaType::Movies => &self.movies,
            MediaType::Series => &self.series,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_display() {
        assert_eq!(MediaType::Movies.to_string(), "movies");
        assert_eq!(MediaType::Series.to_string(), "series");
    }

    #[test]
    fn media_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&MediaType::Movies).unwrap(),
            "\"movies\""
        );
        assert_eq!(
            serde_json::from_str::<MediaType>("\"series\"").unwrap(),
            MediaType::Series
        );
    }

    #[test]
    fn rating_for_falls_back_to_placeholder() {
        let mut ratings = HashMap::new();
        ratings.insert("tmdb".to_string(), "8.5".to_string());
        let entry = MergedEntry {
            title: "Dune".to_string(),
            year: Some(2021),
            link: None,
            ratings,
        };

        assert_eq!(entry.rating_for("tmdb"), "8.5");
        assert_eq!(entry.rating_for("rotten"), RATING_NOT_AVAILABLE);
    }

    #[test]
    fn category_result_list_selects_media_type() {
        let result = CategoryResult {
            movies: vec![MergedEntry {
                title: "Arrival".to_string(),
                year: Some(2016),
                link: None,
                ratings: HashMap::new(),
            }],
            series: Vec::new(),
        };

        assert_eq!(result.list(MediaType::Movies).len(), 1);
        assert!(result.list(MediaType::Series).is_empty());
    }
}
