//! Rotten Tomatoes title provider.
//!
//! Implements [`TitleProvider`] by scraping the Rotten Tomatoes browse grid
//! for a genre, reporting the critic score as a percentage string. Like the
//! IMDb provider this is selector-based extraction against markup that shifts
//! between site generations, so each field carries a fallback selector list.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::config::GenreConfig;
use crate::error::{Error, Result};
use crate::providers::provider::TitleProvider;
use crate::types::{MediaType, RawRecord};

const RT_BASE_URL: &str = "https://www.rottentomatoes.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const ITEM_SELECTORS: &[&str] = &[
    r#"[data-qa="discovery-media-list-item"]"#,
    "div.mb-movie",
];
const TITLE_SELECTORS: &[&str] = &[
    r#"span[data-qa="discovery-media-list-item-title"]"#,
    ".movieTitle",
];
const SCORE_SELECTORS: &[&str] = &[
    r#"rt-text[slot="criticsScore"]"#,
    "score-pairs-deprecated rt-text",
    ".tMeterScore",
];
const LINK_SELECTORS: &[&str] = &[
    r#"a[data-qa="discovery-media-list-item-caption"]"#,
    "a",
];

/// Rotten Tomatoes title provider. Always available; needs no credentials.
pub struct RottenProvider {
    client: reqwest::Client,
}

impl RottenProvider {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build reqwest client");

        Self { client }
    }

    fn browse_url(&self, genre_key: &str, media_type: MediaType) -> String {
        let section = match media_type {
            MediaType::Movies => "movies_at_home",
            MediaType::Series => "tv_series_browse",
        };
        format!("{RT_BASE_URL}/browse/{section}/genres:{genre_key}~sort:popular")
    }
}

impl Default for RottenProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TitleProvider for RottenProvider {
    fn name(&self) -> &'static str {
        "rotten"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn top_titles(
        &self,
        genre: &GenreConfig,
        media_type: MediaType,
    ) -> Result<Vec<RawRecord>> {
        let Some(genre_key) = genre.rotten.as_deref() else {
            debug!(genre = %genre.label, "no Rotten Tomatoes genre key configured, contributing nothing");
            return Ok(Vec::new());
        };

        let url = self.browse_url(genre_key, media_type);
        debug!(url = %url, "Rotten Tomatoes browse");

        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| Error::provider("rotten", format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::provider(
                "rotten",
                format!("HTTP {} for {url}", resp.status()),
            ));
        }

        let html = resp
            .text()
            .await
            .map_err(|e| Error::provider("rotten", format!("body read failed: {e}")))?;

        Ok(parse_titles(&html))
    }
}

/// Extract title records from a Rotten Tomatoes browse page.
///
/// Total over arbitrary markup: unrecognized pages yield an empty list.
fn parse_titles(html: &str) -> Vec<RawRecord> {
    let document = Html::parse_document(html);

    let mut records = Vec::new();
    for item_selector in ITEM_SELECTORS {
        let Ok(selector) = Selector::parse(item_selector) else {
            continue;
        };
        for item in document.select(&selector) {
            let Some(title) = first_text(&item, TITLE_SELECTORS) else {
                continue;
            };
            if title.is_empty() {
                continue;
            }
            records.push(RawRecord {
                rating: first_text(&item, SCORE_SELECTORS).map(|s| as_percent(&s)),
                year: None,
                link: first_href(&item, LINK_SELECTORS),
                title,
            });
        }
        if !records.is_empty() {
            break;
        }
    }
    records
}

/// First non-empty text content under `element` for any selector generation.
fn first_text(element: &ElementRef, selectors: &[&str]) -> Option<String> {
    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(found) = element.select(&selector).next() {
                let text: String = found.text().collect::<String>().trim().to_string();
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
    }
    None
}

/// First title-page href under `element`, made absolute.
fn first_href(element: &ElementRef, selectors: &[&str]) -> Option<String> {
    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            for found in element.select(&selector) {
                if let Some(href) = found.value().attr("href") {
                    if href.starts_with("/m/") || href.starts_with("/tv/") {
                        return Some(format!("{RT_BASE_URL}{href}"));
                    }
                    if href.starts_with(RT_BASE_URL) {
                        return Some(href.to_string());
                    }
                }
            }
        }
    }
    None
}

/// Normalize a score blurb to an "NN%" rating string.
fn as_percent(score: &str) -> String {
    let trimmed = score.trim();
    if trimmed.ends_with('%') {
        trimmed.to_string()
    } else {
        format!("{trimmed}%")
    }
}
