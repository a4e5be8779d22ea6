//! IMDb title provider.
//!
//! Implements [`TitleProvider`] by scraping the IMDb advanced title search
//! page, sorted by user rating with a vote floor. There is no public API for
//! this surface, so extraction is selector-based and tied to IMDb's markup;
//! selectors are tried newest page generation first with older fallbacks,
//! since the structure shifts between redesigns.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::config::GenreConfig;
use crate::error::{Error, Result};
use crate::providers::provider::TitleProvider;
use crate::types::{MediaType, RawRecord};

const IMDB_BASE_URL: &str = "https://www.imdb.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Vote floor passed to the search URL, mirroring the rating sort's intent.
const MIN_VOTES: u32 = 25_000;
/// Sites behind bot protection reject the default reqwest UA outright.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Selector generations for one field, newest first.
///
/// The first generation that yields anything wins; mixing generations within
/// one page never happens in practice.
const ITEM_SELECTORS: &[&str] = &["li.ipc-metadata-list-summary-item", "div.lister-item"];
const TITLE_SELECTORS: &[&str] = &["h3.ipc-title__text", "h3.lister-item-header a"];
const RATING_SELECTORS: &[&str] = &[
    "span.ipc-rating-star--rating",
    "div.ratings-bar strong",
];
const YEAR_SELECTORS: &[&str] = &[
    "span.dli-title-metadata-item",
    "span.lister-item-year",
];
const LINK_SELECTORS: &[&str] = &["a.ipc-title-link-wrapper", "h3.lister-item-header a"];

/// IMDb title provider. Always available; needs no credentials.
pub struct ImdbProvider {
    client: reqwest::Client,
    min_year: Option<u16>,
}

impl ImdbProvider {
    /// Create a new IMDb provider with the given recency floor.
    pub fn new(min_year: Option<u16>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build reqwest client");

        Self { client, min_year }
    }

    fn search_url(&self, genre_key: &str, media_type: MediaType) -> String {
        let title_type = match media_type {
            MediaType::Movies => "feature",
            MediaType::Series => "tv_series",
        };
        let mut url = format!(
            "{IMDB_BASE_URL}/search/title/?title_type={title_type}&genres={genre_key}\
             &sort=user_rating,desc&num_votes={MIN_VOTES},"
        );
        if let Some(year) = self.min_year {
            url.push_str(&format!("&release_date={year}-01-01,"));
        }
        url
    }
}

#[async_trait]
impl TitleProvider for ImdbProvider {
    fn name(&self) -> &'static str {
        "imdb"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn top_titles(
        &self,
        genre: &GenreConfig,
        media_type: MediaType,
    ) -> Result<Vec<RawRecord>> {
        let Some(genre_key) = genre.imdb.as_deref() else {
            debug!(genre = %genre.label, "no IMDb genre key configured, contributing nothing");
            return Ok(Vec::new());
        };

        let url = self.search_url(genre_key, media_type);
        debug!(url = %url, "IMDb title search");

        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| Error::provider("imdb", format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::provider(
                "imdb",
                format!("HTTP {} for {url}", resp.status()),
            ));
        }

        let html = resp
            .text()
            .await
            .map_err(|e| Error::provider("imdb", format!("body read failed: {e}")))?;

        Ok(parse_titles(&html))
    }
}

/// Extract title records from an IMDb search results page.
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
            let Some(title) = first_text(&item, TITLE_SELECTORS).map(|t| strip_rank(&t)) else {
                continue;
            };
            if title.is_empty() {
                continue;
            }
            records.push(RawRecord {
                rating: first_text(&item, RATING_SELECTORS)
                    .and_then(|t| t.split_whitespace().next().map(str::to_string)),
                year: first_text(&item, YEAR_SELECTORS).as_deref().and_then(parse_year),
                link: first_href(&item, LINK_SELECTORS),
                title,
            });
        }
        // One page renders one generation of markup.
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

/// First href under `element` for any selector generation, made absolute and
/// stripped of tracking query parameters.
fn first_href(element: &ElementRef, selectors: &[&str]) -> Option<String> {
    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(found) = element.select(&selector).next() {
                if let Some(href) = found.value().attr("href") {
                    let path = href.split('?').next().unwrap_or(href);
                    if path.starts_with("http") {
                        return Some(path.to_string());
                    }
                    return Some(format!("{IMDB_BASE_URL}{path}"));
                }
            }
        }
    }
    None
}

/// Drop the list-position prefix IMDb renders into titles ("1. The Batman").
fn strip_rank(title: &str) -> String {
    static RANK: OnceLock<Regex> = OnceLock::new();
    let rank = RANK.get_or_init(|| Regex::new(r"^\s*\d+\.\s*").expect("static regex"));
    rank.replace(title, "").trim().to_string()
}

/// First four-digit run in a metadata blurb ("2021", "2019–2022", "(2016)").
fn parse_year(text: &str) -> Option<u16> {
    static YEAR: OnceLock<Regex> = OnceLock::new();
    let year = YEAR.get_or_init(|| Regex::new(r"\d{4}").expect("static regex"));
    year.find(text).and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT_MARKUP: &str = r#"
        <ul>
          <li class="ipc-metadata-list-summary-item">
            <a class="ipc-title-link-wrapper" href="/title/tt1160419/?ref_=sr_t_1">
              <h3 class="ipc-title__text">1. Dune: Part One</h3>
            </a>
            <span class="dli-title-metadata-item">2021</span>
            <span class="ipc-rating-star--rating">8.0</span>
          </li>
          <li class="ipc-metadata-list-summary-item">
            <a class="ipc-title-link-wrapper" href="/title/tt15239678/">
              <h3 class="ipc-title__text">2. Dune: Part Two</h3>
            </a>
            <span class="dli-title-metadata-item">2024</span>
          </li>
        </ul>
    "#;

    const LEGACY_MARKUP: &str = r#"
        <div class="lister-item">
          <h3 class="lister-item-header">
            <a href="/title/tt2802850/">Fargo</a>
            <span class="lister-item-year">(2014-2024)</span>
          </h3>
          <div class="ratings-bar"><strong>8.9</strong></div>
        </div>
    "#;

    #[test]
    fn parses_current_markup() {
        let records = parse_titles(CURRENT_MARKUP);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].title, "Dune: Part One");
        assert_eq!(records[0].rating.as_deref(), Some("8.0"));
        assert_eq!(records[0].year, Some(2021));
        assert_eq!(
            records[0].link.as_deref(),
            Some("https://www.imdb.com/title/tt1160419/")
        );

        // Missing rating stays absent rather than becoming a blank string.
        assert_eq!(records[1].title, "Dune: Part Two");
        assert!(records[1].rating.is_none());
    }

    #[test]
    fn parses_legacy_markup_via_fallback_selectors() {
        let records = parse_titles(LEGACY_MARKUP);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Fargo");
        assert_eq!(records[0].rating.as_deref(), Some("8.9"));
        assert_eq!(records[0].year, Some(2014));
    }

    #[test]
    fn unrecognized_markup_yields_empty_list() {
        assert!(parse_titles("<html><body><p>captcha</p></body></html>").is_empty());
        assert!(parse_titles("").is_empty());
    }

    #[test]
    fn rank_prefix_stripping() {
        assert_eq!(strip_rank("1. The Batman"), "The Batman");
        assert_eq!(strip_rank("10. Heat"), "Heat");
        assert_eq!(strip_rank("No Rank"), "No Rank");
        // Only a leading "N." is a rank; interior numbers stay.
        assert_eq!(strip_rank("2. Apollo 13"), "Apollo 13");
    }

    #[test]
    fn year_extraction_from_blurbs() {
        assert_eq!(parse_year("2021"), Some(2021));
        assert_eq!(parse_year("2019–2022"), Some(2019));
        assert_eq!(parse_year("(2016)"), Some(2016));
        assert_eq!(parse_year("eps"), None);
    }

    #[test]
    fn search_url_shape() {
        let provider = ImdbProvider::new(Some(2015));
        let url = provider.search_url("thriller", MediaType::Movies);
        assert!(url.contains("title_type=feature"));
        assert!(url.contains("genres=thriller"));
        assert!(url.contains("sort=user_rating,desc"));
        assert!(url.contains("release_date=2015-01-01,"));

        let url = provider.search_url("drama", MediaType::Series);
        assert!(url.contains("title_type=tv_series"));

        let no_floor = ImdbProvider::new(None);
        assert!(!no_floor
            .search_url("thriller", MediaType::Movies)
            .contains("release_date"));
    }
}
