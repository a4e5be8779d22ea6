//! TMDB (The Movie Database) title provider.
//!
//! Implements [`TitleProvider`] by querying the TMDB v3 `/discover` endpoints,
//! sorted by vote average with a vote-count floor so short-tail entries with a
//! handful of perfect votes don't crowd out the list.
//!
//! Features:
//! - Token-bucket rate limiting at 4 requests / second via [`governor`].
//! - Automatic retry on HTTP 429 with `Retry-After` header support (max 3 retries).
//! - 30-second request timeout.

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::GenreConfig;
use crate::error::{Error, Result};
use crate::providers::provider::TitleProvider;
use crate::types::{MediaType, RawRecord};

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const TMDB_TITLE_BASE: &str = "https://www.themoviedb.org";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RETRIES: u32 = 3;
/// Vote-count floor for /discover results.
const MIN_VOTE_COUNT: u32 = 200;

// ---------------------------------------------------------------------------
// TMDB API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct DiscoverResponse<T> {
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct DiscoverMovie {
    id: u64,
    title: Option<String>,
    release_date: Option<String>,
    vote_average: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DiscoverTv {
    id: u64,
    name: Option<String>,
    first_air_date: Option<String>,
    vote_average: Option<f64>,
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

/// TMDB title provider.
///
/// Wraps the TMDB v3 `/discover` API with built-in rate limiting and retry
/// logic. Unavailable until configured with an API key.
pub struct TmdbProvider {
    client: reqwest::Client,
    api_key: String,
    language: String,
    base_url: String,
    min_year: Option<u16>,
    rate_limiter: governor::RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl TmdbProvider {
    /// Create a new TMDB provider.
    ///
    /// `language` is an ISO-639-1 tag such as `"en-US"`; `min_year` is the
    /// recency floor applied to release / first-air dates. Rate limiting is
    /// configured at 4 requests per second.
    pub fn new(api_key: String, language: String, min_year: Option<u16>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build reqwest client");

        let quota = Quota::per_second(NonZeroU32::new(4).unwrap());
        let rate_limiter = RateLimiter::direct(quota);

        Self {
            client,
            api_key,
            language,
            base_url: TMDB_BASE_URL.to_string(),
            min_year,
            rate_limiter,
        }
    }

    /// Point the provider at a different API root. Used by tests to target a
    /// mock server.
    #[cfg(test)]
    fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    /// Execute a GET request with rate limiting and 429-retry logic.
    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let mut retries = 0u32;
        loop {
            self.rate_limiter.until_ready().await;

            let resp = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| Error::provider("tmdb", format!("request failed: {e}")))?;

            if resp.status() == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RETRIES {
                retries += 1;
                let wait = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                warn!(
                    retry = retries,
                    wait_secs = wait,
                    "TMDB returned 429, backing off"
                );
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            if !resp.status().is_success() {
                return Err(Error::provider(
                    "tmdb",
                    format!("HTTP {} for {url}", resp.status()),
                ));
            }

            return Ok(resp);
        }
    }

    /// Build a full API URL with the API key and language query parameters.
    fn url(&self, path: &str, extra_params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}{path}?api_key={}&language={}",
            self.base_url, self.api_key, self.language
        );
        for (key, value) in extra_params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoded(value));
        }
        url
    }

    fn date_floor(&self) -> Option<String> {
        self.min_year.map(|y| format!("{y}-01-01"))
    }
}

/// Minimal percent-encoding for query parameter values.
fn urlencoded(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

/// Extract a four-digit year from a date string like `"2023-04-15"`.
fn parse_year(date: &Option<String>) -> Option<u16> {
    date.as_deref()
        .and_then(|d| d.get(..4))
        .and_then(|y| y.parse::<u16>().ok())
}

/// Render a TMDB vote average (0.0 - 10.0) as the displayed rating string.
fn format_rating(vote_average: f64) -> String {
    format!("{vote_average:.1}")
}

#[async_trait]
impl TitleProvider for TmdbProvider {
    fn name(&self) -> &'static str {
        "tmdb"
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn top_titles(
        &self,
        genre: &GenreConfig,
        media_type: MediaType,
    ) -> Result<Vec<RawRecord>> {
        let Some(genre_id) = genre.tmdb_id else {
            debug!(genre = %genre.label, "no TMDB genre id configured, contributing nothing");
            return Ok(Vec::new());
        };
        let genre_id = genre_id.to_string();
        let vote_floor = MIN_VOTE_COUNT.to_string();
        let date_floor = self.date_floor();

        let mut params = vec![
            ("with_genres", genre_id.as_str()),
            ("sort_by", "vote_average.desc"),
            ("vote_count.gte", vote_floor.as_str()),
            ("page", "1"),
        ];

        let records = match media_type {
            MediaType::Movies => {
                if let Some(ref floor) = date_floor {
                    params.push(("primary_release_date.gte", floor.as_str()));
                }
                let url = self.url("/discover/movie", &params);
                debug!(url = %url, "TMDB discover movies");

                let body: DiscoverResponse<DiscoverMovie> = self
                    .get(&url)
                    .await?
                    .json()
                    .await
                    .map_err(|e| {
                        Error::provider("tmdb", format!("bad movie discover response: {e}"))
                    })?;

                body.results
                    .into_iter()
                    .map(|m| RawRecord {
                        title: m.title.unwrap_or_default(),
                        rating: m.vote_average.map(format_rating),
                        year: parse_year(&m.release_date),
                        link: Some(format!("{TMDB_TITLE_BASE}/movie/{}", m.id)),
                    })
                    .collect()
            }
            MediaType::Series => {
                if let Some(ref floor) = date_floor {
                    params.push(("first_air_date.gte", floor.as_str()));
                }
                let url = self.url("/discover/tv", &params);
                debug!(url = %url, "TMDB discover TV");

                let body: DiscoverResponse<DiscoverTv> = self
                    .get(&url)
                    .await?
                    .json()
                    .await
                    .map_err(|e| {
                        Error::provider("tmdb", format!("bad tv discover response: {e}"))
                    })?;

                body.results
                    .into_iter()
                    .map(|t| RawRecord {
                        title: t.name.unwrap_or_default(),
                        rating: t.vote_average.map(format_rating),
                        year: parse_year(&t.first_air_date),
                        link: Some(format!("{TMDB_TITLE_BASE}/tv/{}", t.id)),
                    })
                    .collect()
            }
        };

        Ok(records)
    }
}
