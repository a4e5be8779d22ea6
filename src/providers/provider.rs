//! Trait definition for title sources.
//!
//! Each provider wraps one external source of ranked titles (the TMDB REST
//! API, the IMDb search pages, the Rotten Tomatoes browse grid) and exposes a
//! uniform fetch interface. Providers are the I/O boundary: beyond the fetch
//! itself they carry no decision logic.

use async_trait::async_trait;

use crate::config::GenreConfig;
use crate::error::Result;
use crate::types::{MediaType, RawRecord};

/// Async trait that all title sources implement.
///
/// Providers are expected to be cheaply cloneable or wrapped in an `Arc` so
/// they can be shared across tasks.
#[async_trait]
pub trait TitleProvider: Send + Sync {
    /// Short, lowercase identifier for this source (e.g. `"tmdb"`). Also the
    /// key under which the source's ratings appear in merged entries.
    fn name(&self) -> &'static str;

    /// Returns `true` when the provider is configured and ready to serve
    /// requests (e.g. has an API key where one is required).
    fn is_available(&self) -> bool;

    /// Fetch the source's ranked titles for one (genre, media-type) pair.
    ///
    /// Returns records in the source's own ranking order. A genre the source
    /// has no key for yields `Ok` with an empty list; transport and parse
    /// failures yield `Err` and are converted to an empty contribution at the
    /// registry boundary.
    async fn top_titles(
        &self,
        genre: &GenreConfig,
        media_type: MediaType,
    ) -> Result<Vec<RawRecord>>;
}
