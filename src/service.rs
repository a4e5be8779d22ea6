//! The fetch-aggregate-cache pass.
//!
//! [`ListService`] owns the wiring: it consults the snapshot store, fetches
//! movie and series lists from every available source concurrently, merges
//! them in priority order, and writes the result back. One user interaction
//! triggers at most one pass.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::aggregate::{merge_sources, TitleMatcher};
use crate::cache::{FileStore, Snapshot, SnapshotStore};
use crate::config::{Config, GenreConfig};
use crate::error::Result;
use crate::providers::{ImdbProvider, RottenProvider, SourceRegistry, TmdbProvider};
use crate::types::{CategoryResult, MediaType};

/// Orchestrates one top-lists pass per call.
pub struct ListService {
    registry: SourceRegistry,
    store: Box<dyn SnapshotStore>,
    matcher: Box<dyn TitleMatcher>,
    max_items: usize,
}

impl ListService {
    /// Assemble a service with explicit collaborators.
    pub fn new(
        registry: SourceRegistry,
        store: Box<dyn SnapshotStore>,
        matcher: Box<dyn TitleMatcher>,
        max_items: usize,
    ) -> Self {
        Self {
            registry,
            store,
            matcher,
            max_items,
        }
    }

    /// Build the service from configuration: providers in the configured
    /// priority order, a file-backed snapshot store, the configured matcher.
    pub fn from_config(config: &Config) -> Self {
        let mut registry = SourceRegistry::new();
        for source in &config.sources.order {
            match source.as_str() {
                "tmdb" => registry.register(Arc::new(TmdbProvider::new(
                    config.tmdb.api_key.clone(),
                    config.tmdb.language.clone(),
                    config.filters.min_year,
                ))),
                "imdb" => {
                    registry.register(Arc::new(ImdbProvider::new(config.filters.min_year)))
                }
                "rotten" => registry.register(Arc::new(RottenProvider::new())),
                // validate_config rejects anything else before we get here.
                other => debug!(source = other, "ignoring unknown source in order"),
            }
        }

        let store = Box::new(FileStore::new(
            config.cache.path.clone(),
            config.cache.ttl_hours,
        ));

        Self::new(
            registry,
            store,
            config.merge.match_mode.matcher(),
            config.merge.max_items,
        )
    }

    /// Source names in priority order.
    pub fn sources(&self) -> Vec<String> {
        self.registry.names()
    }

    /// The provider registry (for availability reporting).
    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Produce the top lists for `genre`, from cache when possible.
    ///
    /// `refresh` bypasses the cache read (the write still happens). Cache
    /// read errors are logged and treated as a miss; cache write errors are
    /// logged and never block returning the freshly computed result.
    pub async fn top_lists(&self, genre: &GenreConfig, refresh: bool) -> Result<Snapshot> {
        if refresh {
            debug!(genre = %genre.label, "refresh requested, skipping cache read");
        } else {
            match self.store.load() {
                Ok(Some(snapshot)) if snapshot.genre.eq_ignore_ascii_case(&genre.label) => {
                    info!(
                        genre = %genre.label,
                        age_mins = snapshot.age().num_minutes(),
                        "serving cached snapshot"
                    );
                    return Ok(snapshot);
                }
                Ok(Some(snapshot)) => {
                    debug!(
                        cached = %snapshot.genre,
                        requested = %genre.label,
                        "cached snapshot is for another genre, refetching"
                    );
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, "cache read failed, treating as miss");
                }
            }
        }

        info!(genre = %genre.label, "fetching top lists");

        // The two media types have no data dependency on each other; fetch
        // them concurrently, each fanning out across the sources.
        let (movie_sources, series_sources) = tokio::join!(
            self.registry.fetch_all(genre, MediaType::Movies),
            self.registry.fetch_all(genre, MediaType::Series),
        );

        let lists = CategoryResult {
            movies: merge_sources(&movie_sources, self.matcher.as_ref(), self.max_items),
            series: merge_sources(&series_sources, self.matcher.as_ref(), self.max_items),
        };

        info!(
            genre = %genre.label,
            movies = lists.movies.len(),
            series = lists.series.len(),
            "aggregation complete"
        );

        let snapshot = Snapshot {
            genre: genre.label.clone(),
            generated_at: Utc::now(),
            sources: self.registry.names(),
            lists,
        };

        if let Err(e) = self.store.save(&snapshot) {
            warn!(error = %e, "failed to save snapshot, continuing with fresh data");
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::ExactMatcher;
    use crate::cache::MemoryStore;
    use crate::error::Error;
    use crate::providers::TitleProvider;
    use crate::types::RawRecord;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubProvider {
        provider_name: &'static str,
        titles: Vec<(&'static str, &'static str)>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TitleProvider for StubProvider {
        fn name(&self) -> &'static str {
            self.provider_name
        }

        fn is_available(&self) -> bool {
            true
        }

        async fn top_titles(
            &self,
            _genre: &GenreConfig,
            _media_type: MediaType,
        ) -> crate::error::Result<Vec<RawRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .titles
                .iter()
                .map(|(title, rating)| RawRecord {
                    title: title.to_string(),
                    rating: Some(rating.to_string()),
                    year: None,
                    link: None,
                })
                .collect())
        }
    }

    fn genre(label: &str) -> GenreConfig {
        GenreConfig {
            label: label.to_string(),
            tmdb_id: Some(53),
            imdb: Some("thriller".to_string()),
            rotten: Some("mystery_and_thriller".to_string()),
        }
    }

    fn service_with_stubs() -> (ListService, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(StubProvider {
            provider_name: "tmdb",
            titles: vec![("Dune", "8.5"), ("Heat", "8.3")],
            calls: calls.clone(),
        }));
        registry.register(Arc::new(StubProvider {
            provider_name: "rotten",
            titles: vec![("dune", "83%")],
            calls: calls.clone(),
        }));

        let service = ListService::new(
            registry,
            Box::new(MemoryStore::new()),
            Box::new(ExactMatcher),
            10,
        );
        (service, calls)
    }

    #[tokio::test]
    async fn pass_merges_and_caches() {
        let (service, calls) = service_with_stubs();

        let snapshot = service.top_lists(&genre("Thriller"), false).await.unwrap();
        assert_eq!(snapshot.genre, "Thriller");
        assert_eq!(snapshot.sources, vec!["tmdb", "rotten"]);
        assert_eq!(snapshot.lists.movies.len(), 2);
        assert_eq!(snapshot.lists.movies[0].title, "Dune");
        assert_eq!(snapshot.lists.movies[0].rating_for("tmdb"), "8.5");
        assert_eq!(snapshot.lists.movies[0].rating_for("rotten"), "83%");
        // Two providers, two media types.
        assert_eq!(calls.load(Ordering::SeqCst), 4);

        // Second pass is served from the snapshot store.
        let again = service.top_lists(&genre("Thriller"), false).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(again.generated_at, snapshot.generated_at);
    }

    #[tokio::test]
    async fn refresh_bypasses_cache_read() {
        let (service, calls) = service_with_stubs();

        service.top_lists(&genre("Thriller"), false).await.unwrap();
        service.top_lists(&genre("Thriller"), true).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn genre_change_is_a_cache_miss() {
        let (service, calls) = service_with_stubs();

        service.top_lists(&genre("Thriller"), false).await.unwrap();
        service.top_lists(&genre("Comedy"), false).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn cached_genre_match_is_case_insensitive() {
        let (service, calls) = service_with_stubs();

        service.top_lists(&genre("Thriller"), false).await.unwrap();
        service.top_lists(&genre("thriller"), false).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    struct FailingStore;

    impl SnapshotStore for FailingStore {
        fn load(&self) -> crate::error::Result<Option<Snapshot>> {
            Err(Error::cache("disk on fire"))
        }

        fn save(&self, _snapshot: &Snapshot) -> crate::error::Result<()> {
            Err(Error::cache("disk still on fire"))
        }
    }

    #[tokio::test]
    async fn cache_failures_never_block_a_pass() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(StubProvider {
            provider_name: "tmdb",
            titles: vec![("Dune", "8.5")],
            calls: calls.clone(),
        }));

        let service = ListService::new(
            registry,
            Box::new(FailingStore),
            Box::new(ExactMatcher),
            10,
        );

        let snapshot = service.top_lists(&genre("Thriller"), false).await.unwrap();
        assert_eq!(snapshot.lists.movies.len(), 1);
    }

    #[tokio::test]
    async fn no_sources_yields_empty_lists_not_error() {
        let service = ListService::new(
            SourceRegistry::new(),
            Box::new(MemoryStore::new()),
            Box::new(ExactMatcher),
            10,
        );

        let snapshot = service.top_lists(&genre("Thriller"), false).await.unwrap();
        assert!(snapshot.lists.movies.is_empty());
        assert!(snapshot.lists.series.is_empty());
    }
}
