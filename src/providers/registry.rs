//! Registry for managing multiple [`TitleProvider`] implementations.
//!
//! Providers are stored in registration order, which doubles as the merge
//! priority order: the first registered source is the most authoritative and
//! supplies display titles. The registry is also the failure boundary of the
//! fetch layer: a provider that errors contributes an empty record list and a
//! warning, never a failed pass.

use std::sync::Arc;

use futures::future;
use tracing::warn;

use crate::config::GenreConfig;
use crate::types::{MediaType, SourceRecords};

use super::provider::TitleProvider;

/// Ordered collection of title sources.
pub struct SourceRegistry {
    providers: Vec<Arc<dyn TitleProvider>>,
}

impl SourceRegistry {
    /// Create an empty registry with no providers.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Register a new title provider.
    ///
    /// Providers are stored in the order they are registered; that order is
    /// the merge priority order.
    pub fn register(&mut self, provider: Arc<dyn TitleProvider>) {
        self.providers.push(provider);
    }

    /// Return references to all providers that are currently available.
    pub fn available(&self) -> Vec<&dyn TitleProvider> {
        self.providers
            .iter()
            .filter(|p| p.is_available())
            .map(|p| p.as_ref())
            .collect()
    }

    /// Return the first available provider, or `None` if no providers are
    /// configured / available.
    pub fn primary(&self) -> Option<&dyn TitleProvider> {
        self.providers
            .iter()
            .find(|p| p.is_available())
            .map(|p| p.as_ref())
    }

    /// Look up a provider by its [`TitleProvider::name`].
    pub fn get(&self, name: &str) -> Option<&dyn TitleProvider> {
        self.providers
            .iter()
            .find(|p| p.name() == name)
            .map(|p| p.as_ref())
    }

    /// Names of all registered providers, in priority order.
    pub fn names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// Fetch one (genre, media-type) pair from every available provider.
    ///
    /// The per-source fetches have no data dependency on each other and run
    /// concurrently; the returned lists are in registration (priority) order
    /// regardless of completion order. A provider failure is logged and
    /// contributes an empty list — partial results always beat none.
    pub async fn fetch_all(
        &self,
        genre: &GenreConfig,
        media_type: MediaType,
    ) -> Vec<SourceRecords> {
        let available = self.available();

        let fetches = available
            .iter()
            .map(|provider| provider.top_titles(genre, media_type));
        let results = future::join_all(fetches).await;

        available
            .iter()
            .zip(results)
            .map(|(provider, result)| SourceRecords {
                source: provider.name().to_string(),
                records: match result {
                    Ok(records) => records,
                    Err(e) => {
                        warn!(
                            source = provider.name(),
                            genre = %genre.label,
                            media_type = %media_type,
                            error = %e,
                            "source fetch failed, continuing without it"
                        );
                        Vec::new()
                    }
                },
            })
            .collect()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::RawRecord;
    use async_trait::async_trait;

    /// A minimal stub provider used for testing.
    struct StubProvider {
        provider_name: &'static str,
        available: bool,
        outcome: std::result::Result<Vec<&'static str>, &'static str>,
    }

    #[async_trait]
    impl TitleProvider for StubProvider {
        fn name(&self) -> &'static str {
            self.provider_name
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn top_titles(
            &self,
            _genre: &GenreConfig,
            _media_type: MediaType,
        ) -> crate::error::Result<Vec<RawRecord>> {
            match &self.outcome {
                Ok(titles) => Ok(titles
                    .iter()
                    .map(|t| RawRecord {
                        title: t.to_string(),
                        rating: None,
                        year: None,
                        link: None,
                    })
                    .collect()),
                Err(msg) => Err(Error::provider(self.provider_name, *msg)),
            }
        }
    }

    fn genre() -> GenreConfig {
        GenreConfig {
            label: "Thriller".to_string(),
            tmdb_id: Some(53),
            imdb: Some("thriller".to_string()),
            rotten: Some("mystery_and_thriller".to_string()),
        }
    }

    #[test]
    fn empty_registry() {
        let registry = SourceRegistry::new();
        assert!(registry.available().is_empty());
        assert!(registry.primary().is_none());
        assert!(registry.get("tmdb").is_none());
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(StubProvider {
            provider_name: "tmdb",
            available: true,
            outcome: Ok(Vec::new()),
        }));
        registry.register(Arc::new(StubProvider {
            provider_name: "imdb",
            available: false,
            outcome: Ok(Vec::new()),
        }));

        assert_eq!(registry.available().len(), 1);
        assert_eq!(registry.primary().unwrap().name(), "tmdb");
        assert!(registry.get("tmdb").is_some());
        assert!(registry.get("imdb").is_some()); // registered but not available
        assert!(registry.get("nonexistent").is_none());
        assert_eq!(registry.names(), vec!["tmdb", "imdb"]);
    }

    #[test]
    fn primary_returns_first_available() {
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(StubProvider {
            provider_name: "offline",
            available: false,
            outcome: Ok(Vec::new()),
        }));
        registry.register(Arc::new(StubProvider {
            provider_name: "online",
            available: true,
            outcome: Ok(Vec::new()),
        }));

        assert_eq!(registry.primary().unwrap().name(), "online");
    }

    #[tokio::test]
    async fn fetch_all_preserves_priority_order() {
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(StubProvider {
            provider_name: "tmdb",
            available: true,
            outcome: Ok(vec!["Dune"]),
        }));
        registry.register(Arc::new(StubProvider {
            provider_name: "imdb",
            available: true,
            outcome: Ok(vec!["Heat"]),
        }));

        let lists = registry.fetch_all(&genre(), MediaType::Movies).await;
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0].source, "tmdb");
        assert_eq!(lists[0].records[0].title, "Dune");
        assert_eq!(lists[1].source, "imdb");
        assert_eq!(lists[1].records[0].title, "Heat");
    }

    #[tokio::test]
    async fn failing_source_contributes_empty_list() {
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(StubProvider {
            provider_name: "tmdb",
            available: true,
            outcome: Err("HTTP 503"),
        }));
        registry.register(Arc::new(StubProvider {
            provider_name: "imdb",
            available: true,
            outcome: Ok(vec!["Heat"]),
        }));

        let lists = registry.fetch_all(&genre(), MediaType::Movies).await;
        assert_eq!(lists.len(), 2);
        assert!(lists[0].records.is_empty());
        assert_eq!(lists[1].records.len(), 1);
    }

    #[tokio::test]
    async fn unavailable_source_is_skipped_entirely() {
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(StubProvider {
            provider_name: "tmdb",
            available: false,
            outcome: Ok(vec!["Ghost Entry"]),
        }));
        registry.register(Arc::new(StubProvider {
            provider_name: "imdb",
            available: true,
            outcome: Ok(vec!["Real Entry"]),
        }));

        let lists = registry.fetch_all(&genre(), MediaType::Movies).await;
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].source, "imdb");
    }

    #[tokio::test]
    async fn no_providers_yields_no_lists() {
        let registry = SourceRegistry::new();
        let lists = registry.fetch_all(&genre(), MediaType::Movies).await;
        assert!(lists.is_empty());
    }
}
