use std::sync::Arc;

use crate::{
    config::Config,
    db::{Catalog, PosterCache},
    services::{
        providers::MetadataProvider, CacheWarmer, PosterFetcher, PosterResolver, PosterSettings,
        Readiness, RecommendationEngine,
    },
};

/// Tunables for wiring the poster pipeline
#[derive(Debug, Clone)]
pub struct StateOptions {
    pub poster: PosterSettings,
    pub cache_capacity: usize,
    pub workers: usize,
    pub popular_count: usize,
    pub recommendation_count: usize,
}

impl StateOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            poster: PosterSettings::from_config(config),
            cache_capacity: config.poster_cache_capacity,
            workers: config.fetch_workers,
            popular_count: config.popular_count,
            recommendation_count: config.recommendation_count,
        }
    }
}

/// Shared application state
///
/// The catalog is immutable after load; the poster cache inside the resolver is the
/// only mutable piece and guards itself.
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub fetcher: PosterFetcher,
    pub engine: RecommendationEngine,
    pub readiness: Readiness,
    pub popular_count: usize,
}

impl AppState {
    /// Wires catalog, provider and cache into the request-serving components
    pub fn new(
        catalog: Arc<Catalog>,
        provider: Arc<dyn MetadataProvider>,
        options: StateOptions,
    ) -> Self {
        let cache = PosterCache::new(options.cache_capacity);
        tracing::info!(
            provider = provider.name(),
            cache_capacity = cache.capacity(),
            workers = options.workers,
            "Poster pipeline configured"
        );
        let resolver = Arc::new(PosterResolver::new(provider, cache, options.poster));
        let fetcher = PosterFetcher::new(resolver, options.workers);
        let engine = RecommendationEngine::new(
            catalog.clone(),
            fetcher.clone(),
            options.recommendation_count,
        );

        Self {
            catalog,
            fetcher,
            engine,
            readiness: Readiness::new(),
            popular_count: options.popular_count,
        }
    }

    /// Builds the startup warmer sharing this state's cache and readiness flag
    pub fn warmer(&self) -> CacheWarmer {
        CacheWarmer::new(
            self.catalog.clone(),
            self.fetcher.clone(),
            self.readiness.clone(),
        )
    }
}
