use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::{db::Catalog, services::fetcher::PosterFetcher};

/// Shared flag flipped once the poster cache warm-up has finished
#[derive(Clone, Default)]
pub struct Readiness {
    ready: Arc<AtomicBool>,
}

impl Readiness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }
}

/// Pre-populates the poster cache with the first titles of the catalog
pub struct CacheWarmer {
    catalog: Arc<Catalog>,
    fetcher: PosterFetcher,
    readiness: Readiness,
}

impl CacheWarmer {
    pub fn new(catalog: Arc<Catalog>, fetcher: PosterFetcher, readiness: Readiness) -> Self {
        Self {
            catalog,
            fetcher,
            readiness,
        }
    }

    /// Resolves posters for the first `count` movies in load order and marks the
    /// service ready. Returns the number of titles warmed.
    pub async fn warmup(&self, count: usize) -> usize {
        let started = Instant::now();
        let titles: Vec<String> = self
            .catalog
            .head(count)
            .iter()
            .map(|m| m.title.clone())
            .collect();

        // Results are discarded; only the cache side effect matters
        let warmed = self.fetcher.resolve_all(&titles).await.len();
        self.readiness.mark_ready();

        tracing::info!(
            titles = warmed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Poster cache warm-up completed"
        );

        warmed
    }

    /// Runs the warm-up on a background task
    pub fn spawn(self, count: usize) -> tokio::task::JoinHandle<usize> {
        tokio::spawn(async move { self.warmup(count).await })
    }
}
