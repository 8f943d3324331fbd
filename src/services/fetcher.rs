use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::services::posters::PosterResolver;

/// Fans out poster lookups over a bounded number of concurrent workers.
///
/// Each title is resolved on its own tokio task, but at most `workers` are in flight
/// at any time. Results come back in input order regardless of completion order.
#[derive(Clone)]
pub struct PosterFetcher {
    resolver: Arc<PosterResolver>,
    workers: usize,
}

impl PosterFetcher {
    /// Creates a fetcher; a zero worker count is treated as one
    pub fn new(resolver: Arc<PosterResolver>, workers: usize) -> Self {
        Self {
            resolver,
            workers: workers.max(1),
        }
    }

    #[cfg(test)]
    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn resolver(&self) -> &Arc<PosterResolver> {
        &self.resolver
    }

    /// Resolves every title, returning posters aligned index-for-index with `titles`
    pub async fn resolve_all(&self, titles: &[String]) -> Vec<String> {
        if titles.is_empty() {
            return Vec::new();
        }

        tracing::debug!(
            titles = titles.len(),
            workers = self.workers,
            "Resolving poster batch"
        );

        let resolver = self.resolver.clone();

        // Output stays aligned with input; a new title is pulled only when a slot frees up
        stream::iter(titles.iter().cloned())
            .map(move |title| {
                let resolver = resolver.clone();
                async move {
                    let task_resolver = resolver.clone();
                    let task_title = title.clone();
                    match tokio::spawn(async move { task_resolver.resolve(&task_title).await })
                        .await
                    {
                        Ok(poster) => poster,
                        Err(e) => {
                            tracing::error!(title = %title, error = %e, "Poster task join error");
                            resolver.fallback_url().to_string()
                        }
                    }
                }
            })
            .buffered(self.workers)
            .collect::<Vec<_>>()
            .await
    }
}
