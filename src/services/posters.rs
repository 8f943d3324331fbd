use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    cached,
    config::Config,
    db::PosterCache,
    error::{AppError, AppResult},
    services::providers::MetadataProvider,
};

/// Poster URL composition settings
#[derive(Debug, Clone)]
pub struct PosterSettings {
    /// Image base, e.g. `https://image.tmdb.org/t/p`
    pub image_base_url: String,
    /// Width segment, e.g. `w500`
    pub size: String,
    /// URL returned whenever a poster cannot be resolved
    pub fallback_url: String,
    /// Bound applied to each outbound provider call
    pub timeout: Duration,
}

impl PosterSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            image_base_url: config.tmdb_image_url.trim_end_matches('/').to_string(),
            size: config.poster_size.clone(),
            fallback_url: config.fallback_poster_url.clone(),
            timeout: config.fetch_timeout(),
        }
    }

    /// Appends the provider's `poster_path` verbatim; TMDB paths carry their own leading `/`
    fn poster_url(&self, poster_path: &str) -> String {
        format!("{}/{}{}", self.image_base_url, self.size, poster_path)
    }
}

/// Resolves movie titles to poster URLs, memoizing every outcome.
///
/// Failures never reach the caller: any provider error, timeout, empty search or
/// missing poster resolves to the fallback URL, and that fallback is cached too, so
/// a failed title is not retried until it is evicted.
pub struct PosterResolver {
    provider: Arc<dyn MetadataProvider>,
    cache: PosterCache,
    settings: PosterSettings,
}

impl PosterResolver {
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        cache: PosterCache,
        settings: PosterSettings,
    ) -> Self {
        Self {
            provider,
            cache,
            settings,
        }
    }

    #[cfg(test)]
    pub fn cache(&self) -> &PosterCache {
        &self.cache
    }

    pub fn fallback_url(&self) -> &str {
        &self.settings.fallback_url
    }

    /// Returns the poster URL for `title`, hitting the provider only on a cache miss
    pub async fn resolve(&self, title: &str) -> String {
        cached!(self.cache, title, async {
            match self.lookup(title).await {
                Ok(Some(url)) => url,
                Ok(None) => {
                    tracing::debug!(title = %title, "No poster available, using fallback");
                    self.settings.fallback_url.clone()
                }
                Err(e) => {
                    tracing::warn!(
                        title = %title,
                        provider = self.provider.name(),
                        error = %e,
                        "Poster lookup failed, using fallback"
                    );
                    self.settings.fallback_url.clone()
                }
            }
        })
    }

    /// Search then details; `Ok(None)` when the provider knows nothing usable
    async fn lookup(&self, title: &str) -> AppResult<Option<String>> {
        let Some(movie_id) = self
            .with_timeout("search", self.provider.search_movie(title))
            .await?
        else {
            return Ok(None);
        };

        let poster_path = self
            .with_timeout("details", self.provider.poster_path(movie_id))
            .await?;

        Ok(poster_path.map(|path| self.settings.poster_url(&path)))
    }

    async fn with_timeout<T>(
        &self,
        call: &str,
        future: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        tokio::time::timeout(self.settings.timeout, future)
            .await
            .map_err(|_| {
                AppError::ExternalApi(format!(
                    "{} call timed out after {}ms",
                    call,
                    self.settings.timeout.as_millis()
                ))
            })?
    }
}
