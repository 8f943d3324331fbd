/// Movie metadata provider abstraction
///
/// The poster pipeline only needs two lookups from an external catalog: resolve a
/// free-text title to the provider's id, then fetch that id's poster path. Keeping
/// them behind a trait lets the resolver be exercised without network access.
use crate::error::AppResult;

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Search for a movie by title
    ///
    /// Returns the id of the first search result, or `None` when nothing matched.
    async fn search_movie(&self, title: &str) -> AppResult<Option<u64>>;

    /// Fetch the poster path of a movie by provider id
    ///
    /// The path is relative to the provider's image base (e.g. `/kqjL17yufvn9OVLyXYpvtyrFfak.jpg`).
    async fn poster_path(&self, movie_id: u64) -> AppResult<Option<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
