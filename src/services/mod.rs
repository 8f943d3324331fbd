pub mod fetcher;
pub mod posters;
pub mod providers;
pub mod recommendations;
pub mod warmup;

pub use fetcher::PosterFetcher;
pub use posters::{PosterResolver, PosterSettings};
pub use recommendations::RecommendationEngine;
pub use warmup::{CacheWarmer, Readiness};
