pub mod catalog;
pub mod memory;

pub use catalog::{Catalog, LoadError, SimilarityMatrix};
pub use memory::PosterCache;
