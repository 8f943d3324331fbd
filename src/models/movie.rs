use serde::{Deserialize, Serialize};

/// A catalog entry as delivered by the precomputed `movies.json` artifact
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movie {
    /// External identifier (TMDB id in the shipped artifacts)
    pub id: u64,
    /// Display title, not guaranteed to be unique
    pub title: String,
}

impl Movie {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}
