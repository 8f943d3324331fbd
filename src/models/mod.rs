use serde::{Deserialize, Serialize};

pub mod movie;
pub mod tmdb;

pub use movie::Movie;
pub use tmdb::{TmdbMovieDetails, TmdbSearchResponse, TmdbSearchResult};

/// The movie the user asked about, echoed back with its poster
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedMovie {
    pub title: String,
    pub id: u64,
    pub poster: String,
}

/// One ranked neighbor of the selected movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub id: u64,
    pub poster: String,
    pub similarity_score: f64,
}

/// Response body of `POST /recommend`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub selected_movie: SelectedMovie,
    pub recommendations: Vec<Recommendation>,
}

/// Entry of `GET /popular_movies`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PopularMovie {
    pub title: String,
    pub id: u64,
    pub poster: String,
}
