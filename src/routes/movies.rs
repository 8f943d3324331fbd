use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{models::PopularMovie, routes::AppState};

/// Handler for listing every catalog title in load order
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.catalog.titles())
}

/// Handler for the popular movies strip: the first catalog entries with posters
pub async fn popular(State(state): State<Arc<AppState>>) -> Json<Vec<PopularMovie>> {
    let movies = state.catalog.head(state.popular_count);
    let titles: Vec<String> = movies.iter().map(|m| m.title.clone()).collect();

    let posters = state.fetcher.resolve_all(&titles).await;

    let popular = movies
        .iter()
        .zip(posters)
        .map(|(movie, poster)| PopularMovie {
            title: movie.title.clone(),
            id: movie.id,
            poster,
        })
        .collect();

    Json(popular)
}
