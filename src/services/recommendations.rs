use std::cmp::Ordering;
use std::sync::Arc;

use crate::{
    db::Catalog,
    error::{AppError, AppResult},
    models::{Recommendation, RecommendationResponse, SelectedMovie},
    services::{fetcher::PosterFetcher, posters::PosterResolver},
};

/// Ranks a similarity row and keeps `count` neighbors.
///
/// All `(index, score)` pairs are sorted by descending score with a stable sort, so
/// equal scores (`-0.0` and `0.0` included) keep catalog order. Scores are finite, see
/// [`crate::db::LoadError::NonFinite`]. The top-ranked entry is then dropped by position
/// (it is assumed to be the query itself, whose self-similarity is the maximum) and the
/// next `count` entries are returned.
pub fn rank_neighbors(row: &[f64], count: usize) -> Vec<(usize, f64)> {
    let mut scores: Vec<(usize, f64)> = row.iter().copied().enumerate().collect();
    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scores.into_iter().skip(1).take(count).collect()
}

/// Generates "more like this" recommendations from the precomputed similarity matrix
pub struct RecommendationEngine {
    catalog: Arc<Catalog>,
    resolver: Arc<PosterResolver>,
    fetcher: PosterFetcher,
    count: usize,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<Catalog>, fetcher: PosterFetcher, count: usize) -> Self {
        Self {
            catalog,
            resolver: fetcher.resolver().clone(),
            fetcher,
            count,
        }
    }

    /// Recommends movies similar to `title`, matched case-insensitively
    pub async fn recommend(&self, title: &str) -> AppResult<RecommendationResponse> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::InvalidInput(
                "Movie title is required".to_string(),
            ));
        }

        let idx = self
            .catalog
            .find_by_title_case_insensitive(title)
            .ok_or_else(|| AppError::NotFound(format!("Movie \"{}\" not found", title)))?;

        let selected = self
            .catalog
            .movie(idx)
            .ok_or_else(|| AppError::Internal(format!("Catalog index {} out of range", idx)))?;
        let row = self.catalog.similarity().row(idx).ok_or_else(|| {
            AppError::Internal(format!("Similarity row {} out of range", idx))
        })?;

        let neighbors = rank_neighbors(row, self.count);

        let mut movies = Vec::with_capacity(neighbors.len());
        for (j, score) in neighbors {
            let movie = self.catalog.movie(j).ok_or_else(|| {
                AppError::Internal(format!("Neighbor index {} out of range", j))
            })?;
            movies.push((movie, score));
        }
        let neighbor_titles: Vec<String> = movies.iter().map(|(m, _)| m.title.clone()).collect();

        // The selected poster is looked up with the title as the caller typed it
        let (selected_poster, posters) = tokio::join!(
            self.resolver.resolve(title),
            self.fetcher.resolve_all(&neighbor_titles)
        );

        let recommendations = movies
            .into_iter()
            .zip(posters)
            .map(|((movie, score), poster)| Recommendation {
                title: movie.title.clone(),
                id: movie.id,
                poster,
                similarity_score: score,
            })
            .collect::<Vec<_>>();

        tracing::info!(
            title = %title,
            movie_id = selected.id,
            recommendations = recommendations.len(),
            "Recommendations generated"
        );

        Ok(RecommendationResponse {
            selected_movie: SelectedMovie {
                title: title.to_string(),
                id: selected.id,
                poster: selected_poster,
            },
            recommendations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::PosterCache,
        models::Movie,
        services::{
            posters::tests::{test_settings, FALLBACK},
            providers::MockMetadataProvider,
        },
    };

    fn engine_for(catalog: Catalog) -> RecommendationEngine {
        // Every lookup misses, so posters are deterministic
        let mut mock = MockMetadataProvider::new();
        mock.expect_search_movie().returning(|_| Ok(None));
        mock.expect_name().return_const("mock");

        let resolver = PosterResolver::new(Arc::new(mock), PosterCache::new(64), test_settings());
        let fetcher = PosterFetcher::new(Arc::new(resolver), 4);
        RecommendationEngine::new(Arc::new(catalog), fetcher, 5)
    }

    fn seven_movie_catalog() -> Catalog {
        let movies = vec![
            Movie::new(10, "Avatar"),
            Movie::new(20, "Titanic"),
            Movie::new(30, "Aliens"),
            Movie::new(40, "The Abyss"),
            Movie::new(50, "Terminator"),
            Movie::new(60, "True Lies"),
            Movie::new(70, "Piranha II"),
        ];
        let similarity = vec![
            vec![1.0, 0.1, 0.8, 0.6, 0.6, 0.3, 0.2],
            vec![0.1, 1.0, 0.1, 0.2, 0.1, 0.1, 0.0],
            vec![0.8, 0.1, 1.0, 0.5, 0.7, 0.2, 0.3],
            vec![0.6, 0.2, 0.5, 1.0, 0.4, 0.2, 0.1],
            vec![0.6, 0.1, 0.7, 0.4, 1.0, 0.5, 0.2],
            vec![0.3, 0.1, 0.2, 0.2, 0.5, 1.0, 0.1],
            vec![0.2, 0.0, 0.3, 0.1, 0.2, 0.1, 1.0],
        ];
        Catalog::new(movies, similarity).unwrap()
    }

    #[test]
    fn test_rank_neighbors_drops_top_and_keeps_stable_ties() {
        let row = [1.0, 0.1, 0.8, 0.6, 0.6, 0.3, 0.2];
        let ranked = rank_neighbors(&row, 5);
        assert_eq!(
            ranked,
            vec![(2, 0.8), (3, 0.6), (4, 0.6), (5, 0.3), (6, 0.2)]
        );
    }

    #[test]
    fn test_rank_neighbors_drops_by_position_not_identity() {
        // Query is index 0, but index 1 outranks it and is the one dropped
        let row = [0.9, 1.0, 0.5];
        assert_eq!(rank_neighbors(&row, 5), vec![(0, 0.9), (2, 0.5)]);
    }

    #[test]
    fn test_rank_neighbors_keeps_sub_f32_precision() {
        // Both scores round to the same f32; full precision must still order them
        let row: Vec<f64> = serde_json::from_str("[1.0, 0.30000000001, 0.30000000002]").unwrap();
        assert_eq!(
            rank_neighbors(&row, 5),
            vec![(2, 0.30000000002), (1, 0.30000000001)]
        );
    }

    #[test]
    fn test_rank_neighbors_signed_zero_is_a_tie() {
        let row = [1.0, -0.0, 0.0];
        let ranked = rank_neighbors(&row, 5);
        assert_eq!(ranked.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![1, 2]);
        assert!(ranked[0].1.is_sign_negative());
    }

    #[test]
    fn test_rank_neighbors_single_entry() {
        assert!(rank_neighbors(&[1.0], 5).is_empty());
    }

    #[tokio::test]
    async fn test_recommend_returns_ranked_neighbors() {
        let engine = engine_for(seven_movie_catalog());

        let response = engine.recommend("avatar").await.unwrap();

        assert_eq!(response.selected_movie.title, "avatar");
        assert_eq!(response.selected_movie.id, 10);
        assert_eq!(response.selected_movie.poster, FALLBACK);

        let ids: Vec<u64> = response.recommendations.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![30, 40, 50, 60, 70]);
        assert_eq!(response.recommendations[0].title, "Aliens");
        assert_eq!(response.recommendations[0].similarity_score, 0.8);
        assert!(response.recommendations.iter().all(|r| r.poster == FALLBACK));
    }

    #[tokio::test]
    async fn test_recommend_matches_every_title_in_any_casing() {
        let catalog = seven_movie_catalog();
        let expected: Vec<(String, u64)> = catalog
            .movies()
            .iter()
            .map(|m| (m.title.clone(), m.id))
            .collect();
        let engine = engine_for(catalog);

        for (title, id) in expected {
            let upper = engine.recommend(&title.to_uppercase()).await.unwrap();
            let lower = engine.recommend(&title.to_lowercase()).await.unwrap();
            assert_eq!(upper.selected_movie.id, id);
            assert_eq!(lower.selected_movie.id, id);
        }
    }

    #[tokio::test]
    async fn test_recommend_trims_input() {
        let engine = engine_for(seven_movie_catalog());
        let response = engine.recommend("  Titanic \n").await.unwrap();
        assert_eq!(response.selected_movie.title, "Titanic");
        assert_eq!(response.selected_movie.id, 20);
    }

    #[tokio::test]
    async fn test_recommend_single_movie_catalog() {
        let catalog = Catalog::new(vec![Movie::new(1, "Alpha")], vec![vec![1.0]]).unwrap();
        let engine = engine_for(catalog);

        let response = engine.recommend("alpha").await.unwrap();
        assert_eq!(response.selected_movie.title, "alpha");
        assert_eq!(response.selected_movie.id, 1);
        assert!(response.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_recommend_unknown_title() {
        let engine = engine_for(seven_movie_catalog());
        let result = engine.recommend("Inception").await;
        match result {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Movie \"Inception\" not found"),
            other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_recommend_blank_title() {
        let engine = engine_for(seven_movie_catalog());
        assert!(matches!(
            engine.recommend("").await,
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            engine.recommend("   \t").await,
            Err(AppError::InvalidInput(_))
        ));
    }
}
