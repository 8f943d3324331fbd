/// TMDB (The Movie Database) API provider
///
/// API Flow:
/// 1. Search: /search/movie?query={title} → list of results, first id is used
/// 2. Details: /movie/{id} → optional poster_path
///
/// Both calls authenticate with the `api_key` query parameter.
use crate::{
    error::{AppError, AppResult},
    models::{TmdbMovieDetails, TmdbSearchResponse},
    services::providers::MetadataProvider,
};
use reqwest::{Client as HttpClient, Response};

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self::with_client(HttpClient::new(), api_key, api_url)
    }

    pub fn with_client(http_client: HttpClient, api_key: String, api_url: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Turns non-2xx responses into `ExternalApi` errors
    async fn check_status(response: Response) -> AppResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::ExternalApi(format!(
            "TMDB API returned status {}: {}",
            status, body
        )))
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn search_movie(&self, title: &str) -> AppResult<Option<u64>> {
        let url = format!("{}/search/movie", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("query", title)])
            .send()
            .await?;

        let search: TmdbSearchResponse = Self::check_status(response).await?.json().await?;

        tracing::debug!(
            title = %title,
            results = search.results.len(),
            provider = "tmdb",
            "Movie search completed"
        );

        Ok(search.results.first().map(|r| r.id))
    }

    async fn poster_path(&self, movie_id: u64) -> AppResult<Option<String>> {
        let url = format!("{}/movie/{}", self.api_url, movie_id);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let details: TmdbMovieDetails = Self::check_status(response).await?.json().await?;

        // TMDB occasionally returns an empty string instead of null
        Ok(details.poster_path.filter(|path| !path.is_empty()))
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
