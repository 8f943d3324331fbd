use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL for poster images, without the size segment
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Size segment inserted between the image base and the poster path
    #[serde(default = "default_poster_size")]
    pub poster_size: String,

    /// Returned whenever a poster cannot be resolved
    #[serde(default = "default_fallback_poster_url")]
    pub fallback_poster_url: String,

    /// Directory holding `movies.json` and `similarity.json`
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum number of titles kept in the poster cache
    #[serde(default = "default_poster_cache_capacity")]
    pub poster_cache_capacity: usize,

    /// Number of poster lookups allowed in flight at once
    #[serde(default = "default_fetch_workers")]
    pub fetch_workers: usize,

    /// Timeout applied to each outbound metadata request
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Titles served by `/popular_movies` and warmed at startup
    #[serde(default = "default_popular_count")]
    pub popular_count: usize,

    /// Neighbors returned per recommendation
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_poster_size() -> String {
    "w500".to_string()
}

fn default_fallback_poster_url() -> String {
    "https://via.placeholder.com/300x450?text=No+Poster".to_string()
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("model")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_poster_cache_capacity() -> usize {
    1000
}

fn default_fetch_workers() -> usize {
    8
}

fn default_fetch_timeout_ms() -> u64 {
    2000
}

fn default_popular_count() -> usize {
    12
}

fn default_recommendation_count() -> usize {
    5
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let vars = vec![("TMDB_API_KEY".to_string(), "secret".to_string())];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.tmdb_api_key, "secret");
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.poster_size, "w500");
        assert_eq!(config.port, 5000);
        assert_eq!(config.poster_cache_capacity, 1000);
        assert_eq!(config.fetch_workers, 8);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(2));
        assert_eq!(config.popular_count, 12);
        assert_eq!(config.recommendation_count, 5);
        assert_eq!(config.bind_address(), "127.0.0.1:5000");
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let vars: Vec<(String, String)> = vec![("PORT".to_string(), "8080".to_string())];
        assert!(envy::from_iter::<_, Config>(vars).is_err());
    }

    #[test]
    fn test_overrides() {
        let vars = vec![
            ("TMDB_API_KEY".to_string(), "k".to_string()),
            ("FETCH_WORKERS".to_string(), "16".to_string()),
            ("MODEL_DIR".to_string(), "/srv/model".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.fetch_workers, 16);
        assert_eq!(config.model_dir, PathBuf::from("/srv/model"));
    }
}
