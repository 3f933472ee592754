use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Where the favorites slot is persisted
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FavoritesBackend {
    File,
    Redis,
    Memory,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB v3 API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// TMDB image CDN base URL
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Language passed to every TMDB request
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Quiescence window before a typed query is searched
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    #[serde(default = "default_favorites_backend")]
    pub favorites_backend: FavoritesBackend,

    /// Directory holding the file-backed favorites slot
    #[serde(default = "default_favorites_dir")]
    pub favorites_dir: PathBuf,

    /// Redis connection URL, used by the redis favorites backend
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Connect and command timeout for the redis favorites backend
    #[serde(default = "default_redis_timeout_ms")]
    pub redis_timeout_ms: u64,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_search_debounce_ms() -> u64 {
    500
}

fn default_favorites_backend() -> FavoritesBackend {
    FavoritesBackend::File
}

/// Per-user data directory, relative to the working directory only when the
/// platform has none
fn default_favorites_dir() -> PathBuf {
    match dirs::data_dir() {
        Some(data_dir) => data_dir.join("movie-scout"),
        None => PathBuf::from(".movie-scout"),
    }
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_redis_timeout_ms() -> u64 {
    2000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn redis_timeout(&self) -> Duration {
        Duration::from_millis(self.redis_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_applied() {
        let config: Config = envy::from_iter(vars(&[("TMDB_API_KEY", "abc")])).unwrap();
        assert_eq!(config.tmdb_api_key, "abc");
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb_image_url, "https://image.tmdb.org/t/p");
        assert_eq!(config.tmdb_language, "en-US");
        assert_eq!(config.search_debounce(), Duration::from_millis(500));
        assert_eq!(config.favorites_backend, FavoritesBackend::File);
        assert_eq!(config.redis_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_favorites_dir_is_per_user() {
        let config: Config = envy::from_iter(vars(&[("TMDB_API_KEY", "abc")])).unwrap();
        match dirs::data_dir() {
            Some(data_dir) => {
                assert!(config.favorites_dir.is_absolute());
                assert_eq!(config.favorites_dir, data_dir.join("movie-scout"));
            }
            None => assert_eq!(config.favorites_dir, PathBuf::from(".movie-scout")),
        }
    }

    #[test]
    fn test_favorites_dir_override() {
        let config: Config = envy::from_iter(vars(&[
            ("TMDB_API_KEY", "abc"),
            ("FAVORITES_DIR", "/tmp/scout"),
        ]))
        .unwrap();
        assert_eq!(config.favorites_dir, PathBuf::from("/tmp/scout"));
    }

    #[test]
    fn test_overrides() {
        let config: Config = envy::from_iter(vars(&[
            ("TMDB_API_KEY", "abc"),
            ("SEARCH_DEBOUNCE_MS", "250"),
            ("FAVORITES_BACKEND", "redis"),
            ("REDIS_URL", "redis://cache:6379"),
            ("REDIS_TIMEOUT_MS", "750"),
        ]))
        .unwrap();
        assert_eq!(config.search_debounce_ms, 250);
        assert_eq!(config.favorites_backend, FavoritesBackend::Redis);
        assert_eq!(config.redis_url, "redis://cache:6379");
        assert_eq!(config.redis_timeout(), Duration::from_millis(750));
    }

    #[test]
    fn test_missing_api_key_fails() {
        let result = envy::from_iter::<_, Config>(vars(&[("SEARCH_DEBOUNCE_MS", "250")]));
        assert!(result.is_err());
    }
}
