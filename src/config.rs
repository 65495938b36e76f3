use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the catalog artifact (JSON array of movies)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Path to the similarity matrix artifact (JSON array of rows)
    #[serde(default = "default_similarity_path")]
    pub similarity_path: String,

    /// TMDb API key
    pub tmdb_api_key: String,

    /// TMDb API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix joined with a poster path to build the image URL
    #[serde(default = "default_tmdb_image_base")]
    pub tmdb_image_base: String,

    /// Upper bound for a single metadata lookup, in milliseconds
    #[serde(default = "default_metadata_timeout_ms")]
    pub metadata_timeout_ms: u64,

    /// Redis connection URL. Posters are cached in-process when unset.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Minimum fuzzy score a title needs to resolve a query
    #[serde(default)]
    pub fuzzy_min_score: f64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_path() -> String {
    "data/catalog.json".to_string()
}

fn default_similarity_path() -> String {
    "data/similarity.json".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org".to_string()
}

fn default_tmdb_image_base() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_metadata_timeout_ms() -> u64 {
    3000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_millis(self.metadata_timeout_ms)
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
        let config: Config = envy::from_iter(vars(&[("TMDB_API_KEY", "secret")])).unwrap();

        assert_eq!(config.tmdb_api_key, "secret");
        assert_eq!(config.catalog_path, "data/catalog.json");
        assert_eq!(config.similarity_path, "data/similarity.json");
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org");
        assert_eq!(config.tmdb_image_base, "https://image.tmdb.org/t/p/w500");
        assert_eq!(config.metadata_timeout(), Duration::from_millis(3000));
        assert_eq!(config.redis_url, None);
        assert_eq!(config.fuzzy_min_score, 0.0);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_overrides() {
        let config: Config = envy::from_iter(vars(&[
            ("TMDB_API_KEY", "secret"),
            ("REDIS_URL", "redis://cache:6379"),
            ("FUZZY_MIN_SCORE", "0.6"),
            ("METADATA_TIMEOUT_MS", "500"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.fuzzy_min_score, 0.6);
        assert_eq!(config.metadata_timeout(), Duration::from_millis(500));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_missing_api_key_fails() {
        let result = envy::from_iter::<_, Config>(vars(&[("PORT", "8080")]));
        assert!(result.is_err());
    }
}
