use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// SQLite database connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// TMDb API key
    pub tmdb_api_key: String,

    /// TMDb API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL for poster images
    #[serde(default = "default_tmdb_image_base_url")]
    pub tmdb_image_base_url: String,

    /// Catalog response language
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Release region for discovery queries
    #[serde(default = "default_tmdb_region")]
    pub tmdb_region: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Session lifetime in seconds
    #[serde(default = "default_session_ttl_seconds")]
    pub session_ttl_seconds: i64,

    /// Minimum vote count for the recommendation scorer
    #[serde(default = "default_min_mood_votes")]
    pub min_mood_votes: i64,
}

fn default_database_url() -> String {
    "sqlite://cinemood.db?mode=rwc".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_tmdb_region() -> String {
    "US".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_session_ttl_seconds() -> i64 {
    60 * 60 * 24 * 30
}

fn default_min_mood_votes() -> i64 {
    1
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
