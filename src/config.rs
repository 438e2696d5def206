use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Address to bind the HTTP server to (default: 0.0.0.0:3000)
    #[serde(default = "Config::default_bind_addr")]
    pub bind_addr: String,
    /// Path to the station directory JSON export
    #[serde(default = "Config::default_stations_file")]
    pub stations_file: String,
    /// Allowed CORS origins. Required unless cors_permissive is true.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Explicitly allow all origins (development only). Defaults to false.
    #[serde(default)]
    pub cors_permissive: bool,
    /// Upstream feed fetch configuration
    #[serde(default)]
    pub feeds: FeedConfig,
}

/// Configuration for upstream GTFS-RT feed fetching
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Per-bundle fetch timeout in seconds (default: 10)
    #[serde(default = "FeedConfig::default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// How long a fetched bundle may be served from cache, in seconds
    /// (default: 10; 0 disables caching and re-fetches on every request)
    #[serde(default = "FeedConfig::default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: Self::default_fetch_timeout_secs(),
            cache_ttl_secs: Self::default_cache_ttl_secs(),
        }
    }
}

impl FeedConfig {
    fn default_fetch_timeout_secs() -> u64 {
        10
    }
    fn default_cache_ttl_secs() -> u64 {
        10
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    fn default_bind_addr() -> String {
        "0.0.0.0:3000".to_string()
    }
    fn default_stations_file() -> String {
        "data/stations.json".to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse config: {0}")]
    ParseError(String),
}
