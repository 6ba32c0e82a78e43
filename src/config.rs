//! Configuration types for newswire

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Query pipeline settings (search API fetch behavior)
///
/// Groups settings related to how the article search request is performed.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Connect timeout in seconds for the search request (default: 15)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Read deadline in seconds for the search request (default: 10)
    ///
    /// Applied as the total request timeout; a server that accepts the
    /// connection but stalls on the body is cut off after this long.
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
}

impl QueryConfig {
    /// Connect timeout as a [`Duration`]
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Read deadline as a [`Duration`]
    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
        }
    }
}

/// Image pipeline settings (thumbnail fetching and caching)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Maximum total decoded-image bytes held in the cache (default: 8 MiB)
    ///
    /// Accounting uses the decoded pixel byte count, not the encoded file
    /// size, since memory pressure is driven by the decoded representation.
    #[serde(default = "default_cache_capacity_bytes")]
    pub cache_capacity_bytes: usize,

    /// Total timeout in seconds for one thumbnail download (default: 30)
    #[serde(default = "default_image_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl ImageConfig {
    /// Thumbnail fetch timeout as a [`Duration`]
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            cache_capacity_bytes: default_cache_capacity_bytes(),
            fetch_timeout_secs: default_image_fetch_timeout_secs(),
        }
    }
}

/// Main configuration for the newswire pipelines
///
/// Sub-config fields are flattened for serialization, so the JSON/TOML
/// format stays flat (no nesting). All fields have sensible defaults;
/// `Config::default()` works out of the box.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Search query fetch settings
    #[serde(flatten)]
    pub query: QueryConfig,

    /// Thumbnail fetch and cache settings
    #[serde(flatten)]
    pub image: ImageConfig,

    /// User-Agent header sent with outbound requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            query: QueryConfig::default(),
            image: ImageConfig::default(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_connect_timeout_secs() -> u64 {
    15
}

fn default_read_timeout_secs() -> u64 {
    10
}

fn default_cache_capacity_bytes() -> usize {
    8 * 1024 * 1024
}

fn default_image_fetch_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("newswire/", env!("CARGO_PKG_VERSION")).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.query.connect_timeout_secs, 15);
        assert_eq!(config.query.read_timeout_secs, 10);
        assert_eq!(config.image.cache_capacity_bytes, 8 * 1024 * 1024);
        assert_eq!(config.image.fetch_timeout_secs, 30);
        assert!(config.user_agent.starts_with("newswire/"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"cache_capacity_bytes": 1024}"#).unwrap();
        assert_eq!(config.image.cache_capacity_bytes, 1024);
        assert_eq!(config.query.connect_timeout_secs, 15);
        assert_eq!(config.query.read_timeout_secs, 10);
    }

    #[test]
    fn test_flattened_serialization() {
        let json = serde_json::to_value(Config::default()).unwrap();
        // Sub-configs serialize flat, not nested
        assert!(json.get("connect_timeout_secs").is_some());
        assert!(json.get("query").is_none());
        assert!(json.get("image").is_none());
    }

    #[test]
    fn test_duration_accessors() {
        let config = Config::default();
        assert_eq!(config.query.connect_timeout(), Duration::from_secs(15));
        assert_eq!(config.query.read_timeout(), Duration::from_secs(10));
        assert_eq!(config.image.fetch_timeout(), Duration::from_secs(30));
    }
}
