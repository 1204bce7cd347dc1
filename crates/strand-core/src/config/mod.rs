//! Configuration management for Strand.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `strand.toml` file
//! 3. User config `~/.config/strand/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset location and derived-field settings.
    pub dataset: DatasetConfig,

    /// Relevance ranking configuration.
    pub search: SearchConfig,

    /// Neighborhood traversal configuration.
    pub traversal: TraversalConfig,

    /// Local JSON API configuration.
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./strand.toml` (project local)
    /// 2. `~/.config/strand/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::from_file(DEFAULT_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(DEFAULT_CONFIG_DIR).join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("STRAND_DATASET") {
            self.dataset.path = PathBuf::from(path);
        }
        if let Ok(url) = std::env::var("STRAND_BASE_URL") {
            self.dataset.base_url = Some(url);
        }
        if let Ok(limit) = std::env::var("STRAND_SEARCH_LIMIT") {
            if let Ok(n) = limit.parse() {
                self.search.default_limit = n;
            }
        }
        if let Ok(host) = std::env::var("STRAND_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("STRAND_PORT") {
            if let Ok(n) = port.parse() {
                self.server.port = n;
            }
        }
    }

    /// Reject settings that would make ranking or snippets meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let search = &self.search;
        if search.k1.is_nan() || search.k1 <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "search.k1 must be positive, got {}",
                search.k1
            )));
        }
        if !(0.0..=1.0).contains(&search.b) {
            return Err(ConfigError::Invalid(format!(
                "search.b must be within [0, 1], got {}",
                search.b
            )));
        }
        if search.title_boost.is_nan() || search.title_boost < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "search.title_boost must not be negative, got {}",
                search.title_boost
            )));
        }
        if search.score_precision > MAX_SCORE_PRECISION {
            return Err(ConfigError::Invalid(format!(
                "search.score_precision must be at most {}, got {}",
                MAX_SCORE_PRECISION, search.score_precision
            )));
        }
        if search.snippet_length == 0 {
            return Err(ConfigError::Invalid(
                "search.snippet_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Dataset configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Path to the dataset file (JSON or YAML).
    pub path: PathBuf,

    /// Base URL used to derive each node's `url` as `<base_url>/<uid>`.
    pub base_url: Option<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATASET_PATH),
            base_url: None,
        }
    }
}

/// BM25 ranking and snippet configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Term-frequency saturation parameter.
    pub k1: f64,

    /// Length normalization parameter.
    pub b: f64,

    /// Flat idf multiplier added when a query term appears in the title.
    pub title_boost: f64,

    /// Maximum snippet length in characters.
    pub snippet_length: usize,

    /// Result limit when the caller does not give one.
    pub default_limit: usize,

    /// Decimal places kept in reported scores.
    pub score_precision: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            k1: DEFAULT_BM25_K1,
            b: DEFAULT_BM25_B,
            title_boost: DEFAULT_TITLE_BOOST,
            snippet_length: DEFAULT_SNIPPET_LENGTH,
            default_limit: DEFAULT_SEARCH_LIMIT,
            score_precision: DEFAULT_SCORE_PRECISION,
        }
    }
}

/// Traversal configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    /// Neighborhood radius used when the caller does not give one.
    pub default_depth: usize,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            default_depth: DEFAULT_NEIGHBORHOOD_DEPTH,
        }
    }
}

/// JSON API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,

    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
        }
    }
}
