//! Configuration management for Curator.
//!
//! Configuration is loaded from the first file found, then patched by
//! environment variables:
//! 1. Environment variables (highest priority)
//! 2. Project-local `curator.toml` file
//! 3. User config `~/.config/curator/config.toml`
//!
//! Unlike most settings, the source playlists and the OAuth client secrets
//! have no sensible default, so a missing config file is an error.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No config file found. Create curator.toml (see `curator init`).")]
    NotFound,

    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// What to curate.
    pub curation: CurationConfig,

    /// YouTube Data API configuration.
    pub youtube: YouTubeConfig,

    /// LLM provider configuration.
    pub llm: LLMConfig,

    /// Storage configuration.
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./curator.toml` (project local)
    /// 2. `~/.config/curator/config.toml` (user config)
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::from_file(DEFAULT_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("curator").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Err(ConfigError::NotFound)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&content)?;

        // Apply environment variable overrides
        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // LLM overrides
        if let Ok(provider) = std::env::var("CURATOR_LLM_PROVIDER") {
            self.llm.provider = provider;
        }
        if let Ok(model) = std::env::var("CURATOR_LLM_MODEL") {
            self.llm.model = Some(model);
        }
        if let Ok(url) = std::env::var("CURATOR_LLM_BASE_URL") {
            self.llm.base_url = Some(url);
        }
        if let Ok(key) = std::env::var("CURATOR_LLM_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Ok(tokens) = std::env::var("CURATOR_LLM_MAX_TOKENS") {
            if let Ok(n) = tokens.parse() {
                self.llm.max_tokens = Some(n);
            }
        }

        // Curation overrides
        if let Ok(count) = std::env::var("CURATOR_PLAYLIST_COUNT") {
            if let Ok(n) = count.parse() {
                self.curation.playlist_count = n;
            }
        }

        // Storage overrides
        if let Ok(dir) = std::env::var("CURATOR_DATA_DIR") {
            self.storage.data_dir = dir;
        }
    }

    /// Checks the values that have no usable default.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.curation.source_playlist_ids.is_empty() {
            return Err(ConfigError::Invalid(
                "curation.source_playlist_ids must list at least one playlist".to_string(),
            ));
        }
        if self.curation.playlist_count == 0 {
            return Err(ConfigError::Invalid(
                "curation.playlist_count must be at least 1".to_string(),
            ));
        }
        if self.youtube.batch_size == 0 || self.youtube.batch_size > MAX_BATCH_SIZE {
            return Err(ConfigError::Invalid(format!(
                "youtube.batch_size must be between 1 and {}, got {}",
                MAX_BATCH_SIZE, self.youtube.batch_size
            )));
        }
        if self.youtube.client_secrets_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "youtube.client_secrets_file is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let mut config = Config::default();
        config.curation.source_playlist_ids = vec!["PLxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx".to_string()];
        config.youtube.client_secrets_file = PathBuf::from("client_secret.json");
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// What to curate and how many playlists to ask for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CurationConfig {
    /// Playlists whose videos are pooled and regrouped.
    pub source_playlist_ids: Vec<String>,

    /// Exact number of themed playlists requested from the model.
    pub playlist_count: usize,
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            source_playlist_ids: Vec::new(),
            playlist_count: DEFAULT_PLAYLIST_COUNT,
        }
    }
}

/// YouTube Data API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeConfig {
    /// Google OAuth client secrets JSON (installed application).
    pub client_secrets_file: PathBuf,

    /// Token cache file name, relative to the data directory.
    pub token_file: String,

    /// API base URL.
    pub api_base_url: String,

    /// Video ids per metadata request.
    pub batch_size: usize,

    /// Entries per playlist page.
    pub page_size: u32,

    /// Privacy status for created playlists ("private", "unlisted", "public").
    pub privacy_status: String,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            client_secrets_file: PathBuf::new(),
            token_file: DEFAULT_TOKEN_FILE.to_string(),
            api_base_url: DEFAULT_YOUTUBE_API_URL.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            page_size: DEFAULT_PAGE_SIZE,
            privacy_status: DEFAULT_PRIVACY_STATUS.to_string(),
        }
    }
}

/// LLM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    /// Provider name: "gemini", "openai", "anthropic" or "ollama".
    pub provider: String,

    /// Model name (provider-specific).
    pub model: Option<String>,

    /// Base URL for API (for openai-compatible providers).
    pub base_url: Option<String>,

    /// API key (can also be set via environment variable).
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Maximum tokens for response; provider default when unset.
    pub max_tokens: Option<u32>,

    /// API version (for Anthropic).
    pub api_version: Option<String>,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_LLM_PROVIDER.to_string(),
            model: None,
            base_url: None,
            api_key: None,
            max_tokens: None,
            api_version: None,
        }
    }
}

impl LLMConfig {
    /// Get the model name, falling back to provider defaults.
    pub fn model_or_default(&self) -> String {
        self.model.clone().unwrap_or_else(|| match self.provider.as_str() {
            "anthropic" | "claude" => DEFAULT_ANTHROPIC_MODEL.to_string(),
            "ollama" => DEFAULT_OLLAMA_MODEL.to_string(),
            "openai" => DEFAULT_OPENAI_MODEL.to_string(),
            _ => DEFAULT_GEMINI_MODEL.to_string(),
        })
    }

    /// Get the base URL, falling back to provider defaults.
    pub fn base_url_or_default(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| match self.provider.as_str() {
            "anthropic" | "claude" => DEFAULT_ANTHROPIC_URL.to_string(),
            "ollama" => DEFAULT_OLLAMA_URL.to_string(),
            "openai" => DEFAULT_OPENAI_URL.to_string(),
            _ => DEFAULT_GEMINI_URL.to_string(),
        })
    }

    /// Get the output token limit, falling back to provider defaults.
    pub fn max_tokens_or_default(&self) -> u32 {
        self.max_tokens.unwrap_or_else(|| match self.provider.as_str() {
            "anthropic" | "claude" | "ollama" | "openai" | "openai-compatible" => {
                DEFAULT_MAX_TOKENS
            }
            _ => DEFAULT_GEMINI_MAX_TOKENS,
        })
    }

    /// Get API key from config or environment.
    pub fn api_key_or_env(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("CURATOR_LLM_API_KEY").ok())
            .or_else(|| match self.provider.as_str() {
                "anthropic" | "claude" => std::env::var("ANTHROPIC_API_KEY").ok(),
                "openai" => std::env::var("OPENAI_API_KEY").ok(),
                "ollama" => None,
                _ => std::env::var("GEMINI_API_KEY").ok(),
            })
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the state, cache and token files.
    pub data_dir: String,

    /// Run state file name.
    pub state_file: String,

    /// Video metadata cache file name.
    pub cache_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.to_string(),
            state_file: DEFAULT_STATE_FILE.to_string(),
            cache_file: DEFAULT_CACHE_FILE.to_string(),
        }
    }
}

impl StorageConfig {
    /// Full path to the run state file.
    pub fn state_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.state_file)
    }

    /// Full path to the video metadata cache.
    pub fn cache_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.cache_file)
    }

    /// Full path to a file stored alongside the snapshots.
    pub fn data_path(&self, file_name: &str) -> PathBuf {
        PathBuf::from(&self.data_dir).join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.curation.source_playlist_ids = vec!["PL1".to_string()];
        config.youtube.client_secrets_file = PathBuf::from("secrets.json");
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.curation.playlist_count, DEFAULT_PLAYLIST_COUNT);
        assert_eq!(config.youtube.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.llm.provider, DEFAULT_LLM_PROVIDER);
        assert_eq!(config.storage.state_file, DEFAULT_STATE_FILE);
    }

    #[test]
    fn test_validate_accepts_minimal_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_sources() {
        let mut config = valid_config();
        config.curation.source_playlist_ids.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_oversized_batch() {
        let mut config = valid_config();
        config.youtube.batch_size = 51;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.youtube.batch_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_max_tokens_defaults_per_provider() {
        let mut llm = LLMConfig::default();
        assert_eq!(llm.max_tokens_or_default(), DEFAULT_GEMINI_MAX_TOKENS);

        llm.provider = "anthropic".to_string();
        assert_eq!(llm.max_tokens_or_default(), DEFAULT_MAX_TOKENS);

        llm.max_tokens = Some(2048);
        assert_eq!(llm.max_tokens_or_default(), 2048);
    }

    #[test]
    fn test_storage_paths() {
        let storage = StorageConfig {
            data_dir: "/tmp/curator".to_string(),
            ..StorageConfig::default()
        };
        assert_eq!(
            storage.state_path(),
            PathBuf::from("/tmp/curator").join(DEFAULT_STATE_FILE)
        );
        assert_eq!(
            storage.cache_path(),
            PathBuf::from("/tmp/curator").join(DEFAULT_CACHE_FILE)
        );
    }
}
