use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::session_cache::SessionCacheConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub embedding: EmbeddingSettings,
    #[serde(default)]
    pub session_cache: SessionCacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Where query embeddings are computed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    /// Base URL of an OpenAI-compatible `/v1/embeddings` endpoint
    #[serde(default = "default_embedding_base_url")]
    pub base_url: String,
    /// Empty for servers that take no key
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_embedding_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_embedding_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_embedding_timeout_secs() -> u64 {
    30
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            base_url: default_embedding_base_url(),
            api_key: String::new(),
            timeout_secs: default_embedding_timeout_secs(),
        }
    }
}

impl EmbeddingSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Layered load: `config/default`, `config/local`, then `APP__*` environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load a single explicit file, still allowing environment overrides
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Copy safe to print: the embedding API key is masked
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();

        if !copy.embedding.api_key.is_empty() {
            copy.embedding.api_key = "***".to_string();
        }

        copy
    }
}
