//! Session cache configuration

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Tuning knobs for the per-session semantic cache and context window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCacheConfig {
    /// Minimum cosine similarity for a cache hit (0.0 to 1.0)
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Maximum cached query/response pairs per session
    #[serde(default = "default_max_session_cache_size")]
    pub max_session_cache_size: usize,

    /// Maximum conversation turns kept per session
    #[serde(default = "default_max_context_length")]
    pub max_context_length: usize,

    /// Number of most recent turns rendered into an enhanced query
    #[serde(default = "default_context_window_turns")]
    pub context_window_turns: usize,

    /// Characters of each previous answer included in an enhanced query
    #[serde(default = "default_response_preview_chars")]
    pub response_preview_chars: usize,

    /// Embedding model requested from the provider; empty uses the provider's default
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Shortened vector size for models that support it
    #[serde(default)]
    pub embedding_dimensions: Option<usize>,
}

fn default_similarity_threshold() -> f32 {
    0.75
}

fn default_max_session_cache_size() -> usize {
    50
}

fn default_max_context_length() -> usize {
    10
}

fn default_context_window_turns() -> usize {
    3
}

fn default_response_preview_chars() -> usize {
    100
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

impl Default for SessionCacheConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            max_session_cache_size: default_max_session_cache_size(),
            max_context_length: default_max_context_length(),
            context_window_turns: default_context_window_turns(),
            response_preview_chars: default_response_preview_chars(),
            embedding_model: default_embedding_model(),
            embedding_dimensions: None,
        }
    }
}

impl SessionCacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_max_session_cache_size(mut self, max: usize) -> Self {
        self.max_session_cache_size = max;
        self
    }

    pub fn with_max_context_length(mut self, max: usize) -> Self {
        self.max_context_length = max;
        self
    }

    pub fn with_context_window_turns(mut self, turns: usize) -> Self {
        self.context_window_turns = turns;
        self
    }

    pub fn with_response_preview_chars(mut self, chars: usize) -> Self {
        self.response_preview_chars = chars;
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn with_embedding_dimensions(mut self, dimensions: usize) -> Self {
        self.embedding_dimensions = Some(dimensions);
        self
    }

    /// Reject settings that would make a store unable to hold anything
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_session_cache_size == 0 {
            return Err(DomainError::configuration(
                "max_session_cache_size must be greater than 0",
            ));
        }

        if self.max_context_length == 0 {
            return Err(DomainError::configuration(
                "max_context_length must be greater than 0",
            ));
        }

        if self.embedding_dimensions == Some(0) {
            return Err(DomainError::configuration(
                "embedding_dimensions must be greater than 0",
            ));
        }

        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(DomainError::configuration(format!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionCacheConfig::default();

        assert!((config.similarity_threshold - 0.75).abs() < f32::EPSILON);
        assert_eq!(config.max_session_cache_size, 50);
        assert_eq!(config.max_context_length, 10);
        assert_eq!(config.context_window_turns, 3);
        assert_eq!(config.response_preview_chars, 100);
        assert_eq!(config.embedding_model, "text-embedding-3-small");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = SessionCacheConfig::new()
            .with_similarity_threshold(0.9)
            .with_max_session_cache_size(5)
            .with_max_context_length(4)
            .with_context_window_turns(2)
            .with_response_preview_chars(20)
            .with_embedding_model("bge-small-zh");

        assert!((config.similarity_threshold - 0.9).abs() < f32::EPSILON);
        assert_eq!(config.max_session_cache_size, 5);
        assert_eq!(config.max_context_length, 4);
        assert_eq!(config.context_window_turns, 2);
        assert_eq!(config.response_preview_chars, 20);
        assert_eq!(config.embedding_model, "bge-small-zh");
        assert_eq!(config.embedding_dimensions, None);
    }

    #[test]
    fn test_validate_rejects_zero_dimensions() {
        let config = SessionCacheConfig::new().with_embedding_dimensions(0);

        assert!(config.validate().is_err());
        assert!(SessionCacheConfig::new()
            .with_embedding_dimensions(256)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_similarity_threshold_clamped() {
        let config = SessionCacheConfig::new().with_similarity_threshold(1.5);
        assert!((config.similarity_threshold - 1.0).abs() < f32::EPSILON);

        let config = SessionCacheConfig::new().with_similarity_threshold(-0.5);
        assert!(config.similarity_threshold.abs() < f32::EPSILON);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = SessionCacheConfig::new().with_max_session_cache_size(0);
        assert!(matches!(
            config.validate(),
            Err(DomainError::Configuration { .. })
        ));

        let config = SessionCacheConfig::new().with_max_context_length(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_threshold() {
        let mut config = SessionCacheConfig::new();
        config.similarity_threshold = 1.2;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: SessionCacheConfig =
            serde_json::from_str(r#"{"max_session_cache_size": 8}"#).unwrap();

        assert_eq!(config.max_session_cache_size, 8);
        assert_eq!(config.max_context_length, 10);
    }
}
