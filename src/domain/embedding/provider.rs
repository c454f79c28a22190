//! Embedding provider trait definition

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::{EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

/// Trait for embedding providers (OpenAI-compatible endpoints, local models, etc.)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embeddings for the given input
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError>;

    fn provider_name(&self) -> &'static str;

    /// Model used when the caller does not configure one
    fn default_model(&self) -> &'static str;

    /// Get the embedding dimensions for a model
    fn dimensions(&self, model: &str) -> Option<usize>;
}

#[cfg(test)]
pub mod fixtures {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::domain::embedding::{Embedding, EmbeddingUsage};

    /// Deterministic provider returning fixed vectors for known texts.
    ///
    /// Unknown texts fail with a provider error, so a test that forgets to
    /// register a query sees a cache miss rather than a bogus vector.
    #[derive(Debug, Default)]
    pub struct StaticEmbeddingProvider {
        vectors: HashMap<String, Vec<f32>>,
        failing: bool,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl StaticEmbeddingProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
            self.vectors.insert(text.into(), vector);
            self
        }

        pub fn failing() -> Self {
            Self {
                failing: true,
                ..Self::default()
            }
        }

        /// Sleep before answering, to force interleaving between callers
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EmbeddingProvider for StaticEmbeddingProvider {
        async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if self.failing {
                return Err(DomainError::provider("static", "embedding backend unavailable"));
            }

            let text = request.input();
            let vector = self.vectors.get(text).cloned().ok_or_else(|| {
                DomainError::provider("static", format!("no vector for '{}'", text))
            })?;
            let embeddings = vec![Embedding::new(0, vector)];

            Ok(EmbeddingResponse::new(
                request.model().to_string(),
                embeddings,
                EmbeddingUsage::default(),
            ))
        }

        fn provider_name(&self) -> &'static str {
            "static"
        }

        fn default_model(&self) -> &'static str {
            "static-embedding"
        }

        fn dimensions(&self, _model: &str) -> Option<usize> {
            self.vectors.values().next().map(Vec::len)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_known_text_returns_vector() {
            let provider = StaticEmbeddingProvider::new().with_vector("mapo tofu", vec![1.0, 0.0]);

            let response = provider
                .embed(EmbeddingRequest::single("static-embedding", "mapo tofu"))
                .await
                .unwrap();

            assert_eq!(response.embeddings()[0].vector(), &[1.0, 0.0]);
            assert_eq!(provider.calls(), 1);
            assert_eq!(provider.dimensions("static-embedding"), Some(2));
        }

        #[tokio::test]
        async fn test_unknown_text_fails() {
            let provider = StaticEmbeddingProvider::new();

            let result = provider
                .embed(EmbeddingRequest::single("static-embedding", "kung pao chicken"))
                .await;

            assert!(result.is_err());
        }

        #[tokio::test]
        async fn test_failing_provider() {
            let provider = StaticEmbeddingProvider::failing();

            let result = provider
                .embed(EmbeddingRequest::single("static-embedding", "anything"))
                .await;

            assert!(matches!(result, Err(DomainError::Provider { .. })));
            assert_eq!(provider.calls(), 1);
        }
    }
}
