//! Embedding response types

use serde::{Deserialize, Serialize};

/// A single embedding vector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    /// Index of this embedding in the batch
    index: usize,
    /// The embedding vector
    embedding: Vec<f32>,
}

impl Embedding {
    pub fn new(index: usize, embedding: Vec<f32>) -> Self {
        Self { index, embedding }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn vector(&self) -> &[f32] {
        &self.embedding
    }

    pub fn dimensions(&self) -> usize {
        self.embedding.len()
    }

    /// Consume and return the vector
    pub fn into_vector(self) -> Vec<f32> {
        self.embedding
    }
}

/// Cosine similarity between two vectors.
///
/// Returns `0.0` when either vector has zero norm, when the vectors are empty,
/// or when their dimensions differ. Accumulates in `f64` so that
/// `cosine_similarity(a, b) == cosine_similarity(b, a)` holds bit for bit.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum();
    let norm_a = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot_product / (norm_a * norm_b)) as f32
}

/// Usage statistics for embedding request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbeddingUsage {
    prompt_tokens: u32,
    total_tokens: u32,
}

impl EmbeddingUsage {
    pub fn new(prompt_tokens: u32, total_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            total_tokens,
        }
    }

    pub fn prompt_tokens(&self) -> u32 {
        self.prompt_tokens
    }

    pub fn total_tokens(&self) -> u32 {
        self.total_tokens
    }
}

/// Response from an embedding request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    model: String,
    data: Vec<Embedding>,
    usage: EmbeddingUsage,
}

impl EmbeddingResponse {
    pub fn new(model: String, data: Vec<Embedding>, usage: EmbeddingUsage) -> Self {
        Self { model, data, usage }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn embeddings(&self) -> &[Embedding] {
        &self.data
    }

    pub fn usage(&self) -> &EmbeddingUsage {
        &self.usage
    }

    /// Take the first vector, for single-input requests
    pub fn into_first_vector(self) -> Option<Vec<f32>> {
        self.data.into_iter().next().map(Embedding::into_vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![0.3, -1.2, 4.5, 0.01];

        let similarity = cosine_similarity(&a, &a);

        assert!((similarity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let similarity = cosine_similarity(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);

        assert!(similarity.abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let similarity = cosine_similarity(&[1.0, 0.0, 0.0], &[-1.0, 0.0, 0.0]);

        assert!((similarity + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_is_symmetric() {
        let pairs: [(&[f32], &[f32]); 3] = [
            (&[1.0, 2.0, 3.0], &[3.0, -2.0, 1.0]),
            (&[0.12, 0.98, -0.4], &[0.7, 0.7, 0.1]),
            (&[1e-3, 5.0, 2.5], &[4.0, 4.0, 4.0]),
        ];

        for (a, b) in pairs {
            assert_eq!(cosine_similarity(a, b), cosine_similarity(b, a));
        }
    }

    #[test]
    fn test_cosine_similarity_zero_norm() {
        let zero = vec![0.0, 0.0, 0.0];
        let other = vec![1.0, 2.0, 3.0];

        assert_eq!(cosine_similarity(&zero, &other), 0.0);
        assert_eq!(cosine_similarity(&other, &zero), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn test_cosine_similarity_empty() {
        let empty: Vec<f32> = vec![];

        assert_eq!(cosine_similarity(&empty, &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&empty, &empty), 0.0);
    }

    #[test]
    fn test_cosine_similarity_different_lengths() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_into_first_vector() {
        let response = EmbeddingResponse::new(
            "test-model".into(),
            vec![
                Embedding::new(0, vec![0.1, 0.2]),
                Embedding::new(1, vec![0.3, 0.4]),
            ],
            EmbeddingUsage::new(10, 10),
        );

        assert_eq!(response.model(), "test-model");
        assert_eq!(response.usage().total_tokens(), 10);
        assert_eq!(response.into_first_vector(), Some(vec![0.1, 0.2]));
    }

    #[test]
    fn test_into_first_vector_empty() {
        let response = EmbeddingResponse::new("m".into(), vec![], EmbeddingUsage::default());

        assert!(response.into_first_vector().is_none());
    }
}
