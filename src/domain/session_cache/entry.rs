//! Cached entries and conversation turns

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A cached answer together with the embedding of the question that produced it.
///
/// The embedding is a constructor argument, so an entry cannot exist without one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    query: String,
    response: String,
    embedding: Vec<f32>,
    inserted_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(query: impl Into<String>, response: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            query: query.into(),
            response: response.into(),
            embedding,
            inserted_at: Utc::now(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    pub fn inserted_at(&self) -> DateTime<Utc> {
        self.inserted_at
    }
}

/// One question/answer exchange in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextTurn {
    pub query: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

impl ContextTurn {
    pub fn new(query: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            response: response.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A successful semantic cache lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheHit {
    /// The stored answer
    pub response: String,
    /// The previously asked question that matched
    pub matched_query: String,
    /// Cosine similarity between the new and the matched question
    pub similarity: f32,
}
