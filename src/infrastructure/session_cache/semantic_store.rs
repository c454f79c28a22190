//! Per-session semantic cache using linear search

use indexmap::IndexMap;

use crate::domain::cosine_similarity;
use crate::domain::session_cache::{CacheEntry, CacheHit};

const PREALLOCATED_ENTRIES: usize = 64;

/// Bounded cache of answered questions for one session.
///
/// Entries are keyed by the literal question text and kept in insertion
/// order; when full, the oldest-inserted entry is evicted (FIFO, reads do
/// not refresh an entry's position).
#[derive(Debug)]
pub struct SemanticCacheStore {
    entries: IndexMap<String, CacheEntry>,
    max_entries: usize,
}

impl SemanticCacheStore {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(max_entries.min(PREALLOCATED_ENTRIES)),
            max_entries,
        }
    }

    /// Find the most similar entry at or above `threshold`.
    ///
    /// Only positive scores count, so a zero threshold still ignores
    /// orthogonal, zero-norm and mismatched vectors. NaN never qualifies.
    ///
    /// A later entry only displaces the current best with a strictly higher
    /// score, so on exact ties the earliest inserted entry wins.
    pub fn find_best(&self, embedding: &[f32], threshold: f32) -> Option<CacheHit> {
        let mut best: Option<(f32, &CacheEntry)> = None;

        for entry in self.entries.values() {
            let similarity = cosine_similarity(embedding, entry.embedding());

            let qualifies = similarity >= threshold && similarity > 0.0;
            if !qualifies {
                continue;
            }

            if best.is_none_or(|(best_similarity, _)| similarity > best_similarity) {
                best = Some((similarity, entry));
            }
        }

        best.map(|(similarity, entry)| CacheHit {
            response: entry.response().to_string(),
            matched_query: entry.query().to_string(),
            similarity,
        })
    }

    /// Insert an entry, returning the entry evicted to make room, if any.
    ///
    /// Re-inserting an existing question replaces it in place and keeps its
    /// position in the eviction order.
    pub fn insert(&mut self, entry: CacheEntry) -> Option<CacheEntry> {
        if let Some(existing) = self.entries.get_mut(entry.query()) {
            *existing = entry;
            return None;
        }

        let evicted = if self.entries.len() >= self.max_entries {
            self.entries.shift_remove_index(0).map(|(_, oldest)| oldest)
        } else {
            None
        };

        self.entries.insert(entry.query().to_string(), entry);

        evicted
    }

    pub fn get(&self, query: &str) -> Option<&CacheEntry> {
        self.entries.get(query)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached questions, oldest first
    pub fn queries(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
