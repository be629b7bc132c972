//! Vector store abstraction and implementations.
//!
//! A store holds named collections of embedded documents. Collections are
//! created on first upsert; within a collection, entry ids are unique and
//! a repeated id overwrites the previous entry, so re-indexing the same
//! batch never grows query results.
//!
//! Two backends are provided: an in-process [`memory::MemoryStore`] whose
//! contents live for one run, and a [`sqlite::SqliteStore`] that persists
//! collections across runs.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{EntryMetadata, IndexEntry};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Query against a collection that was never created
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    /// Embedding length differs from the collection's dimension
    #[error("dimension mismatch in collection {collection}: expected {expected}, got {actual}")]
    DimensionMismatch {
        collection: String,
        expected: usize,
        actual: usize,
    },

    /// Backend failure (database, serialization)
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// An [`IndexEntry`] together with its embedding, as held by a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEntry {
    pub entry: IndexEntry,
    pub embedding: Vec<f32>,
}

/// One query hit: the stored document text and its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryHit {
    pub document: String,
    pub metadata: EntryMetadata,
}

/// Trait for similarity-searchable collection stores.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Bulk-upsert entries into a named collection, creating the
    /// collection if it does not exist. Entries carrying an id already
    /// present in the collection replace the previous entry.
    ///
    /// # Errors
    /// Returns [`StoreError::DimensionMismatch`] when an embedding's
    /// length differs from the collection's established dimension.
    async fn upsert(&self, collection: &str, entries: Vec<StoredEntry>) -> StoreResult<()>;

    /// Return the top `k` entries of a collection ranked by cosine
    /// similarity to the probe embedding, best first. Fewer than `k` hits
    /// are returned when the collection is smaller than `k`.
    ///
    /// # Errors
    /// Returns [`StoreError::UnknownCollection`] when the collection was
    /// never created.
    async fn query(&self, collection: &str, probe: &[f32], k: usize) -> StoreResult<Vec<QueryHit>>;

    /// Number of entries currently in a collection (0 when it was never
    /// created).
    async fn count(&self, collection: &str) -> StoreResult<usize>;
}

/// Cosine similarity between two equal-length vectors.
///
/// Returns 0.0 when either vector has zero magnitude; the ranking treats
/// such vectors as maximally dissimilar rather than failing the query.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have the same length");

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Rank stored entries against a probe and return the top `k` hits.
///
/// Shared by backends that hold all entries of a collection in memory at
/// query time. Ties keep insertion order (stable sort).
pub(crate) fn rank_top_k(entries: &[StoredEntry], probe: &[f32], k: usize) -> Vec<QueryHit> {
    let mut scored: Vec<(f32, &StoredEntry)> = entries
        .iter()
        .map(|e| (cosine_similarity(probe, &e.embedding), e))
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);

    scored
        .into_iter()
        .map(|(_, e)| QueryHit {
            document: e.entry.document.clone(),
            metadata: e.entry.metadata.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);

        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);

        let a = vec![1.0, 1.0];
        let b = vec![1.0, 1.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_magnitude_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
