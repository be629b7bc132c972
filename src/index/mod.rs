//! Indexing and querying of paper collections.
//!
//! [`PaperIndex`] is the explicit context object tying an embedding
//! provider to a vector store. It is constructed once at process start
//! and passed by reference to whatever needs it; there are no global
//! client or collection handles.

use thiserror::Error;
use tracing::info;

use crate::embedding::{normalize_text, EmbeddingProvider};
use crate::models::{IndexEntry, PaperRecord};
use crate::store::{QueryHit, StoredEntry, VectorStore};

/// Collection holding papers published before the seed.
pub const BEFORE_COLLECTION: &str = "before_papers";

/// Collection holding papers published after the seed.
pub const AFTER_COLLECTION: &str = "after_papers";

/// Errors that can occur while indexing or querying.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Embedding generation failed
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Store access failed
    #[error("store error: {0}")]
    Store(String),
}

/// Result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Statistics from one indexing run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    /// Entries embedded and upserted
    pub indexed: usize,
}

/// Embedding provider + vector store, wired together for paper batches.
pub struct PaperIndex<E, S>
where
    E: EmbeddingProvider,
    S: VectorStore,
{
    embedder: E,
    store: S,
}

impl<E, S> PaperIndex<E, S>
where
    E: EmbeddingProvider,
    S: VectorStore,
{
    pub fn new(embedder: E, store: S) -> Self {
        Self { embedder, store }
    }

    /// Derive index entries from the records, embed their documents in
    /// one batch, and bulk-upsert them into the named collection.
    ///
    /// Documents are normalized before embedding; the stored document
    /// text keeps its original casing for display.
    ///
    /// # Errors
    /// Returns [`IndexError::Embedding`] or [`IndexError::Store`] when
    /// the respective collaborator fails.
    pub async fn index(
        &self,
        collection: &str,
        records: &[PaperRecord],
    ) -> IndexResult<IndexStats> {
        if records.is_empty() {
            return Ok(IndexStats::default());
        }

        let entries: Vec<IndexEntry> = records.iter().map(IndexEntry::from).collect();

        let normalized: Vec<String> = entries.iter().map(|e| normalize_text(&e.document)).collect();
        let inputs: Vec<&str> = normalized.iter().map(String::as_str).collect();
        let embeddings = self
            .embedder
            .embed_batch(&inputs)
            .await
            .map_err(|e| IndexError::Embedding(e.to_string()))?;

        let stored: Vec<StoredEntry> = entries
            .into_iter()
            .zip(embeddings)
            .map(|(entry, embedding)| StoredEntry { entry, embedding })
            .collect();

        let indexed = stored.len();
        self.store
            .upsert(collection, stored)
            .await
            .map_err(|e| IndexError::Store(e.to_string()))?;

        info!(collection, indexed, "indexed paper batch");
        Ok(IndexStats { indexed })
    }

    /// Embed `probe_text` and return the top `k` hits from the named
    /// collection, best first.
    pub async fn query_top_k(
        &self,
        collection: &str,
        probe_text: &str,
        k: usize,
    ) -> IndexResult<Vec<QueryHit>> {
        let probe = self
            .embedder
            .embed(&normalize_text(probe_text))
            .await
            .map_err(|e| IndexError::Embedding(e.to_string()))?;

        self.store
            .query(collection, &probe, k)
            .await
            .map_err(|e| IndexError::Store(e.to_string()))
    }

    /// Number of entries in a collection.
    pub async fn count(&self, collection: &str) -> IndexResult<usize> {
        self.store
            .count(collection)
            .await
            .map_err(|e| IndexError::Store(e.to_string()))
    }
}
