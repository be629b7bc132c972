//! In-memory vector store.
//!
//! Collections live for the lifetime of the process, matching the
//! run-scoped usage of the seed pipeline: both neighbor collections are
//! rebuilt on every run and queried immediately.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{rank_top_k, QueryHit, StoreError, StoreResult, StoredEntry, VectorStore};

#[derive(Debug, Default)]
struct Collection {
    /// Entries in insertion order; upserts replace in place
    entries: Vec<StoredEntry>,
    dimension: Option<usize>,
}

impl Collection {
    fn upsert(&mut self, name: &str, incoming: Vec<StoredEntry>) -> StoreResult<()> {
        for entry in incoming {
            let expected = *self.dimension.get_or_insert(entry.embedding.len());
            if entry.embedding.len() != expected {
                return Err(StoreError::DimensionMismatch {
                    collection: name.to_string(),
                    expected,
                    actual: entry.embedding.len(),
                });
            }

            match self.entries.iter_mut().find(|e| e.entry.id == entry.entry.id) {
                Some(existing) => *existing = entry,
                None => self.entries.push(entry),
            }
        }
        Ok(())
    }
}

/// Process-lifetime vector store backed by a map of named collections.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn upsert(&self, collection: &str, entries: Vec<StoredEntry>) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .upsert(collection, entries)
    }

    async fn query(&self, collection: &str, probe: &[f32], k: usize) -> StoreResult<Vec<QueryHit>> {
        let collections = self.collections.read().await;
        let col = collections
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        Ok(rank_top_k(&col.entries, probe, k))
    }

    async fn count(&self, collection: &str) -> StoreResult<usize> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).map_or(0, |c| c.entries.len()))
    }
}
