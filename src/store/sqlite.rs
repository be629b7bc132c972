//! SQLite-backed vector store.
//!
//! Persists collections across runs. Embeddings are stored as
//! little-endian f32 BLOBs; metadata as JSON text. Queries load the
//! collection's rows and rank them in memory, which is adequate for the
//! neighbor-set sizes this system works with (tens of entries).

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use super::{rank_top_k, QueryHit, StoreError, StoreResult, StoredEntry, VectorStore};
use crate::models::{EntryMetadata, IndexEntry};

/// Vector store persisted in a SQLite database.
///
/// `rusqlite::Connection` is not `Sync`, so the connection lives behind a
/// mutex; statements are short-lived and run to completion while held.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path).map_err(|e| StoreError::Backend(e.to_string()))?;
        Self::with_connection(conn)
    }

    /// Open a transient in-memory store (used by tests).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Backend(e.to_string()))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS collections (
                 id        INTEGER PRIMARY KEY,
                 name      TEXT NOT NULL UNIQUE,
                 dimension INTEGER
             );
             CREATE TABLE IF NOT EXISTS entries (
                 collection_id INTEGER NOT NULL REFERENCES collections(id),
                 id            TEXT NOT NULL,
                 document      TEXT NOT NULL,
                 metadata      TEXT NOT NULL,
                 embedding     BLOB NOT NULL,
                 PRIMARY KEY (collection_id, id)
             );",
        )
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Backend("connection mutex poisoned".to_string()))
    }

    fn collection_id(conn: &Connection, name: &str) -> StoreResult<Option<(i64, Option<usize>)>> {
        conn.query_row(
            "SELECT id, dimension FROM collections WHERE name = ?1",
            params![name],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Option<i64>>(1)?.map(|d| d as usize),
                ))
            },
        )
        .optional()
        .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

/// Serialize an embedding to little-endian f32 bytes for BLOB storage.
fn serialize_embedding(embedding: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(embedding.len() * 4);
    for value in embedding {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Deserialize an embedding from BLOB bytes.
fn deserialize_embedding(bytes: &[u8]) -> StoreResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(StoreError::Backend(format!(
            "embedding blob length {} is not a multiple of 4",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

#[async_trait]
impl VectorStore for SqliteStore {
    async fn upsert(&self, collection: &str, entries: Vec<StoredEntry>) -> StoreResult<()> {
        let conn = self.lock()?;

        let (col_id, mut dimension) = match Self::collection_id(&conn, collection)? {
            Some(found) => found,
            None => {
                conn.execute(
                    "INSERT INTO collections (name) VALUES (?1)",
                    params![collection],
                )
                .map_err(|e| StoreError::Backend(e.to_string()))?;
                (conn.last_insert_rowid(), None)
            }
        };

        for entry in &entries {
            let expected = *dimension.get_or_insert(entry.embedding.len());
            if entry.embedding.len() != expected {
                return Err(StoreError::DimensionMismatch {
                    collection: collection.to_string(),
                    expected,
                    actual: entry.embedding.len(),
                });
            }

            let metadata = serde_json::to_string(&entry.entry.metadata)
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            conn.execute(
                "INSERT OR REPLACE INTO entries
                     (collection_id, id, document, metadata, embedding)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    col_id,
                    entry.entry.id,
                    entry.entry.document,
                    metadata,
                    serialize_embedding(&entry.embedding),
                ],
            )
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        }

        conn.execute(
            "UPDATE collections SET dimension = ?1 WHERE id = ?2",
            params![dimension.map(|d| d as i64), col_id],
        )
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn query(&self, collection: &str, probe: &[f32], k: usize) -> StoreResult<Vec<QueryHit>> {
        let conn = self.lock()?;

        let (col_id, _) = Self::collection_id(&conn, collection)?
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT id, document, metadata, embedding
                 FROM entries WHERE collection_id = ?1 ORDER BY rowid",
            )
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let rows = stmt
            .query_map(params![col_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Vec<u8>>(3)?,
                ))
            })
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, document, metadata_json, blob) =
                row.map_err(|e| StoreError::Backend(e.to_string()))?;
            let metadata: EntryMetadata = serde_json::from_str(&metadata_json)
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            entries.push(StoredEntry {
                entry: IndexEntry {
                    id,
                    document,
                    metadata,
                },
                embedding: deserialize_embedding(&blob)?,
            });
        }

        Ok(rank_top_k(&entries, probe, k))
    }

    async fn count(&self, collection: &str) -> StoreResult<usize> {
        let conn = self.lock()?;
        let Some((col_id, _)) = Self::collection_id(&conn, collection)? else {
            return Ok(0);
        };
        conn.query_row(
            "SELECT COUNT(*) FROM entries WHERE collection_id = ?1",
            params![col_id],
            |row| row.get::<_, i64>(0),
        )
        .map(|n| n as usize)
        .map_err(|e| StoreError::Backend(e.to_string()))
    }
}
