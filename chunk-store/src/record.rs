//! Core data models used by the library.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Provenance metadata carried by every chunk.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChunkMeta {
    /// Source identifier (file name, URL, logical document id).
    pub source: String,
    /// Free-form tags attached at ingestion time.
    #[serde(default)]
    pub extra: BTreeMap<String, Value>,
}

impl ChunkMeta {
    /// Metadata with a source identifier and no extra tags.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            extra: BTreeMap::new(),
        }
    }
}

/// A stored knowledge chunk. Immutable once created; duplicates are allowed
/// (re-ingesting the same content creates new chunks).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    pub meta: ChunkMeta,
}

/// A single retrieval hit with score, content and source.
#[derive(Clone, Debug)]
pub struct ChunkHit {
    /// Cosine similarity against the query vector.
    pub score: f32,
    pub content: String,
    pub source: String,
}
