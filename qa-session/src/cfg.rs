//! Runtime configuration loaded from environment variables.

use chunk_store::{IngestOptions, StoreConfig};

use crate::history;

/// Config bag for a session. All fields have defaults via [`SessionConfig::from_env`].
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Chunks retrieved per query.
    pub top_k: usize,
    /// Turns included in the prompt history block.
    pub history_turns: usize,
    /// Turns retained before FIFO eviction.
    pub log_capacity: usize,

    // Ingestion knobs
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub embed_concurrency: usize,

    /// Pinned embedding dimension, if the deployment fixes one.
    pub embedding_dim: Option<usize>,
    /// Char budget for the prompt's context block.
    pub max_ctx_chars: usize,
}

impl SessionConfig {
    /// Build from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self {
            top_k: parse("RETRIEVAL_TOP_K", 3usize),
            history_turns: parse("HISTORY_TURNS", 3usize),
            log_capacity: parse("LOG_CAPACITY", history::DEFAULT_CAPACITY),
            chunk_size: parse("CHUNK_SIZE", 500usize),
            chunk_overlap: parse("CHUNK_OVERLAP", 50usize),
            embed_concurrency: parse("EMBEDDING_CONCURRENCY", 4usize),
            embedding_dim: std::env::var("EMBEDDING_DIM")
                .ok()
                .and_then(|s| s.parse::<usize>().ok()),
            max_ctx_chars: parse("MAX_CTX_CHARS", 6000usize),
        }
    }

    /// Convert to a `chunk_store::StoreConfig`.
    pub fn make_store_config(&self) -> StoreConfig {
        StoreConfig {
            embedding_dim: self.embedding_dim,
            embed_concurrency: self.embed_concurrency,
        }
    }

    /// Convert to `chunk_store::IngestOptions`.
    pub fn make_ingest_options(&self) -> IngestOptions {
        IngestOptions {
            chunk_size: self.chunk_size,
            overlap: self.chunk_overlap,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            history_turns: 3,
            log_capacity: history::DEFAULT_CAPACITY,
            chunk_size: 500,
            chunk_overlap: 50,
            embed_concurrency: 4,
            embedding_dim: None,
            max_ctx_chars: 6000,
        }
    }
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(dflt)
}
