//! Typed error for the qa-session crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Errors from the underlying chunk-store crate (retrieval, ingestion,
    /// configuration).
    #[error("chunk store error: {0}")]
    Store(#[from] chunk_store::StoreError),

    /// Answer capability failure, carrying the provider message.
    #[error("generation error: {0}")]
    Generation(String),

    /// Generic IO if needed by future extensions.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
