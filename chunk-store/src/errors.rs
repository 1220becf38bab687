//! Unified error types for the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for chunk-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O or filesystem errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid chunking parameters (rejected before any other work).
    #[error("invalid chunking: {0}")]
    InvalidChunking(String),

    /// Invalid or unsupported store configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Mismatch in vector dimensionality across chunks.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// Missing embedding and no provider available.
    #[error("missing embedding and no provider supplied")]
    MissingEmbedding,

    /// Embedding capability failure (wrapped provider message).
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Knowledge source file does not exist.
    #[error("knowledge file not found: {0}")]
    FileNotFound(PathBuf),
}
