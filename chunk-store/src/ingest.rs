//! Knowledge ingestion: split raw text into overlapping chunks and feed them
//! to the store.
//!
//! File reading uses `std::fs`; the async boundary is the embedding step
//! inside [`ChunkStore::add`].

use std::path::Path;

use tracing::{debug, info};

use crate::ChunkStore;
use crate::embed::EmbeddingsProvider;
use crate::errors::StoreError;
use crate::record::ChunkMeta;
use crate::splitter::split_text;

/// Chunking knobs for ingestion.
#[derive(Clone, Copy, Debug)]
pub struct IngestOptions {
    /// Window width in characters.
    pub chunk_size: usize,
    /// Characters shared between consecutive windows.
    pub overlap: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 50,
        }
    }
}

/// Splits `text` and adds the resulting chunks under `source`.
///
/// Returns the number of chunks added. The underlying add is all-or-nothing:
/// an embedding failure leaves the store unchanged.
///
/// # Errors
/// - [`StoreError::InvalidChunking`] for bad options (before any store work)
/// - embedding failures from [`ChunkStore::add`]
pub async fn ingest_text(
    store: &mut ChunkStore,
    text: &str,
    source: &str,
    opts: &IngestOptions,
    provider: &dyn EmbeddingsProvider,
) -> Result<usize, StoreError> {
    let batch: Vec<(String, ChunkMeta)> = split_text(text, opts.chunk_size, opts.overlap)?
        .map(|w| (w.to_string(), ChunkMeta::new(source)))
        .collect();

    debug!(
        "ingest_text: source={source} windows={} chunk_size={} overlap={}",
        batch.len(),
        opts.chunk_size,
        opts.overlap
    );

    store.add(batch, provider).await
}

/// Reads a knowledge file and ingests its content.
///
/// The chunk source identifier is the file name (falling back to the full
/// path when there is none).
///
/// # Errors
/// - [`StoreError::FileNotFound`] if `path` does not exist (checked before
///   any store mutation)
/// - [`StoreError::Io`] for read failures
/// - everything [`ingest_text`] can return
pub async fn ingest_file(
    store: &mut ChunkStore,
    path: impl AsRef<Path>,
    opts: &IngestOptions,
    provider: &dyn EmbeddingsProvider,
) -> Result<usize, StoreError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(StoreError::FileNotFound(path.to_path_buf()));
    }

    let text = std::fs::read_to_string(path)?;
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let added = ingest_text(store, &text, &source, opts, provider).await?;
    info!("ingest_file: {} chunks from {:?}", added, path);
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreConfig;
    use crate::testing::CountingEmbedder;

    #[tokio::test]
    async fn missing_file_is_rejected_before_any_work() {
        let mut store = ChunkStore::new(StoreConfig::new_default()).unwrap();
        let provider = CountingEmbedder::default();
        let err = ingest_file(
            &mut store,
            "/definitely/not/here.txt",
            &IngestOptions::default(),
            &provider,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::FileNotFound(_)));
        assert_eq!(provider.calls(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn text_is_split_and_stored() {
        let mut store = ChunkStore::new(StoreConfig::new_default()).unwrap();
        let provider = CountingEmbedder::default();
        let opts = IngestOptions {
            chunk_size: 9,
            overlap: 3,
        };
        let added = ingest_text(&mut store, "AAAA BBBB CCCC DDDD", "kb.txt", &opts, &provider)
            .await
            .unwrap();
        assert_eq!(added, 3);
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn invalid_options_fail_fast() {
        let mut store = ChunkStore::new(StoreConfig::new_default()).unwrap();
        let provider = CountingEmbedder::default();
        let opts = IngestOptions {
            chunk_size: 3,
            overlap: 3,
        };
        let err = ingest_text(&mut store, "some text", "kb.txt", &opts, &provider)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidChunking(_)));
        assert_eq!(provider.calls(), 0);
    }
}
