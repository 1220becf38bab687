//! In-process chunk storage with similarity retrieval.
//!
//! This crate provides a clean API to:
//! - Split raw knowledge text into bounded, overlapping chunks
//! - Add chunk batches with all-or-nothing embedding resolution
//! - Retrieve top-K chunks for a textual query by cosine similarity
//!
//! The design is flat (no deep nesting) and splits responsibilities into
//! focused modules. The embedding capability is injected per call through
//! [`EmbeddingsProvider`]; the similarity ranking itself runs in-process.

mod config;
mod embed_pool;
mod errors;
mod index;
mod record;

pub mod embed;
pub mod ingest;
pub mod splitter;

pub use config::StoreConfig;
pub use embed::EmbeddingsProvider;
pub use errors::StoreError;
pub use ingest::IngestOptions;
pub use record::{Chunk, ChunkHit, ChunkMeta};

use index::VectorIndex;
use tracing::{debug, trace};

/// In-memory chunk store with similarity search.
///
/// This is the single entry point recommended for application code. Chunks
/// accumulate for the store's lifetime; there is no dedup and no removal.
/// Mutation goes through `&mut self`, so concurrent use requires external
/// serialization by the owner.
pub struct ChunkStore {
    cfg: StoreConfig,
    index: VectorIndex,
}

impl ChunkStore {
    /// Constructs a new empty store from the given configuration.
    ///
    /// # Errors
    /// Returns `StoreError::Config` if the configuration is invalid.
    pub fn new(cfg: StoreConfig) -> Result<Self, StoreError> {
        trace!("ChunkStore::new embedding_dim={:?}", cfg.embedding_dim);
        cfg.validate()?;
        let index = VectorIndex::new(cfg.embedding_dim);
        Ok(Self { cfg, index })
    }

    /// Number of stored chunks.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the store holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Locked embedding dimensionality, once known (pinned by config or by
    /// the first inserted batch).
    pub fn embedding_dim(&self) -> Option<usize> {
        self.index.dim()
    }

    /// Appends a batch of `(content, metadata)` pairs as new chunks.
    ///
    /// Every content is embedded first (up to `embed_concurrency` calls in
    /// flight); only when the full batch has resolved does anything land in
    /// the index. A failed call therefore leaves the store exactly as it
    /// was. No uniqueness check is performed.
    ///
    /// # Errors
    /// - [`StoreError::Embedding`] / [`StoreError::MissingEmbedding`] from
    ///   the provider
    /// - [`StoreError::VectorSizeMismatch`] on inconsistent dimensions
    pub async fn add(
        &mut self,
        batch: Vec<(String, ChunkMeta)>,
        provider: &dyn EmbeddingsProvider,
    ) -> Result<usize, StoreError> {
        if batch.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = batch.iter().map(|(content, _)| content.clone()).collect();
        let vectors = embed_pool::embed_batch(&texts, provider, self.cfg.embed_concurrency).await?;

        let rows: Vec<(Chunk, Vec<f32>)> = batch
            .into_iter()
            .zip(vectors)
            .map(|((content, meta), vector)| (Chunk { content, meta }, vector))
            .collect();

        let added = self.index.insert_batch(rows)?;
        debug!("ChunkStore::add added={added} total={}", self.index.len());
        Ok(added)
    }

    /// Returns up to `k` chunks ranked by similarity to `query`.
    ///
    /// An empty store yields an empty result without touching the provider.
    /// Ties in score keep insertion order (earliest first).
    ///
    /// # Errors
    /// Embedding failures from the provider; the store itself cannot fail.
    pub async fn search(
        &self,
        query: &str,
        k: usize,
        provider: &dyn EmbeddingsProvider,
    ) -> Result<Vec<ChunkHit>, StoreError> {
        trace!("ChunkStore::search k={k} stored={}", self.index.len());
        if self.index.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_vec = provider.embed(query).await?;

        let hits = self
            .index
            .search(&query_vec, k)
            .into_iter()
            .map(|(score, chunk)| ChunkHit {
                score,
                content: chunk.content.clone(),
                source: chunk.meta.source.clone(),
            })
            .collect();
        Ok(hits)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Deterministic in-process embedders for tests.

    use crate::embed::EmbeddingsProvider;
    use crate::errors::StoreError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::{future::Future, pin::Pin};

    /// Letter-frequency embedding: deterministic, 26 dimensions, and texts
    /// sharing letters score higher than unrelated ones.
    pub(crate) fn letter_freq(text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; 26];
        for c in text.chars().filter(|c| c.is_ascii_alphabetic()) {
            v[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1.0;
        }
        v
    }

    /// Embedder that counts calls and embeds by letter frequency.
    #[derive(Default)]
    pub(crate) struct CountingEmbedder {
        calls: AtomicUsize,
    }

    impl CountingEmbedder {
        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl EmbeddingsProvider for CountingEmbedder {
        fn embed<'a>(
            &'a self,
            text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, StoreError>> + Send + 'a>> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(letter_freq(text))
            })
        }
    }

    /// Embedder that fails every call after the first `ok_calls` ones.
    pub(crate) struct FlakyEmbedder {
        ok_calls: usize,
        calls: AtomicUsize,
    }

    impl FlakyEmbedder {
        pub(crate) fn new(ok_calls: usize) -> Self {
            Self {
                ok_calls,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl EmbeddingsProvider for FlakyEmbedder {
        fn embed<'a>(
            &'a self,
            text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, StoreError>> + Send + 'a>> {
            Box::pin(async move {
                let n = self.calls.fetch_add(1, Ordering::SeqCst);
                if n < self.ok_calls {
                    Ok(letter_freq(text))
                } else {
                    Err(StoreError::Embedding("provider unavailable".into()))
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::noop_embedder::NoopEmbedder;
    use crate::testing::{CountingEmbedder, FlakyEmbedder};

    fn batch(items: &[(&str, &str)]) -> Vec<(String, ChunkMeta)> {
        items
            .iter()
            .map(|(content, source)| (content.to_string(), ChunkMeta::new(*source)))
            .collect()
    }

    #[tokio::test]
    async fn empty_store_search_returns_empty_without_embedding() {
        let store = ChunkStore::new(StoreConfig::new_default()).unwrap();
        let provider = CountingEmbedder::default();
        let hits = store.search("anything", 3, &provider).await.unwrap();
        assert!(hits.is_empty());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn search_ranks_relevant_chunk_first() {
        let mut store = ChunkStore::new(StoreConfig::new_default()).unwrap();
        let provider = CountingEmbedder::default();
        store
            .add(
                batch(&[
                    ("zebra zoo zz", "animals.txt"),
                    ("rust borrow checker", "rust.txt"),
                ]),
                &provider,
            )
            .await
            .unwrap();

        let hits = store.search("borrow checker", 2, &provider).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].source, "rust.txt");
        assert!(hits[0].score >= hits[1].score);
    }

    #[tokio::test]
    async fn failed_batch_leaves_store_unchanged() {
        let mut store = ChunkStore::new(StoreConfig::new_default()).unwrap();
        let good = CountingEmbedder::default();
        store
            .add(batch(&[("stable content", "a.txt")]), &good)
            .await
            .unwrap();
        assert_eq!(store.len(), 1);

        // Second chunk of the batch fails → neither chunk may land.
        let flaky = FlakyEmbedder::new(1);
        let err = store
            .add(
                batch(&[("one more", "b.txt"), ("and another", "b.txt")]),
                &flaky,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Embedding(_)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn duplicates_accumulate() {
        let mut store = ChunkStore::new(StoreConfig::new_default()).unwrap();
        let provider = CountingEmbedder::default();
        let same = batch(&[("identical chunk", "a.txt")]);
        store.add(same.clone(), &provider).await.unwrap();
        store.add(same, &provider).await.unwrap();
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn noop_embedder_surfaces_missing_embedding() {
        let mut store = ChunkStore::new(StoreConfig::new_default()).unwrap();
        let err = store
            .add(batch(&[("content", "a.txt")]), &NoopEmbedder)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingEmbedding));
        assert!(store.is_empty());
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let cfg = StoreConfig {
            embedding_dim: None,
            embed_concurrency: 0,
        };
        assert!(matches!(
            ChunkStore::new(cfg),
            Err(StoreError::Config(_))
        ));
    }
}
