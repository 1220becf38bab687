use crate::{EmbeddingsProvider, StoreError};
use std::{future::Future, pin::Pin};

/// Offline stand-in that always fails; useful for wiring tests and for
/// deployments that ingest without a configured embedding backend.
#[derive(Clone, Copy, Default)]
pub struct NoopEmbedder;

impl EmbeddingsProvider for NoopEmbedder {
    fn embed<'a>(
        &'a self,
        _text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, StoreError>> + Send + 'a>> {
        Box::pin(async { Err(StoreError::MissingEmbedding) })
    }
}
