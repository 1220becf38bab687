//! Embedding provider backed by the shared LLM service.

use std::sync::Arc;
use std::{future::Future, pin::Pin};

use crate::{EmbeddingsProvider, StoreError};
use llm_service::LlmServiceRoles;

/// Embedder that delegates to the `embedding` role of [`LlmServiceRoles`].
#[derive(Clone)]
pub struct LlmEmbedder {
    svc: Arc<LlmServiceRoles>,
    /// Expected embedding dimension, if the deployment pins one.
    dim: Option<usize>,
}

impl LlmEmbedder {
    /// Construct a new embedder over a shared service handle.
    pub fn new(svc: Arc<LlmServiceRoles>, dim: Option<usize>) -> Self {
        Self { svc, dim }
    }
}

impl EmbeddingsProvider for LlmEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let vec = self
                .svc
                .embed(text)
                .await
                .map_err(|e| StoreError::Embedding(e.to_string()))?;

            if let Some(want) = self.dim {
                if vec.len() != want {
                    return Err(StoreError::VectorSizeMismatch {
                        got: vec.len(),
                        want,
                    });
                }
            }

            Ok(vec)
        })
    }
}
