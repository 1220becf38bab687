//! Answer capability interface and its LLM-service-backed implementation.

use std::sync::Arc;
use std::{future::Future, pin::Pin};

use crate::error::SessionError;
use llm_service::LlmServiceRoles;

/// Provider interface for final answer generation.
///
/// Async because real providers perform HTTP requests. Implement this trait
/// to plug in your own generation backend.
pub trait AnswerProvider: Send + Sync {
    /// Generate answer text for a `(system, user)` prompt pair.
    fn generate<'a>(
        &'a self,
        system: &'a str,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, SessionError>> + Send + 'a>>;
}

/// Answerer that delegates to the `answer` role of [`LlmServiceRoles`].
#[derive(Clone)]
pub struct LlmAnswerer {
    svc: Arc<LlmServiceRoles>,
}

impl LlmAnswerer {
    /// Construct a new answerer over a shared service handle.
    pub fn new(svc: Arc<LlmServiceRoles>) -> Self {
        Self { svc }
    }
}

impl AnswerProvider for LlmAnswerer {
    fn generate<'a>(
        &'a self,
        system: &'a str,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, SessionError>> + Send + 'a>> {
        Box::pin(async move {
            self.svc
                .generate_answer(prompt, Some(system))
                .await
                .map_err(|e| SessionError::Generation(e.to_string()))
        })
    }
}
