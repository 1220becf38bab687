//! Shared LLM service with two active roles: `answer` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Caches underlying HTTP clients per config (endpoint+model+key+timeout).
//! - Applies the configured [`RetryPolicy`] around every provider call.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use tracing::trace;

use crate::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
use crate::error_handler::Result;
use crate::retry::{RetryPolicy, with_retry};
use crate::services::{ollama_service::OllamaService, open_ai_service::OpenAiService};

/// Shared service that manages two logical model roles: **answer** and
/// **embedding**.
///
/// Internally it caches Ollama/OpenAI clients keyed by their configuration
/// to avoid recreating HTTP clients on each call.
pub struct LlmServiceRoles {
    answer: LlmModelConfig,
    embedding: LlmModelConfig,
    retry: RetryPolicy,

    ollama: RwLock<HashMap<ClientKey, Arc<OllamaService>>>,
    openai: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,
}

impl LlmServiceRoles {
    /// Creates a new service with the two role configs.
    ///
    /// - `answer`: config for final answer generation.
    /// - `embedding`: config for embedding retrieval.
    /// - `retry`: retry policy for transient provider failures.
    pub fn new(answer: LlmModelConfig, embedding: LlmModelConfig, retry: RetryPolicy) -> Self {
        Self {
            answer,
            embedding,
            retry,
            ollama: RwLock::new(HashMap::new()),
            openai: RwLock::new(HashMap::new()),
        }
    }

    /// Generates answer text using the **answer** role.
    ///
    /// # Arguments
    /// - `prompt`: input text prompt.
    /// - `system`: optional system instruction.
    ///
    /// # Errors
    /// Returns the final provider error once the retry policy is exhausted.
    pub async fn generate_answer(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        trace!("LlmServiceRoles::generate_answer model={}", self.answer.model);
        match self.answer.provider {
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(&self.answer).await?;
                with_retry(&self.retry, "generate_answer", || {
                    cli.generate(prompt, system)
                })
                .await
            }
            LlmProvider::OpenAI => {
                let cli = self.get_or_init_openai(&self.answer).await?;
                with_retry(&self.retry, "generate_answer", || {
                    cli.generate(prompt, system)
                })
                .await
            }
        }
    }

    /// Computes an embedding using the **embedding** role.
    ///
    /// # Errors
    /// Returns the final provider error once the retry policy is exhausted.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>> {
        trace!("LlmServiceRoles::embed model={}", self.embedding.model);
        match self.embedding.provider {
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(&self.embedding).await?;
                with_retry(&self.retry, "embed", || cli.embeddings(input)).await
            }
            LlmProvider::OpenAI => {
                let cli = self.get_or_init_openai(&self.embedding).await?;
                with_retry(&self.retry, "embed", || cli.embeddings(input)).await
            }
        }
    }

    /// Returns references to the current role configs `(answer, embedding)`.
    pub fn roles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.answer, &self.embedding)
    }

    /* --------------------- Internals --------------------- */

    async fn get_or_init_ollama(&self, cfg: &LlmModelConfig) -> Result<Arc<OllamaService>> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.ollama.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OllamaService::new(cfg.clone())?);
        let mut w = self.ollama.write().await;
        Ok(w.entry(key).or_insert(cli).clone())
    }

    async fn get_or_init_openai(&self, cfg: &LlmModelConfig) -> Result<Arc<OpenAiService>> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.openai.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OpenAiService::new(cfg.clone())?);
        let mut w = self.openai.write().await;
        Ok(w.entry(key).or_insert(cli).clone())
    }
}

/// Internal cache key to identify unique client configs.
#[derive(Clone, PartialEq, Eq, Hash)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
        }
    }
}
