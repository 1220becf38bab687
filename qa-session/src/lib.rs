//! Conversational retrieval-answering session.
//!
//! Public API: [`QaSession`]. One session owns a chunk store and a bounded
//! conversation log, and composes them with the external embedding and
//! answer capabilities: retrieve top-K context, format recent history, build
//! a compact prompt, call the model, record the turn.
//!
//! Sessions are explicitly constructed and explicitly owned — one per
//! conversation. Mutating operations take `&mut self`, so two callers cannot
//! interleave mutations on the same session without external coordination.

mod api_types;
mod error;

pub mod cfg;
pub mod history;
pub mod llm;
pub mod prompt;

pub use api_types::{IngestReport, QueryAnswer};
pub use cfg::SessionConfig;
pub use error::SessionError;
pub use history::{ConversationLog, Speaker, Turn};
pub use llm::{AnswerProvider, LlmAnswerer};

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use chunk_store::embed::llm_embedder::LlmEmbedder;
use chunk_store::{ChunkStore, EmbeddingsProvider, ingest};
use llm_service::LlmServiceRoles;
use tracing::{debug, info, warn};

/// A single question-answering session over a knowledge base.
pub struct QaSession {
    cfg: SessionConfig,
    store: ChunkStore,
    log: ConversationLog,
    embedder: Arc<dyn EmbeddingsProvider>,
    answerer: Arc<dyn AnswerProvider>,
}

impl QaSession {
    /// Creates a session with explicit capability implementations.
    ///
    /// # Errors
    /// Returns `SessionError::Store` if the store configuration is invalid.
    pub fn new(
        cfg: SessionConfig,
        embedder: Arc<dyn EmbeddingsProvider>,
        answerer: Arc<dyn AnswerProvider>,
    ) -> Result<Self, SessionError> {
        let store = ChunkStore::new(cfg.make_store_config())?;
        let log = ConversationLog::new(cfg.log_capacity);
        Ok(Self {
            cfg,
            store,
            log,
            embedder,
            answerer,
        })
    }

    /// Convenience constructor wiring both capabilities from one shared LLM
    /// service handle.
    ///
    /// # Errors
    /// Returns `SessionError::Store` if the store configuration is invalid.
    pub fn with_service(
        cfg: SessionConfig,
        svc: Arc<LlmServiceRoles>,
    ) -> Result<Self, SessionError> {
        let embedder = Arc::new(LlmEmbedder::new(svc.clone(), cfg.embedding_dim));
        let answerer = Arc::new(LlmAnswerer::new(svc));
        Self::new(cfg, embedder, answerer)
    }

    /// Answers one question against the knowledge base.
    ///
    /// Retrieval failures abort the call and leave the log untouched. A
    /// failed answer generation degrades to a canned apology (empty sources,
    /// failure message on the response) instead of erroring, and also leaves
    /// the log untouched; the turn is recorded only on full success.
    ///
    /// # Errors
    /// Returns `SessionError::Store` when the similarity search fails.
    pub async fn query(&mut self, question: &str) -> Result<QueryAnswer, SessionError> {
        debug!("QaSession::query top_k={}", self.cfg.top_k);

        let hits = self
            .store
            .search(question, self.cfg.top_k, self.embedder.as_ref())
            .await?;

        let user_prompt = prompt::build_user_prompt(
            question,
            &hits,
            self.log.recent(self.cfg.history_turns),
            self.cfg.max_ctx_chars,
        );

        match self
            .answerer
            .generate(prompt::DEFAULT_SYSTEM, &user_prompt)
            .await
        {
            Ok(answer) => {
                self.log.append(Turn {
                    question: question.to_string(),
                    answer: answer.clone(),
                });
                let sources: BTreeSet<String> = hits.into_iter().map(|h| h.source).collect();
                Ok(QueryAnswer {
                    answer,
                    sources,
                    generation_failure: None,
                })
            }
            Err(e) => {
                warn!("QaSession::query: answer generation failed: {e}");
                Ok(QueryAnswer {
                    answer: prompt::FALLBACK_ANSWER.to_string(),
                    sources: BTreeSet::new(),
                    generation_failure: Some(e.to_string()),
                })
            }
        }
    }

    /// Retained turns, oldest-first.
    pub fn history(&self) -> impl Iterator<Item = &Turn> {
        self.log.iter()
    }

    /// Empties the conversation log. Irreversible.
    pub fn clear_memory(&mut self) {
        info!("QaSession::clear_memory");
        self.log.clear();
    }

    /// Ingests a knowledge file into the store.
    ///
    /// # Errors
    /// - `StoreError::FileNotFound` (wrapped) if the path does not exist
    /// - chunking/embedding failures from the store
    pub async fn ingest_file(&mut self, path: impl AsRef<Path>) -> Result<IngestReport, SessionError> {
        let opts = self.cfg.make_ingest_options();
        let chunks_added =
            ingest::ingest_file(&mut self.store, path, &opts, self.embedder.as_ref()).await?;
        Ok(IngestReport { chunks_added })
    }

    /// Ingests raw text under an explicit source identifier.
    ///
    /// # Errors
    /// Chunking/embedding failures from the store.
    pub async fn ingest_text(
        &mut self,
        text: &str,
        source: &str,
    ) -> Result<IngestReport, SessionError> {
        let opts = self.cfg.make_ingest_options();
        let chunks_added =
            ingest::ingest_text(&mut self.store, text, source, &opts, self.embedder.as_ref())
                .await?;
        Ok(IngestReport { chunks_added })
    }

    /// Number of chunks currently stored.
    pub fn stored_chunks(&self) -> usize {
        self.store.len()
    }
}
