//! Public API types re-used by external crates (e.g., an HTTP API layer).

use std::collections::BTreeSet;

/// Final answer for a single question.
///
/// `sources` carries the deduplicated source identifiers of the retrieved
/// chunks (set semantics, order not meaningful). When the answer capability
/// failed, `answer` holds a canned fallback, `sources` is empty, and
/// `generation_failure` records the provider message.
#[derive(Clone, Debug)]
pub struct QueryAnswer {
    pub answer: String,
    pub sources: BTreeSet<String>,
    pub generation_failure: Option<String>,
}

impl QueryAnswer {
    /// Whether this is a full-success answer.
    pub fn is_degraded(&self) -> bool {
        self.generation_failure.is_some()
    }
}

/// Outcome of a successful ingestion call.
#[derive(Clone, Copy, Debug)]
pub struct IngestReport {
    /// Number of chunks added to the store.
    pub chunks_added: usize,
}
