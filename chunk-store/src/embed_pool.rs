//! Embedding executor with concurrency and order preservation.

use crate::{embed::EmbeddingsProvider, errors::StoreError};
use futures::stream::{self, StreamExt};
use tracing::debug;

/// Embeds a batch of texts, at most `concurrency` in flight at a time.
///
/// Results come back in input order regardless of completion order; any
/// provider failure fails the whole batch so callers can keep all-or-nothing
/// semantics.
///
/// # Errors
/// The first provider error encountered.
pub(crate) async fn embed_batch(
    texts: &[String],
    provider: &dyn EmbeddingsProvider,
    concurrency: usize,
) -> Result<Vec<Vec<f32>>, StoreError> {
    debug!(
        "embed_pool::embed_batch: total={} concurrency={concurrency}",
        texts.len()
    );

    let mut results: Vec<(usize, Vec<f32>)> = stream::iter(texts.iter().enumerate())
        .map(|(i, text)| async move {
            let v = provider.embed(text).await?;
            Ok::<(usize, Vec<f32>), StoreError>((i, v))
        })
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<Vec<_>, StoreError>>()?;

    results.sort_by_key(|(i, _)| *i);
    Ok(results.into_iter().map(|(_, v)| v).collect())
}
