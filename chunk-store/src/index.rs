//! In-process vector index: insertion-ordered entries with cosine ranking.

use crate::errors::StoreError;
use crate::record::Chunk;
use tracing::trace;

/// Append-only index pairing each chunk with its embedding vector.
///
/// The first inserted vector locks the dimensionality unless a dimension was
/// pinned up front.
pub(crate) struct VectorIndex {
    dim: Option<usize>,
    entries: Vec<IndexEntry>,
}

struct IndexEntry {
    vector: Vec<f32>,
    chunk: Chunk,
}

impl VectorIndex {
    pub(crate) fn new(dim: Option<usize>) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn dim(&self) -> Option<usize> {
        self.dim
    }

    /// Inserts a resolved batch. The whole batch is dimension-checked before
    /// the first entry lands, so a failed call leaves the index unchanged.
    ///
    /// # Errors
    /// Returns [`StoreError::VectorSizeMismatch`] on any inconsistent vector.
    pub(crate) fn insert_batch(
        &mut self,
        rows: Vec<(Chunk, Vec<f32>)>,
    ) -> Result<usize, StoreError> {
        let mut want = self.dim;
        for (_, v) in &rows {
            match want {
                Some(w) if v.len() != w => {
                    return Err(StoreError::VectorSizeMismatch { got: v.len(), want: w });
                }
                Some(_) => {}
                None => want = Some(v.len()),
            }
        }
        self.dim = want;

        let added = rows.len();
        self.entries.extend(
            rows.into_iter()
                .map(|(chunk, vector)| IndexEntry { vector, chunk }),
        );
        trace!("VectorIndex::insert_batch added={added} total={}", self.entries.len());
        Ok(added)
    }

    /// Ranks all entries by cosine similarity to `query`, descending, and
    /// returns up to `k` of them. Ties keep insertion order (stable sort).
    pub(crate) fn search(&self, query: &[f32], k: usize) -> Vec<(f32, &Chunk)> {
        let mut scored: Vec<(f32, &Chunk)> = self
            .entries
            .iter()
            .map(|e| (cosine(query, &e.vector), &e.chunk))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(k);
        scored
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut na, mut nb) = (0.0f32, 0.0f32, 0.0f32);
    let len = a.len().min(b.len());
    for i in 0..len {
        dot += a[i] * b[i];
        na += a[i] * a[i];
        nb += b[i] * b[i];
    }
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na.sqrt() * nb.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ChunkMeta;

    fn chunk(content: &str) -> Chunk {
        Chunk {
            content: content.to_string(),
            meta: ChunkMeta::new("test.txt"),
        }
    }

    #[test]
    fn dimension_locked_by_first_batch() {
        let mut idx = VectorIndex::new(None);
        idx.insert_batch(vec![(chunk("a"), vec![1.0, 0.0])]).unwrap();
        assert_eq!(idx.dim(), Some(2));

        let err = idx
            .insert_batch(vec![(chunk("b"), vec![1.0, 0.0, 0.0])])
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::VectorSizeMismatch { got: 3, want: 2 }
        ));
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn mixed_batch_is_rejected_whole() {
        let mut idx = VectorIndex::new(None);
        let err = idx
            .insert_batch(vec![
                (chunk("a"), vec![1.0, 0.0]),
                (chunk("b"), vec![1.0]),
            ])
            .unwrap_err();
        assert!(matches!(err, StoreError::VectorSizeMismatch { .. }));
        assert!(idx.is_empty());
    }

    #[test]
    fn ranks_by_cosine_descending() {
        let mut idx = VectorIndex::new(None);
        idx.insert_batch(vec![
            (chunk("orthogonal"), vec![0.0, 1.0]),
            (chunk("aligned"), vec![2.0, 0.0]),
            (chunk("diagonal"), vec![1.0, 1.0]),
        ])
        .unwrap();

        let hits = idx.search(&[1.0, 0.0], 3);
        let contents: Vec<&str> = hits.iter().map(|(_, c)| c.content.as_str()).collect();
        assert_eq!(contents, ["aligned", "diagonal", "orthogonal"]);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut idx = VectorIndex::new(None);
        idx.insert_batch(vec![
            (chunk("first"), vec![1.0, 0.0]),
            (chunk("second"), vec![3.0, 0.0]),
        ])
        .unwrap();

        // Both entries point the same way → identical cosine score.
        let hits = idx.search(&[1.0, 0.0], 2);
        assert_eq!(hits[0].1.content, "first");
        assert_eq!(hits[1].1.content, "second");
    }

    #[test]
    fn truncates_to_k() {
        let mut idx = VectorIndex::new(None);
        idx.insert_batch(
            (0..5)
                .map(|i| (chunk(&format!("c{i}")), vec![1.0, i as f32]))
                .collect(),
        )
        .unwrap();
        assert_eq!(idx.search(&[1.0, 0.0], 2).len(), 2);
    }
}
