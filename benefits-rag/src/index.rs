//! Flat (exhaustive) inner-product index over L2-normalized vectors.
//!
//! Every stored vector and every query is normalized to unit length, so the
//! inner product equals cosine similarity. The index is built once and is
//! read-only afterwards; concurrent searches need no locking.

use crate::document::SearchHit;
use crate::error::{RagError, Result};

/// Scale `vector` to unit L2 norm in place.
///
/// A zero vector is left unchanged and scores `0.0` against everything.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// An exact nearest-neighbour index using inner product on normalized vectors.
///
/// Vectors are stored contiguously, row `i` belonging to corpus chunk `i`.
///
/// # Example
///
/// ```rust,ignore
/// use benefits_rag::FlatIndex;
///
/// let index = FlatIndex::build(embeddings)?;
/// let hits = index.search(&query_embedding, 5)?;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatIndex {
    dimensions: usize,
    data: Vec<f32>,
    len: usize,
}

impl FlatIndex {
    /// Build an index from embeddings, normalizing each one.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexError`] if the vectors do not all share one
    /// non-zero dimension.
    pub fn build(embeddings: Vec<Vec<f32>>) -> Result<Self> {
        let Some(dimensions) = embeddings.first().map(Vec::len) else {
            return Ok(Self::default());
        };
        if dimensions == 0 {
            return Err(RagError::IndexError("embeddings must not be empty vectors".into()));
        }

        let len = embeddings.len();
        let mut data = Vec::with_capacity(len * dimensions);
        for (i, mut vector) in embeddings.into_iter().enumerate() {
            if vector.len() != dimensions {
                return Err(RagError::IndexError(format!(
                    "embedding {i} has {} dimensions, expected {dimensions}",
                    vector.len()
                )));
            }
            l2_normalize(&mut vector);
            data.extend_from_slice(&vector);
        }

        Ok(Self { dimensions, data, len })
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Dimension of stored vectors (`0` for an empty index).
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// The normalized vector stored at row `i`.
    pub fn vector(&self, i: usize) -> Option<&[f32]> {
        (i < self.len).then(|| &self.data[i * self.dimensions..(i + 1) * self.dimensions])
    }

    /// Return the `min(k, len)` rows with the highest inner product against
    /// the normalized `query`, best first. Equal scores keep row order.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexError`] if a non-empty index is queried with a
    /// vector of the wrong dimension.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.dimensions {
            return Err(RagError::IndexError(format!(
                "query has {} dimensions, index has {}",
                query.len(),
                self.dimensions
            )));
        }

        let mut query = query.to_vec();
        l2_normalize(&mut query);

        let mut hits: Vec<SearchHit> = self
            .data
            .chunks_exact(self.dimensions)
            .enumerate()
            .map(|(chunk_index, row)| SearchHit { chunk_index, score: dot(row, &query) })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.chunk_index.cmp(&b.chunk_index)));
        hits.truncate(k);
        Ok(hits)
    }
}
