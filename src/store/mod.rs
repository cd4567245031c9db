
use tracing::debug;

use crate::{RagError, Result};

/// A single ranked hit from a similarity search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub text: String,
    /// Cosine similarity in [-1, 1]; practically [0, 1] for normalized text
    /// embeddings.
    pub score: f32,
}

/// Capability for storing (text, vector) pairs and answering top-k
/// cosine-similarity queries. Implementations are append-only: entries are
/// never mutated or removed, and an entry's insertion position is its stable
/// identity.
pub trait VectorStore {
    /// Append `texts[i]` paired with `vectors[i]`, preserving relative
    /// order. The first successful call fixes the store's vector
    /// dimensionality; later calls must match it.
    fn add(&mut self, texts: &[String], vectors: &[Vec<f32>]) -> Result<()>;

    /// Return the `min(k, len)` stored entries most similar to `query`,
    /// descending by score, ties in insertion order. An empty store or
    /// `k == 0` yields an empty Vec, not an error.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>>;

    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The canonical in-memory [`VectorStore`]: parallel text/vector sequences,
/// no persistence, no index structure. Search scans the whole store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    texts: Vec<String>,
    vectors: Vec<Vec<f32>>,
    dimension: Option<usize>,
}

impl InMemoryStore {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dimensionality established by the first `add`, if any.
    #[inline]
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }
}

impl VectorStore for InMemoryStore {
    fn add(&mut self, texts: &[String], vectors: &[Vec<f32>]) -> Result<()> {
        if texts.len() != vectors.len() {
            return Err(RagError::ShapeMismatch {
                texts: texts.len(),
                vectors: vectors.len(),
            });
        }

        let expected = self.dimension.or_else(|| vectors.first().map(Vec::len));
        if let Some(expected) = expected {
            if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
                return Err(RagError::DimensionMismatch {
                    expected,
                    actual: bad.len(),
                });
            }
        }

        self.texts.extend_from_slice(texts);
        self.vectors.extend_from_slice(vectors);
        self.dimension = self.dimension.or(expected);

        debug!(
            "Stored {} entries ({} total, dimension {:?})",
            texts.len(),
            self.texts.len(),
            self.dimension
        );
        Ok(())
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        if self.vectors.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        if let Some(expected) = self.dimension {
            if query.len() != expected {
                return Err(RagError::DimensionMismatch {
                    expected,
                    actual: query.len(),
                });
            }
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .map(|vector| cosine_similarity(vector, query))
            .enumerate()
            .collect();

        // Vec::sort_by is stable: equal scores keep insertion order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);

        let results = scored
            .into_iter()
            .map(|(index, score)| SearchResult {
                text: self.texts[index].clone(),
                score,
            })
            .collect::<Vec<_>>();

        debug!("Search returned {} of {} entries", results.len(), self.len());
        Ok(results)
    }

    #[inline]
    fn len(&self) -> usize {
        self.texts.len()
    }
}

/// Cosine similarity `dot(a, b) / (‖a‖·‖b‖)`. A zero norm on either side is
/// treated as 1.0 — a numerical safety clamp against division by zero, not a
/// claim about the similarity of null vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot / (safe_norm(a) * safe_norm(b))
}

fn safe_norm(v: &[f32]) -> f32 {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 { 1.0 } else { norm }
}
