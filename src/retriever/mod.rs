
use tracing::debug;

use crate::Result;
use crate::embeddings::Embedder;
use crate::store::{SearchResult, VectorStore};

/// Conventional number of results when the caller has no preference.
pub const DEFAULT_TOP_K: usize = 3;

/// Composes an [`Embedder`] with a [`VectorStore`]: documents go in as
/// texts, queries come back as ranked (text, score) results.
///
/// The retriever borrows both collaborators for its lifetime and never takes
/// ownership of either.
pub struct Retriever<'a, E: Embedder, S: VectorStore> {
    embedder: &'a E,
    store: &'a mut S,
}

impl<'a, E: Embedder, S: VectorStore> Retriever<'a, E, S> {
    #[inline]
    pub fn new(embedder: &'a E, store: &'a mut S) -> Self {
        Self { embedder, store }
    }

    /// Encode all texts in one batched embedding call and append them to the
    /// store.
    ///
    /// There is no partial-add rollback: if the store rejects the batch
    /// after the embedder partially succeeded, or the embedder fails
    /// mid-batch, the store's contents must be treated as corrupted by the
    /// caller.
    #[inline]
    pub fn add_documents(&mut self, texts: &[String]) -> Result<()> {
        if texts.is_empty() {
            return Ok(());
        }

        let vectors = self.embedder.encode(texts)?;
        self.store.add(texts, &vectors)?;

        debug!("Indexed {} documents ({} total)", texts.len(), self.store.len());
        Ok(())
    }

    /// Embed `query` and return the `k` most similar stored texts,
    /// descending by score. `k == 0` yields an empty Vec.
    #[inline]
    pub fn retrieve(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let vectors = self.embedder.encode(&[query.to_string()])?;
        let Some(query_vector) = vectors.first() else {
            return Err(crate::RagError::Embedding(
                "embedder returned no vector for the query".to_string(),
            ));
        };

        self.store.search(query_vector, k)
    }
}
