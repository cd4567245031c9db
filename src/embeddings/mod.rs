pub mod ollama;

pub use ollama::OllamaEmbedder;

use crate::Result;

/// Capability for turning texts into fixed-width embedding vectors.
///
/// One vector per input text, same order, with a dimensionality that is
/// fixed for the lifetime of the embedder instance. The call blocks until
/// every vector is ready; the core neither retries nor interprets failures
/// beyond surfacing them.
pub trait Embedder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}
