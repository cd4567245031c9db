use thiserror::Error;

pub type Result<T> = std::result::Result<T, RagError>;

#[derive(Error, Debug)]
pub enum RagError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Vector dimension mismatch: store holds {expected}-dimensional vectors, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Shape mismatch: {texts} texts but {vectors} vectors")]
    ShapeMismatch { texts: usize, vectors: usize },

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Source error: {0}")]
    Source(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod chunking;
pub mod commands;
pub mod config;
pub mod embeddings;
pub mod retriever;
pub mod source;
pub mod store;
