use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VectorStoreError>;

#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("Index or metadata file not found ({index_path}, {meta_path})")]
    NotFound { index_path: PathBuf, meta_path: PathBuf },

    #[error("No index to save")]
    NoIndex,

    #[error("Index not initialized")]
    NotInitialized,

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Index holds {vectors} vectors but metadata holds {chunks} chunks")]
    Desynchronized { vectors: usize, chunks: usize },

    #[error("Corrupt index file: {0}")]
    CorruptIndex(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metadata error: {0}")]
    Metadata(#[from] serde_json::Error),
}
