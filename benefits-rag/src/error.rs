//! Error types for the `benefits-rag` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building or querying the corpus.
#[derive(Debug, Error)]
pub enum RagError {
    /// The embedding service failed or returned an unusable response.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The vector index rejected its input.
    #[error("Index error: {0}")]
    IndexError(String),

    /// Invalid chunking parameters.
    #[error("Chunking error: {0}")]
    ChunkingError(String),

    /// A document could not be read.
    #[error("Document error ({}): {message}", .path.display())]
    DocumentError {
        /// The file that failed.
        path: PathBuf,
        /// A description of the failure.
        message: String,
    },

    /// The chunk and embedding sequences of a corpus disagree.
    #[error("Corpus error: {0}")]
    CorpusError(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl RagError {
    pub(crate) fn embedding(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EmbeddingError { provider: provider.into(), message: message.into() }
    }
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
