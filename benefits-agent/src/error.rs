//! Error types for the `benefits-agent` crate.

use benefits_core::CoreError;
use benefits_rag::RagError;
use thiserror::Error;

/// Errors that fail an answer.
///
/// Tool failures are not among them: the dispatcher turns those into text
/// for the model.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The query was empty or whitespace.
    #[error("query must not be empty")]
    EmptyQuery,

    /// The query could not be embedded.
    #[error("query embedding failed: {0}")]
    Embedding(#[source] RagError),

    /// The index rejected the query vector.
    #[error("search failed: {0}")]
    Search(#[source] RagError),

    /// The language model call failed.
    #[error(transparent)]
    Model(#[from] CoreError),

    /// The assistant was built without a required part.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AgentError {
    /// Whether the caller, rather than a dependency, is at fault.
    pub fn is_user_error(&self) -> bool {
        matches!(self, AgentError::EmptyQuery)
    }
}

/// A convenience result type for answering.
pub type Result<T> = std::result::Result<T, AgentError>;
