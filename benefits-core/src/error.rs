//! Error types for the `benefits-core` crate.

use thiserror::Error;

/// Errors raised by a [`LanguageModel`](crate::LanguageModel) backend.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The language model service failed or returned an unusable response.
    #[error("Model error ({model}): {message}")]
    Model {
        /// The model (or provider) that produced the error.
        model: String,
        /// A description of the failure.
        message: String,
    },
}

impl CoreError {
    /// Shorthand for building a [`CoreError::Model`].
    pub fn model(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Model { model: model.into(), message: message.into() }
    }
}

/// A convenience result type for language model operations.
pub type Result<T> = std::result::Result<T, CoreError>;
