//! Configuration for corpus building.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Configuration parameters for chunking and embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Chunk size in characters.
    pub chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks.
    pub chunk_overlap: usize,
    /// Number of texts sent per embedding request.
    pub embed_batch_size: usize,
    /// Maximum number of embedding requests in flight while building the corpus.
    pub embed_concurrency: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { chunk_size: 1000, chunk_overlap: 200, embed_batch_size: 16, embed_concurrency: 1 }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the embedding batch size.
    pub fn embed_batch_size(mut self, size: usize) -> Self {
        self.config.embed_batch_size = size;
        self
    }

    /// Set how many embedding batches may be in flight at once.
    pub fn embed_concurrency(mut self, concurrency: usize) -> Self {
        self.config.embed_concurrency = concurrency;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `chunk_size == 0` or `chunk_overlap >= chunk_size`
    /// - `embed_batch_size == 0` or `embed_concurrency == 0`
    pub fn build(self) -> Result<RagConfig> {
        let config = self.config;
        if config.chunk_size == 0 {
            return Err(RagError::ConfigError("chunk_size must be greater than zero".into()));
        }
        if config.chunk_overlap >= config.chunk_size {
            return Err(RagError::ConfigError(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                config.chunk_overlap, config.chunk_size
            )));
        }
        if config.embed_batch_size == 0 {
            return Err(RagError::ConfigError("embed_batch_size must be greater than zero".into()));
        }
        if config.embed_concurrency == 0 {
            return Err(RagError::ConfigError("embed_concurrency must be greater than zero".into()));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RagConfig::builder().build().unwrap();
        assert_eq!(config, RagConfig::default());
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 200);
        assert_eq!(config.embed_batch_size, 16);
    }

    #[test]
    fn rejects_inconsistent_values() {
        assert!(RagConfig::builder().chunk_size(100).chunk_overlap(100).build().is_err());
        assert!(RagConfig::builder().embed_batch_size(0).build().is_err());
        assert!(RagConfig::builder().embed_concurrency(0).build().is_err());
    }
}
