//! # benefits-rag
//!
//! Retrieval half of the benefits assistant.
//!
//! The corpus is built once at startup and never mutated:
//!
//! ```text
//! DocumentSource → FixedSizeChunker → BatchEmbedder → FlatIndex
//! ```
//!
//! Per request, the query is embedded, searched against the [`Corpus`], and the
//! hits are turned into a cited prompt context by [`assemble_context`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use benefits_rag::{Corpus, OpenAIEmbeddingProvider, PdfDirectorySource, RagConfig};
//!
//! let config = RagConfig::default();
//! let provider = Arc::new(OpenAIEmbeddingProvider::from_env()?);
//! let corpus = Corpus::build(&PdfDirectorySource::new("./pdfs"), provider.clone(), &config).await?;
//! let hits = corpus.search(&provider.embed("What is an HSA?").await?, 5)?;
//! ```

pub mod chunking;
pub mod config;
pub mod context;
pub mod corpus;
pub mod document;
pub mod embedding;
pub mod error;
pub mod index;
pub mod openai;
pub mod source;

pub use chunking::{Chunks, FixedSizeChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use context::{AssembledContext, assemble_context};
pub use corpus::Corpus;
pub use document::{Chunk, Document, SearchHit};
pub use embedding::{BatchEmbedder, EmbeddingProvider};
pub use error::{RagError, Result};
pub use index::{FlatIndex, l2_normalize};
pub use openai::{OPENAI_API_BASE, OpenAIEmbeddingProvider};
pub use source::{DocumentSource, PdfDirectorySource, StaticSource};
