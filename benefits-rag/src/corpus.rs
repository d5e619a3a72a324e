//! The searchable corpus: chunks and their index, built once at startup.
//!
//! ```text
//! DocumentSource → FixedSizeChunker → BatchEmbedder → FlatIndex
//! ```
//!
//! A [`Corpus`] is immutable after construction. Share it behind an `Arc` and
//! search it from any number of concurrent requests.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};

use crate::chunking::FixedSizeChunker;
use crate::config::RagConfig;
use crate::context::{AssembledContext, assemble_context};
use crate::document::{Chunk, Document, SearchHit};
use crate::embedding::{BatchEmbedder, EmbeddingProvider};
use crate::error::{RagError, Result};
use crate::index::FlatIndex;
use crate::source::DocumentSource;

/// Chunks and their normalized embeddings, index-aligned: row `i` of the
/// index is the embedding of `chunks()[i]`.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    chunks: Vec<Chunk>,
    index: FlatIndex,
}

impl Corpus {
    /// Pair chunks with their embeddings.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::CorpusError`] if the two sequences differ in
    /// length, or [`RagError::IndexError`] if the embeddings are inconsistent.
    pub fn new(chunks: Vec<Chunk>, embeddings: Vec<Vec<f32>>) -> Result<Self> {
        if chunks.len() != embeddings.len() {
            return Err(RagError::CorpusError(format!(
                "{} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }
        let index = FlatIndex::build(embeddings)?;
        Ok(Self { chunks, index })
    }

    /// Load, chunk, embed and index every document of `source`.
    pub async fn build(
        source: &dyn DocumentSource,
        provider: Arc<dyn EmbeddingProvider>,
        config: &RagConfig,
    ) -> Result<Self> {
        let documents = source.load().await.inspect_err(|e| {
            error!(error = %e, "failed to load documents");
        })?;
        Self::from_documents(&documents, provider, config).await
    }

    /// Chunk, embed and index already-loaded documents.
    pub async fn from_documents(
        documents: &[Document],
        provider: Arc<dyn EmbeddingProvider>,
        config: &RagConfig,
    ) -> Result<Self> {
        let started = Instant::now();
        let chunker = FixedSizeChunker::new(config.chunk_size, config.chunk_overlap)?;

        let chunks: Vec<Chunk> = documents.iter().flat_map(|doc| chunker.chunks(doc)).collect();
        info!(documents = documents.len(), chunk_count = chunks.len(), "chunked documents");

        let embedder = BatchEmbedder::new(provider, config.embed_batch_size)
            .with_concurrency(config.embed_concurrency);
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = embedder.embed(&texts).await.inspect_err(|e| {
            error!(error = %e, "embedding failed while building corpus");
        })?;

        let expected = embedder.provider().dimensions();
        let corpus = Self::new(chunks, embeddings)?;
        if let Some(expected) = expected.filter(|&d| !corpus.is_empty() && d != corpus.index.dimensions()) {
            warn!(
                expected,
                actual = corpus.index.dimensions(),
                provider = embedder.provider().name(),
                "embedding dimensions differ from the provider's advertised size"
            );
        }
        info!(
            chunk_count = corpus.len(),
            dimensions = corpus.index.dimensions(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "corpus index built"
        );
        Ok(corpus)
    }

    /// Number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn chunk(&self, i: usize) -> Option<&Chunk> {
        self.chunks.get(i)
    }

    /// Distinct source document names, sorted.
    pub fn document_names(&self) -> BTreeSet<&str> {
        self.chunks.iter().map(|c| c.source_document.as_str()).collect()
    }

    /// The `min(k, len)` chunks closest to `query`, best first.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        self.index.search(query, k)
    }

    /// Cited prompt context for `hits`, in hit order.
    pub fn context_for(&self, hits: &[SearchHit]) -> AssembledContext {
        assemble_context(hits.iter().filter_map(|hit| self.chunk(hit.chunk_index)))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::source::StaticSource;

    /// Maps text onto a 3-d bag of keywords.
    struct KeywordProvider;

    #[async_trait]
    impl EmbeddingProvider for KeywordProvider {
        fn name(&self) -> &str {
            "keyword"
        }

        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|t| {
                    let t = t.to_lowercase();
                    vec![
                        t.matches("hsa").count() as f32,
                        t.matches("dental").count() as f32,
                        t.matches("vision").count() as f32 + 0.01,
                    ]
                })
                .collect())
        }
    }

    fn config() -> RagConfig {
        RagConfig::builder().chunk_size(40).chunk_overlap(10).build().unwrap()
    }

    #[test]
    fn rejects_misaligned_sequences() {
        let chunk = Chunk { text: "a".into(), source_document: "a.pdf".into(), index: 0, offset: 0 };
        let err = Corpus::new(vec![chunk], Vec::new()).unwrap_err();
        assert!(matches!(err, RagError::CorpusError(_)));
    }

    #[tokio::test]
    async fn builds_and_searches_end_to_end() {
        let source = StaticSource::new(vec![
            Document::new("hsa.pdf", "An HSA pairs with a high deductible plan. HSA funds roll over."),
            Document::new("dental.pdf", "Dental cleanings are covered twice a year."),
        ]);
        let provider = Arc::new(KeywordProvider);
        let corpus = Corpus::build(&source, provider.clone(), &config()).await.unwrap();

        assert!(corpus.len() >= 3);
        assert_eq!(corpus.document_names().into_iter().collect::<Vec<_>>(), vec!["dental.pdf", "hsa.pdf"]);

        let query = provider.embed("dental").await.unwrap();
        let hits = corpus.search(&query, 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(corpus.chunk(hits[0].chunk_index).unwrap().source_document, "dental.pdf");

        let ctx = corpus.context_for(&hits);
        assert!(ctx.text.starts_with("[1] Dental"));
        assert_eq!(ctx.sources.len(), 2);
    }

    #[tokio::test]
    async fn empty_source_gives_empty_corpus() {
        let corpus =
            Corpus::build(&StaticSource::default(), Arc::new(KeywordProvider), &config()).await.unwrap();
        assert!(corpus.is_empty());
        assert!(corpus.search(&[1.0, 0.0, 0.0], 5).unwrap().is_empty());
        assert!(corpus.context_for(&[]).is_empty());
    }
}
