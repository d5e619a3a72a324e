//! Embedding providers and order-preserving batched embedding.

use std::sync::Arc;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt, stream};
use tracing::debug;

use crate::error::{RagError, Result};

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap a specific embedding backend behind a unified async
/// interface. [`embed_batch`](EmbeddingProvider::embed_batch) must return one
/// vector per input, in input order.
///
/// # Example
///
/// ```rust,ignore
/// use benefits_rag::EmbeddingProvider;
///
/// let vectors = provider.embed_batch(&["hello", "world"]).await?;
/// assert_eq!(vectors.len(), 2);
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name used in logs and errors.
    fn name(&self) -> &str;

    /// Dimensionality of the vectors this provider returns, when known up
    /// front.
    fn dimensions(&self) -> Option<usize> {
        None
    }

    /// Generate embedding vectors for a batch of text inputs.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Generate an embedding vector for a single text input.
    ///
    /// The default implementation sends a batch of one.
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text]).await?;
        if vectors.len() != 1 {
            return Err(RagError::embedding(
                self.name(),
                format!("expected 1 embedding, got {}", vectors.len()),
            ));
        }
        Ok(vectors.remove(0))
    }
}

/// Embeds arbitrarily many texts through an [`EmbeddingProvider`] in
/// fixed-size batches.
///
/// Batch boundaries never affect the output: the result holds exactly one
/// vector per input text, in input order. With `concurrency > 1` up to that
/// many batches are in flight at once and their results are reassembled in
/// order.
#[derive(Clone)]
pub struct BatchEmbedder {
    provider: Arc<dyn EmbeddingProvider>,
    batch_size: usize,
    concurrency: usize,
}

impl BatchEmbedder {
    /// Create a sequential embedder. A `batch_size` of zero is treated as one.
    pub fn new(provider: Arc<dyn EmbeddingProvider>, batch_size: usize) -> Self {
        Self { provider, batch_size: batch_size.max(1), concurrency: 1 }
    }

    /// Allow up to `concurrency` batches in flight (minimum one).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.provider
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Embed `texts`, one vector per text, in order.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmbeddingError`] if any batch fails or a batch
    /// comes back with the wrong number of vectors. Nothing is retried.
    pub async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let batches = texts.chunks(self.batch_size).enumerate().map(|(batch_index, batch)| {
            let provider = Arc::clone(&self.provider);
            async move {
                debug!(provider = provider.name(), batch_index, batch_size = batch.len(), "embedding batch");
                let vectors = provider.embed_batch(batch).await?;
                if vectors.len() != batch.len() {
                    return Err(RagError::embedding(
                        provider.name(),
                        format!(
                            "batch {batch_index}: expected {} embeddings, got {}",
                            batch.len(),
                            vectors.len()
                        ),
                    ));
                }
                Ok(vectors)
            }
        });

        let per_batch: Vec<Vec<Vec<f32>>> =
            stream::iter(batches).buffered(self.concurrency).try_collect().await?;

        Ok(per_batch.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Encodes each text as `[len, first byte]` and records batch sizes.
    #[derive(Default)]
    struct RecordingProvider {
        batches: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl EmbeddingProvider for RecordingProvider {
        fn name(&self) -> &str {
            "recording"
        }

        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            self.batches.lock().unwrap().push(texts.len());
            Ok(texts
                .iter()
                .map(|t| vec![t.len() as f32, t.bytes().next().unwrap_or(0) as f32])
                .collect())
        }
    }

    struct ShortProvider;

    #[async_trait]
    impl EmbeddingProvider for ShortProvider {
        fn name(&self) -> &str {
            "short"
        }

        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().skip(1).map(|_| vec![1.0]).collect())
        }
    }

    fn inputs(n: usize) -> Vec<String> {
        (0..n).map(|i| "x".repeat(i + 1)).collect()
    }

    #[tokio::test]
    async fn splits_into_batches_and_preserves_order() {
        let provider = Arc::new(RecordingProvider::default());
        let embedder = BatchEmbedder::new(provider.clone(), 16);
        let owned = inputs(40);
        let texts: Vec<&str> = owned.iter().map(String::as_str).collect();

        let vectors = embedder.embed(&texts).await.unwrap();

        assert_eq!(vectors.len(), 40);
        for (i, v) in vectors.iter().enumerate() {
            assert_eq!(v[0], (i + 1) as f32);
        }
        assert_eq!(*provider.batches.lock().unwrap(), vec![16, 16, 8]);
    }

    #[tokio::test]
    async fn concurrent_batches_keep_input_order() {
        let provider = Arc::new(RecordingProvider::default());
        let sequential = BatchEmbedder::new(provider.clone(), 3);
        let concurrent = BatchEmbedder::new(provider, 3).with_concurrency(4);
        let owned = inputs(20);
        let texts: Vec<&str> = owned.iter().map(String::as_str).collect();

        assert_eq!(
            sequential.embed(&texts).await.unwrap(),
            concurrent.embed(&texts).await.unwrap()
        );
    }

    #[tokio::test]
    async fn empty_input_makes_no_call() {
        let provider = Arc::new(RecordingProvider::default());
        let embedder = BatchEmbedder::new(provider.clone(), 16);
        assert!(embedder.embed(&[]).await.unwrap().is_empty());
        assert!(provider.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn mismatched_count_is_an_embedding_error() {
        let embedder = BatchEmbedder::new(Arc::new(ShortProvider), 16);
        let err = embedder.embed(&["a", "b"]).await.unwrap_err();
        assert!(matches!(err, RagError::EmbeddingError { ref provider, .. } if provider == "short"));
    }

    #[tokio::test]
    async fn default_embed_rejects_wrong_count() {
        let err = ShortProvider.embed("only").await.unwrap_err();
        assert!(err.to_string().contains("expected 1 embedding"));
    }
}
