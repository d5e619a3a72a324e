//! OpenAI embedding provider using the embeddings API.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// The default OpenAI API base URL.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// The default model for embeddings.
const DEFAULT_MODEL: &str = "text-embedding-ada-002";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const PROVIDER: &str = "OpenAI";

/// An [`EmbeddingProvider`] backed by an OpenAI-compatible embeddings API.
///
/// # Configuration
///
/// - `model` – defaults to `text-embedding-ada-002`.
/// - `base_url` – API base including the version segment, defaults to
///   `https://api.openai.com/v1`; any compatible server works.
/// - `api_key` – from the constructor or the `OPENAI_API_KEY` environment variable.
///
/// # Example
///
/// ```rust,ignore
/// use benefits_rag::OpenAIEmbeddingProvider;
///
/// let provider = OpenAIEmbeddingProvider::new("sk-...")?.with_model("text-embedding-3-small");
/// let embedding = provider.embed("hello world").await?;
/// ```
#[derive(Debug, Clone)]
pub struct OpenAIEmbeddingProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAIEmbeddingProvider {
    /// Create a new provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::embedding(PROVIDER, "API key must not be empty"));
        }

        Ok(Self {
            client: http_client(DEFAULT_TIMEOUT)?,
            api_key,
            base_url: OPENAI_API_BASE.into(),
            model: DEFAULT_MODEL.into(),
        })
    }

    /// Replace the per-request timeout (default 60 s).
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = http_client(timeout)?;
        Ok(self)
    }

    /// Create a new provider using the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            RagError::embedding(PROVIDER, "OPENAI_API_KEY environment variable not set")
        })?;
        Self::new(api_key)
    }

    /// Set the model name (e.g. `text-embedding-3-small`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the provider at another OpenAI-compatible server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| RagError::embedding(PROVIDER, format!("failed to build HTTP client: {e}")))
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddingProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn dimensions(&self) -> Option<usize> {
        match self.model.as_str() {
            "text-embedding-ada-002" | "text-embedding-3-small" => Some(1536),
            "text-embedding-3-large" => Some(3072),
            _ => None,
        }
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(provider = PROVIDER, batch_size = texts.len(), model = %self.model, "embedding batch");

        let request_body = EmbeddingRequest { model: &self.model, input: texts };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = PROVIDER, error = %e, "request failed");
                RagError::embedding(PROVIDER, format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail =
                serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error.message).unwrap_or(body);

            error!(provider = PROVIDER, %status, "API error");
            return Err(RagError::embedding(PROVIDER, format!("API returned {status}: {detail}")));
        }

        let mut embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            RagError::embedding(PROVIDER, format!("failed to parse response: {e}"))
        })?;

        if embedding_response.data.len() != texts.len() {
            return Err(RagError::embedding(
                PROVIDER,
                format!("expected {} embeddings, got {}", texts.len(), embedding_response.data.len()),
            ));
        }

        // The API may answer out of order; `index` refers to the input position.
        embedding_response.data.sort_by_key(|d| d.index);
        Ok(embedding_response.data.into_iter().map(|d| d.embedding).collect())
    }
}
