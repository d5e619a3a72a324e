//! Command line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use benefits_agent::AssistantConfig;
use benefits_rag::{RagConfig, RagError};
use clap::Parser;

/// Every flag can also be set through the environment variable named next to
/// it; a `.env` file in the working directory is read first.
#[derive(Debug, Clone, Parser)]
#[command(name = "benefits-server", version, about = "Employee benefits assistant HTTP server")]
pub struct ServerConfig {
    /// Address to listen on.
    #[arg(long, env = "BENEFITS_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "BENEFITS_PORT", default_value_t = 5001)]
    pub port: u16,

    /// Folder of PDF documents indexed at startup.
    #[arg(long, env = "BENEFITS_PDF_FOLDER", default_value = "./pdfs")]
    pub pdf_folder: PathBuf,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: String,

    /// Base URL of the OpenAI-compatible API, including the version segment
    /// (`http://localhost:8000/v1` for a local server).
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub openai_base_url: String,

    #[arg(long, env = "BENEFITS_CHAT_MODEL", default_value = "gpt-3.5-turbo")]
    pub chat_model: String,

    #[arg(long, env = "BENEFITS_EMBEDDING_MODEL", default_value = "text-embedding-ada-002")]
    pub embedding_model: String,

    /// Chunk size in characters.
    #[arg(long, env = "BENEFITS_CHUNK_SIZE", default_value_t = 1000)]
    pub chunk_size: usize,

    #[arg(long, env = "BENEFITS_CHUNK_OVERLAP", default_value_t = 200)]
    pub chunk_overlap: usize,

    /// Chunks retrieved per question.
    #[arg(long, env = "BENEFITS_TOP_K", default_value_t = 5)]
    pub top_k: usize,

    #[arg(long, env = "BENEFITS_EMBED_BATCH_SIZE", default_value_t = 16)]
    pub embed_batch_size: usize,

    /// Embedding requests in flight while indexing.
    #[arg(long, env = "BENEFITS_EMBED_CONCURRENCY", default_value_t = 1)]
    pub embed_concurrency: usize,

    #[arg(long, env = "BENEFITS_TEMPERATURE", default_value_t = 0.2)]
    pub temperature: f32,

    #[arg(long, env = "BENEFITS_MAX_TOKENS", default_value_t = 150)]
    pub max_tokens: u32,

    /// Tool calls serviced per question before a text answer is required.
    #[arg(long, env = "BENEFITS_MAX_TOOL_ROUNDS", default_value_t = 1)]
    pub max_tool_rounds: usize,

    /// OAuth access token for Google Calendar. Without it scheduling always
    /// fails with the apology message.
    #[arg(long, env = "GOOGLE_CALENDAR_TOKEN", hide_env_values = true)]
    pub google_calendar_token: Option<String>,

    #[arg(long, env = "BENEFITS_CALENDAR_ID", default_value = "primary")]
    pub calendar_id: String,

    /// Time zone of scheduled appointments.
    #[arg(long, env = "BENEFITS_TIMEZONE", default_value = "America/Los_Angeles")]
    pub timezone: String,

    /// Timeout of each call to an external service, in seconds.
    #[arg(long, env = "BENEFITS_REQUEST_TIMEOUT_SECS", default_value_t = 60)]
    pub request_timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error); `RUST_LOG` wins if set.
    #[arg(long, env = "BENEFITS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, env = "BENEFITS_LOG_JSON", default_value_t = false)]
    pub log_json: bool,
}

impl ServerConfig {
    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validated corpus settings.
    pub fn rag_config(&self) -> Result<RagConfig, RagError> {
        RagConfig::builder()
            .chunk_size(self.chunk_size)
            .chunk_overlap(self.chunk_overlap)
            .embed_batch_size(self.embed_batch_size)
            .embed_concurrency(self.embed_concurrency)
            .build()
    }

    /// Answering settings; at least one chunk must be retrieved per question.
    pub fn assistant_config(&self) -> anyhow::Result<AssistantConfig> {
        if self.top_k == 0 {
            anyhow::bail!("top_k must be greater than zero");
        }
        Ok(AssistantConfig::default()
            .with_top_k(self.top_k)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
            .with_max_tool_rounds(self.max_tool_rounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ServerConfig {
        ServerConfig::try_parse_from(std::iter::once("benefits-server").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&["--openai-api-key", "sk-test", "--port", "8080", "--top-k", "3"]);
        assert_eq!(config.listen_addr().unwrap().port(), 8080);
        assert_eq!(config.assistant_config().unwrap().top_k, 3);
        assert_eq!(config.openai_api_key, "sk-test");
    }

    #[test]
    fn default_base_url_carries_version_segment() {
        let config = parse(&["--openai-api-key", "k"]);
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
        assert_eq!(config.openai_base_url, benefits_model::OPENAI_API_BASE);
        assert_eq!(config.openai_base_url, benefits_rag::OPENAI_API_BASE);
    }

    #[test]
    fn zero_top_k_is_rejected() {
        let config = parse(&["--openai-api-key", "k", "--top-k", "0"]);
        assert!(config.assistant_config().is_err());
        assert!(config.rag_config().is_ok());
    }

    #[test]
    fn invalid_chunking_is_rejected() {
        let config = parse(&["--openai-api-key", "k", "--chunk-size", "100", "--chunk-overlap", "100"]);
        assert!(config.rag_config().is_err());
    }
}
