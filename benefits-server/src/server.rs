use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use benefits_agent::{Answer, BenefitsAssistant};
use benefits_model::{OpenAIChatConfig, OpenAIChatModel};
use benefits_rag::{Corpus, EmbeddingProvider, OpenAIEmbeddingProvider, PdfDirectorySource};
use benefits_tool::{CalendarService, GoogleCalendarClient, ToolRegistry, UnconfiguredCalendar};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::ServerConfig;

const MISSING_QUERY: &str = "Missing 'query' field.";

#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<BenefitsAssistant>,
}

impl AppState {
    pub fn new(assistant: BenefitsAssistant) -> Self {
        Self { assistant: Arc::new(assistant) }
    }
}

pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/chat", post(chat))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Index the PDF folder and build the assistant with its external clients.
pub async fn build_state(config: &ServerConfig) -> anyhow::Result<AppState> {
    let rag_config = config.rag_config().context("invalid corpus settings")?;
    let assistant_config = config.assistant_config().context("invalid answering settings")?;

    let embeddings: Arc<dyn EmbeddingProvider> = Arc::new(
        OpenAIEmbeddingProvider::new(config.openai_api_key.clone())
            .context("failed to create embedding client")?
            .with_model(config.embedding_model.clone())
            .with_base_url(config.openai_base_url.clone())
            .with_timeout(config.request_timeout())
            .context("failed to create embedding client")?,
    );

    let started = Instant::now();
    let source = PdfDirectorySource::new(config.pdf_folder.clone());
    let corpus = Corpus::build(&source, embeddings.clone(), &rag_config)
        .await
        .with_context(|| format!("failed to index {}", config.pdf_folder.display()))?;
    info!(
        chunks = corpus.len(),
        documents = corpus.document_names().len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "corpus ready"
    );

    let model = OpenAIChatModel::new(
        OpenAIChatConfig::new(config.openai_api_key.clone(), config.chat_model.clone())
            .with_base_url(config.openai_base_url.clone())
            .with_timeout(config.request_timeout()),
    )
    .context("failed to create chat client")?;

    let calendar: Arc<dyn CalendarService> = match config.google_calendar_token.as_deref() {
        Some(token) if !token.is_empty() => Arc::new(
            GoogleCalendarClient::new(token)
                .context("failed to create calendar client")?
                .with_calendar_id(config.calendar_id.clone()),
        ),
        _ => {
            warn!("GOOGLE_CALENDAR_TOKEN not set; appointment scheduling is disabled");
            Arc::new(UnconfiguredCalendar)
        }
    };
    let tools = ToolRegistry::benefits_default(calendar, config.timezone.clone())
        .context("failed to register tools")?;

    let assistant = BenefitsAssistant::builder()
        .corpus(Arc::new(corpus))
        .embedding_provider(embeddings)
        .model(Arc::new(model))
        .tools(tools)
        .config(assistant_config)
        .build()?;
    Ok(AppState::new(assistant))
}

/// Build everything and serve until Ctrl-C.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.listen_addr()?;
    let state = build_state(&config).await?;
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("benefits-server listening on http://{}", addr);
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("benefits-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
}

enum ApiError {
    MissingQuery,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MissingQuery => (StatusCode::BAD_REQUEST, MISSING_QUERY.to_string()),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// The body is parsed by hand so that malformed JSON gets the same 400 as a
/// missing field.
fn query_from_body(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let query = value.get("query")?.as_str()?;
    (!query.trim().is_empty()).then(|| query.to_string())
}

async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Json<Answer>, ApiError> {
    let query = query_from_body(&body).ok_or(ApiError::MissingQuery)?;

    match state.assistant.answer(&query).await {
        Ok(answer) => Ok(Json(answer)),
        Err(e) if e.is_user_error() => Err(ApiError::MissingQuery),
        Err(e) => {
            error!(error = %e, "chat request failed");
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "status": "ok", "chunks": state.assistant.corpus().len() }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_extraction() {
        assert_eq!(query_from_body(br#"{"query":"What is an HSA?"}"#).as_deref(), Some("What is an HSA?"));
        assert_eq!(query_from_body(b"{}"), None);
        assert_eq!(query_from_body(br#"{"query":"   "}"#), None);
        assert_eq!(query_from_body(br#"{"query":42}"#), None);
        assert_eq!(query_from_body(b"not json"), None);
        assert_eq!(query_from_body(b""), None);
    }
}
