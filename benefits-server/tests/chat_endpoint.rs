use std::sync::Arc;

use async_trait::async_trait;
use benefits_agent::BenefitsAssistant;
use benefits_core::{Completion, ToolCall};
use benefits_model::MockLlm;
use benefits_rag::{Corpus, Document, EmbeddingProvider, RagConfig};
use benefits_server::{AppState, app_router};
use benefits_tool::{ToolRegistry, UnconfiguredCalendar};
use serde_json::{Value, json};

struct KeywordProvider;

#[async_trait]
impl EmbeddingProvider for KeywordProvider {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn embed_batch(&self, texts: &[&str]) -> benefits_rag::Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                let t = t.to_lowercase();
                vec![t.matches("hsa").count() as f32, t.matches("ppo").count() as f32, 0.1]
            })
            .collect())
    }
}

const DOCUMENTS: [&str; 2] = ["hsa_guide.pdf", "ppo_plan.pdf"];

async fn spawn_server(model: MockLlm) -> (String, tokio::task::JoinHandle<()>) {
    let documents = vec![
        Document::new(DOCUMENTS[0], "An HSA lets you save pre-tax money for medical expenses."),
        Document::new(DOCUMENTS[1], "The PPO plan lets you see any provider."),
    ];
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(KeywordProvider);
    let corpus = Corpus::from_documents(&documents, provider.clone(), &RagConfig::default()).await.unwrap();
    let assistant = BenefitsAssistant::builder()
        .corpus(Arc::new(corpus))
        .embedding_provider(provider)
        .model(Arc::new(model))
        .tools(ToolRegistry::benefits_default(Arc::new(UnconfiguredCalendar), "America/Los_Angeles").unwrap())
        .build()
        .unwrap();
    let app = app_router(AppState::new(assistant));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });
    (format!("http://{}", addr), handle)
}

#[tokio::test]
async fn chat_answers_with_known_sources() {
    let (base, handle) =
        spawn_server(MockLlm::new("mock").with_reply(Completion::text("You can save pre-tax money."))).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/chat"))
        .json(&json!({"query": "What is an HSA?"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["answer"], "You can save pre-tax money.");
    let sources = body["sources"].as_array().unwrap();
    assert!(!sources.is_empty());
    assert!(sources.iter().all(|s| DOCUMENTS.contains(&s.as_str().unwrap())));
    assert_eq!(sources[0], "hsa_guide.pdf");

    handle.abort();
}

#[tokio::test]
async fn chat_runs_tool_round() {
    let model = MockLlm::new("mock")
        .with_reply(Completion::tool_call(ToolCall::new("c1", "lookup_benefit_term", r#"{"term":"PPO"}"#)))
        .with_reply(Completion::text("A PPO is a type of health insurance plan."));
    let (base, handle) = spawn_server(model).await;

    let body: Value = reqwest::Client::new()
        .post(format!("{base}/chat"))
        .json(&json!({"query": "What is a PPO?"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["answer"], "A PPO is a type of health insurance plan.");

    handle.abort();
}

#[tokio::test]
async fn missing_or_invalid_query_is_bad_request() {
    let (base, handle) = spawn_server(MockLlm::new("mock")).await;
    let client = reqwest::Client::new();

    for body in [r#"{}"#, r#"{"query":""}"#, r#"{"query":"  "}"#, r#"{"query":7}"#, "not json"] {
        let response = client
            .post(format!("{base}/chat"))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400, "body {body}");
        let error: Value = response.json().await.unwrap();
        assert_eq!(error, json!({"error": "Missing 'query' field."}));
    }

    handle.abort();
}

#[tokio::test]
async fn model_failure_is_internal_error() {
    let (base, handle) = spawn_server(MockLlm::new("mock").with_error("upstream unavailable")).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/chat"))
        .json(&json!({"query": "What is an HSA?"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("upstream unavailable"));

    handle.abort();
}

#[tokio::test]
async fn health_reports_corpus_size() {
    let (base, handle) = spawn_server(MockLlm::new("mock")).await;

    let body: Value = reqwest::get(format!("{base}/health")).await.unwrap().json().await.unwrap();
    assert_eq!(body, json!({"status": "ok", "chunks": 2}));

    handle.abort();
}
