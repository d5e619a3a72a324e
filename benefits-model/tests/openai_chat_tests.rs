//! HTTP-level tests for the OpenAI chat client.

use benefits_core::{CompletionRequest, LanguageModel, Message, ToolCall, ToolChoice, ToolDefinition};
use benefits_model::{OpenAIChatConfig, OpenAIChatModel};
use serde_json::{Value, json};
use wiremock::matchers::{bearer_token, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client pointed at the mock server; the base carries `/v1` like the real API base.
fn model(server: &MockServer) -> OpenAIChatModel {
    let base = format!("{}/v1", server.uri());
    OpenAIChatModel::new(OpenAIChatConfig::compatible("sk-test", base, "gpt-3.5-turbo")).unwrap()
}

fn completion_body(message: Value) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-3.5-turbo",
        "choices": [{"index": 0, "message": message, "finish_reason": "stop"}]
    })
}

#[tokio::test]
async fn returns_text_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(bearer_token("sk-test"))
        .and(body_partial_json(json!({"model": "gpt-3.5-turbo", "max_tokens": 150})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(json!({
            "role": "assistant",
            "content": "An HSA is a savings account."
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let request = CompletionRequest::new(vec![Message::user("What is an HSA?")]).with_max_tokens(150);
    let completion = model(&server).complete(request).await.unwrap();
    assert_eq!(completion.text_content(), Some("An HSA is a savings account."));
    assert!(completion.tool_calls.is_empty());
}

#[tokio::test]
async fn returns_tool_calls_when_tools_offered() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"tool_choice": "auto"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_1",
                "type": "function",
                "function": {"name": "lookup_benefit_term", "arguments": "{\"term\":\"HSA\"}"}
            }]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let tool = ToolDefinition {
        name: "lookup_benefit_term".into(),
        description: "Look up a benefits term".into(),
        parameters: json!({"type": "object", "properties": {"term": {"type": "string"}}}),
    };
    let request = CompletionRequest::new(vec![Message::user("Define HSA")])
        .with_tools(vec![tool], ToolChoice::Auto);
    let completion = model(&server).complete(request).await.unwrap();
    assert_eq!(
        completion.first_tool_call(),
        Some(&ToolCall::new("call_1", "lookup_benefit_term", "{\"term\":\"HSA\"}"))
    );
}

#[tokio::test]
async fn api_errors_become_model_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "message": "Incorrect API key provided",
                "type": "invalid_request_error",
                "param": null,
                "code": "invalid_api_key"
            }
        })))
        .mount(&server)
        .await;

    let err = model(&server)
        .complete(CompletionRequest::new(vec![Message::user("hi")]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Incorrect API key provided"), "{err}");
    assert!(err.to_string().contains("gpt-3.5-turbo"));
}

#[tokio::test]
async fn no_choices_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-2",
            "object": "chat.completion",
            "created": 1_700_000_000,
            "model": "gpt-3.5-turbo",
            "choices": []
        })))
        .mount(&server)
        .await;

    let err = model(&server)
        .complete(CompletionRequest::new(vec![Message::user("hi")]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no choices"));
}
