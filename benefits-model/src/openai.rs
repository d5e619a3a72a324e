//! OpenAI chat-completions client built on `async-openai`.
//!
//! `base_url` is the API base including the version segment
//! (`https://api.openai.com/v1`), which also covers OpenAI-compatible servers
//! such as vLLM, Ollama or LiteLLM.

use std::time::Duration;

use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
        ChatCompletionResponseMessage, ChatCompletionTool, ChatCompletionToolArgs,
        ChatCompletionToolChoiceOption, ChatCompletionToolType, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs, FunctionCall, FunctionObjectArgs,
    },
};
use async_trait::async_trait;
use benefits_core::{
    Completion, CompletionRequest, CoreError, LanguageModel, Message, Role, ToolCall, ToolChoice,
    ToolDefinition,
};
use tracing::{debug, error};

/// The default OpenAI API base, version segment included.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Configuration for [`OpenAIChatModel`].
#[derive(Debug, Clone)]
pub struct OpenAIChatConfig {
    pub api_key: String,
    pub model: String,
    /// API base including `/v1`; requests go to `{base_url}/chat/completions`.
    pub base_url: String,
    pub timeout: Duration,
}

impl OpenAIChatConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: OPENAI_API_BASE.into(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Configuration for an OpenAI-compatible server.
    pub fn compatible(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self::new(api_key, model).with_base_url(base_url)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A [`LanguageModel`] backed by the OpenAI chat-completions API.
///
/// Rate-limited requests are retried by `async-openai` before an error is
/// reported.
#[derive(Debug, Clone)]
pub struct OpenAIChatModel {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAIChatModel {
    /// Create a new client.
    pub fn new(config: OpenAIChatConfig) -> Result<Self, CoreError> {
        if config.api_key.is_empty() {
            return Err(CoreError::model(&config.model, "API key must not be empty"));
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CoreError::model(&config.model, format!("failed to build HTTP client: {e}")))?;
        let openai_config =
            OpenAIConfig::new().with_api_key(&config.api_key).with_api_base(&config.base_url);

        Ok(Self { client: Client::with_config(openai_config).with_http_client(http), model: config.model })
    }

    fn error(&self, message: impl Into<String>) -> CoreError {
        CoreError::model(&self.model, message)
    }
}

// ── Conversion ─────────────────────────────────────────────────────

fn to_openai_message(message: &Message) -> Result<ChatCompletionRequestMessage, OpenAIError> {
    let content = message.content.clone().unwrap_or_default();
    let converted = match message.role {
        Role::System => ChatCompletionRequestSystemMessageArgs::default().content(content).build()?.into(),
        Role::User => ChatCompletionRequestUserMessageArgs::default().content(content).build()?.into(),
        Role::Assistant => {
            let mut builder = ChatCompletionRequestAssistantMessageArgs::default();
            if let Some(text) = &message.content {
                builder.content(text.clone());
            }
            if !message.tool_calls.is_empty() {
                builder.tool_calls(message.tool_calls.iter().map(to_openai_tool_call).collect::<Vec<_>>());
            }
            builder.build()?.into()
        }
        Role::Tool => ChatCompletionRequestToolMessageArgs::default()
            .content(content)
            .tool_call_id(message.tool_call_id.clone().unwrap_or_default())
            .build()?
            .into(),
    };
    Ok(converted)
}

fn to_openai_tool_call(call: &ToolCall) -> ChatCompletionMessageToolCall {
    ChatCompletionMessageToolCall {
        id: call.id.clone(),
        r#type: ChatCompletionToolType::Function,
        function: FunctionCall { name: call.name.clone(), arguments: call.arguments.clone() },
    }
}

fn to_openai_tool(tool: &ToolDefinition) -> Result<ChatCompletionTool, OpenAIError> {
    ChatCompletionToolArgs::default()
        .r#type(ChatCompletionToolType::Function)
        .function(
            FunctionObjectArgs::default()
                .name(tool.name.clone())
                .description(tool.description.clone())
                .parameters(tool.parameters.clone())
                .build()?,
        )
        .build()
}

fn build_request(model: &str, request: &CompletionRequest) -> Result<CreateChatCompletionRequest, OpenAIError> {
    let messages = request.messages.iter().map(to_openai_message).collect::<Result<Vec<_>, _>>()?;

    let mut builder = CreateChatCompletionRequestArgs::default();
    builder.model(model).messages(messages);

    if !request.tools.is_empty() {
        let tools = request.tools.iter().map(to_openai_tool).collect::<Result<Vec<_>, _>>()?;
        builder.tools(tools).tool_choice(match request.tool_choice {
            ToolChoice::Auto => ChatCompletionToolChoiceOption::Auto,
            ToolChoice::None => ChatCompletionToolChoiceOption::None,
        });
    }
    if let Some(temperature) = request.temperature {
        builder.temperature(temperature);
    }
    if let Some(max_tokens) = request.max_tokens {
        builder.max_tokens(max_tokens);
    }
    builder.build()
}

fn from_openai_message(message: ChatCompletionResponseMessage) -> Completion {
    Completion {
        content: message.content,
        tool_calls: message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolCall::new(call.id, call.function.name, call.function.arguments))
            .collect(),
    }
}

#[async_trait]
impl LanguageModel for OpenAIChatModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> benefits_core::Result<Completion> {
        let openai_request = build_request(&self.model, &request)
            .map_err(|e| self.error(format!("failed to build request: {e}")))?;
        debug!(
            model = %self.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "chat completion request"
        );

        let response = self.client.chat().create(openai_request).await.map_err(|e| {
            error!(model = %self.model, error = %e, "chat completion failed");
            self.error(format!("OpenAI API error: {e}"))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| self.error("response contained no choices"))?;

        let completion = from_openai_message(choice.message);
        debug!(
            has_content = completion.content.is_some(),
            tool_calls = completion.tool_calls.len(),
            "chat completion response"
        );
        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn to_json(request: &CompletionRequest) -> Value {
        serde_json::to_value(build_request("gpt", request).unwrap()).unwrap()
    }

    #[test]
    fn request_includes_tools_only_when_offered() {
        let plain = CompletionRequest::new(vec![Message::user("hi")]).with_temperature(0.2);
        let value = to_json(&plain);
        assert_eq!(value["model"], "gpt");
        assert_eq!(value["messages"], json!([{"role": "user", "content": "hi"}]));
        assert!(value.get("tools").is_none());
        assert!(value.get("tool_choice").is_none());

        let tool = ToolDefinition {
            name: "lookup".into(),
            description: "Look up".into(),
            parameters: json!({"type": "object"}),
        };
        let with_tools = CompletionRequest::new(vec![Message::user("hi")])
            .with_tools(vec![tool], ToolChoice::Auto)
            .with_max_tokens(150);
        let value = to_json(&with_tools);
        assert_eq!(value["tool_choice"], "auto");
        assert_eq!(value["max_tokens"], 150);
        assert_eq!(value["tools"][0]["type"], "function");
        assert_eq!(value["tools"][0]["function"]["name"], "lookup");
        assert_eq!(value["tools"][0]["function"]["parameters"], json!({"type": "object"}));
    }

    #[test]
    fn tool_turns_carry_the_call_id() {
        let call = ToolCall::new("call_1", "lookup", r#"{"term":"HSA"}"#);
        let request = CompletionRequest::new(vec![
            Message::system("be brief"),
            Message::assistant_tool_calls(None, vec![call]),
            Message::tool_result("call_1", "ok"),
        ]);
        let messages = &to_json(&request)["messages"];

        assert_eq!(messages[0], json!({"role": "system", "content": "be brief"}));
        assert_eq!(messages[1]["role"], "assistant");
        assert!(messages[1].get("content").is_none_or(Value::is_null));
        assert_eq!(messages[1]["tool_calls"][0]["id"], "call_1");
        assert_eq!(messages[1]["tool_calls"][0]["function"]["arguments"], r#"{"term":"HSA"}"#);
        assert_eq!(messages[2], json!({"role": "tool", "content": "ok", "tool_call_id": "call_1"}));
    }

    #[test]
    fn parses_tool_call_response() {
        let message: ChatCompletionResponseMessage = serde_json::from_value(json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_9",
                "type": "function",
                "function": {"name": "lookup_benefit_term", "arguments": "{\"term\":\"PPO\"}"}
            }]
        }))
        .unwrap();
        let completion = from_openai_message(message);
        assert_eq!(completion.content, None);
        assert_eq!(
            completion.first_tool_call(),
            Some(&ToolCall::new("call_9", "lookup_benefit_term", "{\"term\":\"PPO\"}"))
        );
    }

    #[test]
    fn base_url_includes_version_segment() {
        assert_eq!(OpenAIChatConfig::new("k", "gpt").base_url, "https://api.openai.com/v1");
        let config = OpenAIChatConfig::compatible("k", "http://localhost:8000/v1/", "local");
        assert_eq!(config.base_url, "http://localhost:8000/v1");
    }

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(OpenAIChatModel::new(OpenAIChatConfig::new("", "gpt")).is_err());
    }
}
