//! The language model seam.

use async_trait::async_trait;

use crate::error::Result;
use crate::message::{Message, ToolCall, ToolDefinition};

/// How the model may use the tools offered with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolChoice {
    /// The model decides whether to call a tool.
    #[default]
    Auto,
    /// The model must answer in text.
    None,
}

impl ToolChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolChoice::Auto => "auto",
            ToolChoice::None => "none",
        }
    }
}

/// A single chat completion request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
    pub tool_choice: ToolChoice,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages, ..Default::default() }
    }

    /// Offer `tools` to the model with the given selection mode.
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>, tool_choice: ToolChoice) -> Self {
        self.tools = tools;
        self.tool_choice = tool_choice;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// The model's reply: text content, tool calls, or both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

impl Completion {
    /// A plain text reply.
    pub fn text(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), tool_calls: Vec::new() }
    }

    /// A reply requesting a single tool call.
    pub fn tool_call(call: ToolCall) -> Self {
        Self { content: None, tool_calls: vec![call] }
    }

    /// The first requested tool call, if any.
    pub fn first_tool_call(&self) -> Option<&ToolCall> {
        self.tool_calls.first()
    }

    /// Trimmed text content; `None` when absent or blank.
    pub fn text_content(&self) -> Option<&str> {
        self.content.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// A chat model that can answer a conversation and request tool calls.
///
/// Implementations wrap a specific backend (an OpenAI-compatible API, a
/// scripted mock) behind one async interface.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Name of the underlying model, used in logs and errors.
    fn name(&self) -> &str;

    /// Run one completion round.
    async fn complete(&self, request: CompletionRequest) -> Result<Completion>;
}
