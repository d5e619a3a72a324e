//! Scripted language model for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use benefits_core::{Completion, CompletionRequest, CoreError, LanguageModel};

/// A [`LanguageModel`] that replays queued replies and records every request.
///
/// When the queue runs dry it answers with `fallback` text.
///
/// ```rust,ignore
/// let llm = MockLlm::new("mock")
///     .with_reply(Completion::tool_call(ToolCall::new("c1", "lookup_benefit_term", r#"{"term":"HSA"}"#)))
///     .with_reply(Completion::text("An HSA is a savings account."));
/// ```
#[derive(Debug)]
pub struct MockLlm {
    name: String,
    replies: Mutex<VecDeque<Result<Completion, String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
    fallback: String,
}

impl MockLlm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            fallback: "I don't know.".into(),
        }
    }

    /// Queue a successful reply.
    pub fn with_reply(self, completion: Completion) -> Self {
        self.lock_replies().push_back(Ok(completion));
        self
    }

    /// Queue a failure.
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.lock_replies().push_back(Err(message.into()));
        self
    }

    /// Text returned once the queue is empty.
    pub fn with_fallback(mut self, text: impl Into<String>) -> Self {
        self.fallback = text.into();
        self
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<Completion, String>>> {
        self.replies.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl LanguageModel for MockLlm {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: CompletionRequest) -> benefits_core::Result<Completion> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).push(request);
        match self.lock_replies().pop_front() {
            Some(Ok(completion)) => Ok(completion),
            Some(Err(message)) => Err(CoreError::model(&self.name, message)),
            None => Ok(Completion::text(self.fallback.clone())),
        }
    }
}
