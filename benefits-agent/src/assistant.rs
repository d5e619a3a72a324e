//! The answering orchestrator.
//!
//! ```text
//! query → embed → search → assemble context → model ⇄ tools (bounded) → Answer
//! ```

use std::sync::Arc;
use std::time::Instant;

use benefits_core::{CompletionRequest, LanguageModel, Message, ToolChoice};
use benefits_rag::{Corpus, EmbeddingProvider};
use benefits_tool::ToolRegistry;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::AssistantConfig;
use crate::error::{AgentError, Result};
use crate::prompt::{FALLBACK_ANSWER, system_message, user_message};
use crate::stage::AnswerStage;

/// A grounded answer and the documents it drew on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    /// `sources[i]` is the document cited by context marker `[i + 1]`.
    pub sources: Vec<String>,
}

/// Answers benefits questions over a prebuilt corpus.
///
/// Holds only shared, read-only state; one instance serves concurrent
/// requests. Construct it with [`BenefitsAssistant::builder()`].
pub struct BenefitsAssistant {
    corpus: Arc<Corpus>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    model: Arc<dyn LanguageModel>,
    tools: ToolRegistry,
    config: AssistantConfig,
}

impl BenefitsAssistant {
    pub fn builder() -> BenefitsAssistantBuilder {
        BenefitsAssistantBuilder::default()
    }

    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Answer `query`.
    ///
    /// # Errors
    ///
    /// [`AgentError::EmptyQuery`] for a blank query; otherwise the failure of
    /// the embedding, search or model step. Tool failures never surface here.
    pub async fn answer(&self, query: &str) -> Result<Answer> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AgentError::EmptyQuery);
        }
        let started = Instant::now();
        let mut stage = AnswerStage::Received;
        debug!(%stage, query_len = query.len(), "answering");

        let result = self.run(query, &mut stage).await;
        match &result {
            Ok(answer) => {
                debug!(stage = %AnswerStage::Responded, "answer ready");
                info!(
                    sources = answer.sources.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "answered query"
                );
            }
            Err(e) => {
                error!(failed_stage = %stage, stage = %AnswerStage::Failed, error = %e, "answer failed");
            }
        }
        result
    }

    async fn run(&self, query: &str, stage: &mut AnswerStage) -> Result<Answer> {
        advance(stage, AnswerStage::EmbeddingQuery);
        let vector = self.embedding_provider.embed(query).await.map_err(AgentError::Embedding)?;

        advance(stage, AnswerStage::Searching);
        let hits = self.corpus.search(&vector, self.config.top_k).map_err(AgentError::Search)?;

        advance(stage, AnswerStage::AssemblingContext);
        let context = self.corpus.context_for(&hits);
        debug!(hits = hits.len(), context_len = context.text.len(), "context assembled");

        let definitions = self.tools.definitions();
        let mut messages = vec![
            system_message(!definitions.is_empty() && self.config.max_tool_rounds > 0),
            user_message(&context.text, query),
        ];

        let mut rounds = 0;
        let mut call_number = 1;
        loop {
            advance(stage, AnswerStage::ModelCall(call_number));
            let offer_tools = rounds < self.config.max_tool_rounds && !definitions.is_empty();
            let mut request = CompletionRequest::new(messages.clone())
                .with_temperature(self.config.temperature)
                .with_max_tokens(self.config.max_tokens);
            if offer_tools {
                request = request.with_tools(definitions.clone(), ToolChoice::Auto);
            }
            let completion = self.model.complete(request).await?;

            let call = match completion.first_tool_call() {
                Some(call) if offer_tools => call.clone(),
                _ => {
                    let answer = completion.text_content().unwrap_or(FALLBACK_ANSWER).to_string();
                    return Ok(Answer { answer, sources: context.sources });
                }
            };

            advance(stage, AnswerStage::ToolDispatch(call_number));
            if completion.tool_calls.len() > 1 {
                debug!(ignored = completion.tool_calls.len() - 1, "servicing only the first tool call");
            }
            let output = self.tools.dispatch(&call).await;
            messages.push(Message::assistant_tool_calls(completion.content.clone(), vec![call.clone()]));
            messages.push(Message::tool_result(call.id, output));

            rounds += 1;
            call_number += 1;
        }
    }
}

fn advance(stage: &mut AnswerStage, next: AnswerStage) {
    debug!(from = %stage, to = %next, "stage transition");
    *stage = next;
}

/// Builder for [`BenefitsAssistant`].
///
/// Corpus, embedding provider and model are required; tools default to an
/// empty registry and options to [`AssistantConfig::default()`].
#[derive(Default)]
pub struct BenefitsAssistantBuilder {
    corpus: Option<Arc<Corpus>>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    model: Option<Arc<dyn LanguageModel>>,
    tools: Option<ToolRegistry>,
    config: Option<AssistantConfig>,
}

impl BenefitsAssistantBuilder {
    pub fn corpus(mut self, corpus: Arc<Corpus>) -> Self {
        self.corpus = Some(corpus);
        self
    }

    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    pub fn model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn config(mut self, config: AssistantConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// # Errors
    ///
    /// Returns [`AgentError::ConfigError`] if a required part is missing.
    pub fn build(self) -> Result<BenefitsAssistant> {
        let corpus =
            self.corpus.ok_or_else(|| AgentError::ConfigError("corpus is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| AgentError::ConfigError("embedding_provider is required".to_string()))?;
        let model =
            self.model.ok_or_else(|| AgentError::ConfigError("model is required".to_string()))?;

        Ok(BenefitsAssistant {
            corpus,
            embedding_provider,
            model,
            tools: self.tools.unwrap_or_default(),
            config: self.config.unwrap_or_default(),
        })
    }
}
