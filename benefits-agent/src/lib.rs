//! # benefits-agent
//!
//! The answering orchestrator. For every question a [`BenefitsAssistant`]
//!
//! 1. embeds the trimmed query,
//! 2. searches the shared [`Corpus`](benefits_rag::Corpus),
//! 3. assembles a cited context,
//! 4. asks the language model, servicing at most `max_tool_rounds` tool calls
//!    through the [`ToolRegistry`](benefits_tool::ToolRegistry),
//!
//! and returns an [`Answer`] with the source document of every cited chunk.

pub mod assistant;
pub mod config;
pub mod error;
pub mod prompt;
pub mod stage;

pub use assistant::{Answer, BenefitsAssistant, BenefitsAssistantBuilder};
pub use config::AssistantConfig;
pub use error::{AgentError, Result};
pub use stage::AnswerStage;
