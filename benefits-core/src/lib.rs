//! # benefits-core
//!
//! Types shared by every crate of the benefits assistant:
//!
//! - [`Message`] and [`Role`] — the conversation history sent to a model
//! - [`ToolCall`] and [`ToolDefinition`] — the tool-invocation protocol
//! - [`LanguageModel`] — the seam between the orchestrator and a chat model
//! - [`CoreError`] — failures reported by a language model backend

pub mod error;
pub mod llm;
pub mod message;

pub use error::{CoreError, Result};
pub use llm::{Completion, CompletionRequest, LanguageModel, ToolChoice};
pub use message::{Message, Role, ToolCall, ToolDefinition};
