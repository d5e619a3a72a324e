//! Per-request answering options.

use serde::{Deserialize, Serialize};

/// Options applied to every answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Number of chunks retrieved per query.
    pub top_k: usize,
    /// Sampling temperature of every model call.
    pub temperature: f32,
    /// Token limit of every model call.
    pub max_tokens: u32,
    /// How many tool calls are serviced before the model must answer in text.
    pub max_tool_rounds: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self { top_k: 5, temperature: 0.2, max_tokens: 150, max_tool_rounds: 1 }
    }
}

impl AssistantConfig {
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }
}
