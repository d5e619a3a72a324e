//! Answer lifecycle, for logging.

use std::fmt;

/// Where an answer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerStage {
    Received,
    EmbeddingQuery,
    Searching,
    AssemblingContext,
    /// Model call, numbered from 1.
    ModelCall(usize),
    /// Tool dispatch after the given model call.
    ToolDispatch(usize),
    Responded,
    Failed,
}

impl fmt::Display for AnswerStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerStage::Received => f.write_str("RECEIVED"),
            AnswerStage::EmbeddingQuery => f.write_str("EMBEDDING_QUERY"),
            AnswerStage::Searching => f.write_str("SEARCHING"),
            AnswerStage::AssemblingContext => f.write_str("ASSEMBLING_CONTEXT"),
            AnswerStage::ModelCall(n) => write!(f, "MODEL_CALL_{n}"),
            AnswerStage::ToolDispatch(n) => write!(f, "TOOL_DISPATCH_{n}"),
            AnswerStage::Responded => f.write_str("RESPONDED"),
            AnswerStage::Failed => f.write_str("FAILED"),
        }
    }
}
