//! Prompt text sent to the model.

use benefits_core::Message;

/// Answer used when the model returns no text.
pub const FALLBACK_ANSWER: &str = "I don't know.";

const SYSTEM_PROMPT: &str = "You are an employee benefits assistant. Answer precisely using only the provided context. If unknown, say 'I don't know.'";

const TOOLS_PROMPT: &str = " You can look up benefits terms, estimate annual plan costs, and schedule benefits consultations using the available tools when the question calls for it.";

/// The system turn. Tool guidance is appended only when tools are offered.
pub fn system_message(with_tools: bool) -> Message {
    if with_tools {
        Message::system(format!("{SYSTEM_PROMPT}{TOOLS_PROMPT}"))
    } else {
        Message::system(SYSTEM_PROMPT)
    }
}

/// The user turn: retrieved context followed by the question.
pub fn user_message(context: &str, query: &str) -> Message {
    Message::user(format!("Context:{context} Question: {query}"))
}
