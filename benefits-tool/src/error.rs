//! Error types for the `benefits-tool` crate.

use thiserror::Error;

use crate::calendar::CalendarError;

/// Message returned for any failed scheduling attempt.
pub const SCHEDULE_FAILED_MESSAGE: &str =
    "Failed to schedule the appointment. Please try again later.";

/// Message returned when cost inputs are not numbers.
pub const INVALID_COST_INPUT_MESSAGE: &str = "Invalid input for benefit calculation.";

/// Errors raised while registering or running tools.
///
/// Apart from [`ToolError::DuplicateTool`] these never fail a request: the
/// dispatcher converts them with [`ToolError::user_message`] into the tool
/// result the model sees.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The model asked for a tool that is not registered.
    #[error("Tool '{0}' is not implemented.")]
    UnknownTool(String),

    /// Arguments were not valid JSON or did not match the tool's schema.
    #[error("Invalid arguments for '{tool}': {message}")]
    InvalidArguments {
        /// The tool that rejected the arguments.
        tool: String,
        /// What was wrong with them.
        message: String,
    },

    /// A cost input could not be read as a number.
    #[error("invalid cost input: {0}")]
    InvalidCostInput(String),

    /// The requested date or time is malformed.
    #[error("invalid appointment slot: {0}")]
    InvalidSlot(String),

    /// The calendar backend failed.
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// A tool with this name is already registered.
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),
}

impl ToolError {
    /// The fixed text handed back to the model for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ToolError::InvalidCostInput(_) => INVALID_COST_INPUT_MESSAGE.to_string(),
            ToolError::InvalidSlot(_) | ToolError::Calendar(_) => SCHEDULE_FAILED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// A convenience result type for tool operations.
pub type Result<T> = std::result::Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_are_fixed_strings() {
        assert_eq!(ToolError::UnknownTool("fly".into()).user_message(), "Tool 'fly' is not implemented.");
        assert_eq!(
            ToolError::InvalidCostInput("premium".into()).user_message(),
            "Invalid input for benefit calculation."
        );
        assert_eq!(ToolError::InvalidSlot("bad date".into()).user_message(), SCHEDULE_FAILED_MESSAGE);
        assert_eq!(
            ToolError::Calendar(CalendarError::NotConfigured).user_message(),
            SCHEDULE_FAILED_MESSAGE
        );
    }
}
