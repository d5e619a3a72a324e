//! Name → tool mapping and the dispatcher that services model tool calls.

use std::collections::HashMap;
use std::sync::Arc;

use benefits_core::{ToolCall, ToolDefinition};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::calendar::CalendarService;
use crate::error::{Result, ToolError};
use crate::tools::{AppointmentScheduler, BenefitTool, Glossary};

/// The registered tools, in registration order.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<BenefitTool>,
    by_name: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three benefits tools, scheduling through `calendar`.
    ///
    /// # Errors
    ///
    /// [`ToolError::DuplicateTool`] if two of the tools share a name.
    pub fn benefits_default(
        calendar: Arc<dyn CalendarService>,
        timezone: impl Into<String>,
    ) -> Result<Self> {
        Self::new()
            .with_tool(BenefitTool::LookupBenefitTerm(Glossary::default()))?
            .with_tool(BenefitTool::CalculateBenefitCost)?
            .with_tool(BenefitTool::ScheduleAppointment(
                AppointmentScheduler::new(calendar).with_timezone(timezone),
            ))
    }

    /// Add a tool.
    ///
    /// # Errors
    ///
    /// [`ToolError::DuplicateTool`] if a tool with the same name exists.
    pub fn register(&mut self, tool: BenefitTool) -> Result<()> {
        let name = tool.name();
        if self.by_name.contains_key(name) {
            return Err(ToolError::DuplicateTool(name.to_string()));
        }
        self.by_name.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    pub fn with_tool(mut self, tool: BenefitTool) -> Result<Self> {
        self.register(tool)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&BenefitTool> {
        self.by_name.get(name).map(|&i| &self.tools[i])
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(BenefitTool::name).collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(BenefitTool::definition).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Service a tool call. Every failure is turned into its user-facing text.
    pub async fn dispatch(&self, call: &ToolCall) -> String {
        match self.try_dispatch(call).await {
            Ok(output) => output,
            Err(e) => {
                warn!(tool = %call.name, error = %e, "tool call failed");
                e.user_message()
            }
        }
    }

    /// Service a tool call, keeping the typed error.
    pub async fn try_dispatch(&self, call: &ToolCall) -> Result<String> {
        let tool = self.get(&call.name).ok_or_else(|| ToolError::UnknownTool(call.name.clone()))?;
        let args = parse_arguments(&call.name, &call.arguments)?;
        debug!(tool = %call.name, call_id = %call.id, "dispatching tool call");
        let output = tool.invoke(args).await?;
        info!(tool = %call.name, "tool call completed");
        Ok(output)
    }
}

fn parse_arguments(tool: &str, raw: &str) -> Result<Map<String, Value>> {
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }
    let invalid = |message: String| ToolError::InvalidArguments { tool: tool.to_string(), message };
    match serde_json::from_str::<Value>(raw).map_err(|e| invalid(e.to_string()))? {
        Value::Object(map) => Ok(map),
        other => Err(invalid(format!("expected a JSON object, got {other}"))),
    }
}
