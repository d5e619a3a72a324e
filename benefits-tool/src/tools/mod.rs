//! The concrete benefits tools.
//!
//! Each tool has a typed argument struct whose JSON Schema (via `schemars`)
//! is advertised to the model, and a plain function or service doing the work.

mod cost;
mod glossary;
mod schedule;

pub use cost::{CostArgs, calculate_benefit_cost};
pub use glossary::{Glossary, LookupArgs, lookup_benefit_term};
pub use schedule::{AppointmentScheduler, DEFAULT_TIMEZONE, ScheduleArgs};

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use benefits_core::ToolDefinition;

use crate::error::{Result, ToolError};

pub const LOOKUP_BENEFIT_TERM: &str = "lookup_benefit_term";
pub const CALCULATE_BENEFIT_COST: &str = "calculate_benefit_cost";
pub const SCHEDULE_APPOINTMENT: &str = "schedule_appointment";

/// The kinds of tool a [`ToolRegistry`](crate::ToolRegistry) can hold.
#[derive(Debug, Clone)]
pub enum BenefitTool {
    LookupBenefitTerm(Glossary),
    CalculateBenefitCost,
    ScheduleAppointment(AppointmentScheduler),
}

impl BenefitTool {
    pub fn name(&self) -> &'static str {
        match self {
            BenefitTool::LookupBenefitTerm(_) => LOOKUP_BENEFIT_TERM,
            BenefitTool::CalculateBenefitCost => CALCULATE_BENEFIT_COST,
            BenefitTool::ScheduleAppointment(_) => SCHEDULE_APPOINTMENT,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BenefitTool::LookupBenefitTerm(_) => {
                "Look up the definition of an employee benefits term or acronym, such as HSA or PPO."
            }
            BenefitTool::CalculateBenefitCost => {
                "Estimate the annual cost of a benefit plan from its monthly premium and deductible."
            }
            BenefitTool::ScheduleAppointment(_) => {
                "Schedule a one-hour benefits consultation on the calendar at a given date and time."
            }
        }
    }

    /// JSON Schema of the tool's arguments.
    pub fn parameters_schema(&self) -> Value {
        match self {
            BenefitTool::LookupBenefitTerm(_) => schema_of::<LookupArgs>(),
            BenefitTool::CalculateBenefitCost => schema_of::<CostArgs>(),
            BenefitTool::ScheduleAppointment(_) => schema_of::<ScheduleArgs>(),
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }

    /// Run the tool on a parsed argument object.
    ///
    /// # Errors
    ///
    /// [`ToolError::InvalidArguments`] when `args` does not match the schema,
    /// otherwise whatever the tool itself reports.
    pub async fn invoke(&self, args: Map<String, Value>) -> Result<String> {
        match self {
            BenefitTool::LookupBenefitTerm(glossary) => {
                let args: LookupArgs = self.parse_args(args)?;
                Ok(glossary.define(&args.term))
            }
            BenefitTool::CalculateBenefitCost => {
                let args: CostArgs = self.parse_args(args)?;
                calculate_benefit_cost(&args.plan_type, &args.monthly_premium, &args.deductible)
            }
            BenefitTool::ScheduleAppointment(scheduler) => {
                let args: ScheduleArgs = self.parse_args(args)?;
                scheduler.schedule(&args.date, &args.time, &args.reason).await
            }
        }
    }

    fn parse_args<T: DeserializeOwned>(&self, args: Map<String, Value>) -> Result<T> {
        serde_json::from_value(Value::Object(args)).map_err(|e| ToolError::InvalidArguments {
            tool: self.name().to_string(),
            message: e.to_string(),
        })
    }
}

fn schema_of<T: JsonSchema>() -> Value {
    let mut schema = serde_json::to_value(schemars::schema_for!(T)).unwrap_or_default();
    if let Value::Object(map) = &mut schema {
        map.remove("$schema");
        map.remove("title");
        map.remove("definitions");
    }
    schema
}
