//! # benefits-tool
//!
//! The tools a benefits model may call, and the dispatcher that runs them.
//!
//! - [`ToolRegistry`] maps unique tool names to [`BenefitTool`] variants,
//!   exposes their [`ToolDefinition`](benefits_core::ToolDefinition)s and
//!   dispatches model-issued [`ToolCall`](benefits_core::ToolCall)s.
//! - Every dispatch yields a string: tool failures are typed [`ToolError`]s
//!   that the dispatcher turns into fixed user-facing messages.
//! - [`CalendarService`] is the seam to the calendar backend, with a Google
//!   Calendar REST implementation in [`GoogleCalendarClient`].

pub mod calendar;
pub mod error;
pub mod registry;
pub mod tools;

pub use calendar::{
    CalendarError, CalendarEvent, CalendarService, CreatedEvent, GoogleCalendarClient,
    UnconfiguredCalendar,
};
pub use error::{Result, ToolError};
pub use registry::ToolRegistry;
pub use tools::{
    AppointmentScheduler, BenefitTool, Glossary, calculate_benefit_cost, lookup_benefit_term,
};
