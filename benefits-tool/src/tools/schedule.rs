//! `schedule_appointment`: one-hour benefits consultation on the calendar.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{error, info};

use crate::calendar::{CalendarEvent, CalendarService, UnconfiguredCalendar};
use crate::error::{Result, ToolError};

/// Default time zone for appointments.
pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";

/// Arguments of `schedule_appointment`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ScheduleArgs {
    /// Appointment date in YYYY-MM-DD format.
    pub date: String,
    /// Start time in HH:MM (24-hour) format.
    pub time: String,
    /// Why the appointment is needed.
    pub reason: String,
}

/// Books appointments through a [`CalendarService`].
#[derive(Clone)]
pub struct AppointmentScheduler {
    calendar: Arc<dyn CalendarService>,
    timezone: String,
    summary: String,
}

impl std::fmt::Debug for AppointmentScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppointmentScheduler")
            .field("timezone", &self.timezone)
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

impl Default for AppointmentScheduler {
    fn default() -> Self {
        Self::new(Arc::new(UnconfiguredCalendar))
    }
}

impl AppointmentScheduler {
    pub fn new(calendar: Arc<dyn CalendarService>) -> Self {
        Self {
            calendar,
            timezone: DEFAULT_TIMEZONE.to_string(),
            summary: "Benefits Consultation".to_string(),
        }
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    /// Create the event and return the success sentence with its link.
    ///
    /// # Errors
    ///
    /// [`ToolError::InvalidSlot`] for a malformed date or time,
    /// [`ToolError::Calendar`] when the backend fails.
    pub async fn schedule(&self, date: &str, time: &str, reason: &str) -> Result<String> {
        let start = parse_slot(date, time)?;
        let event = CalendarEvent {
            summary: self.summary.clone(),
            description: reason.to_string(),
            start,
            end: start + Duration::hours(1),
            timezone: self.timezone.clone(),
        };

        let created = self.calendar.create_event(&event).await.map_err(|e| {
            error!(error = %e, %start, "failed to schedule appointment");
            ToolError::from(e)
        })?;
        info!(%start, link = %created.html_link, "appointment scheduled");
        Ok(format!("Appointment scheduled successfully. View it here: {}", created.html_link))
    }
}

fn parse_slot(date: &str, time: &str) -> Result<NaiveDateTime> {
    let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| ToolError::InvalidSlot(format!("date '{date}': {e}")))?;
    let at = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map_err(|e| ToolError::InvalidSlot(format!("time '{time}': {e}")))?;
    Ok(day.and_time(at))
}
