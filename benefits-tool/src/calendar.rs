//! Calendar backend used by the scheduling tool.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

/// Google Calendar v3 REST base URL.
pub const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// An event to create. Times are wall-clock times in `timezone`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub summary: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// IANA time zone name, e.g. `America/Los_Angeles`.
    pub timezone: String,
}

/// The event as created by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEvent {
    /// Link to view the event.
    pub html_link: String,
}

/// Failures from a [`CalendarService`].
#[derive(Debug, Error)]
pub enum CalendarError {
    /// No calendar credentials were configured.
    #[error("calendar service is not configured")]
    NotConfigured,

    /// The request never got a response.
    #[error("calendar request failed: {0}")]
    Request(String),

    /// The API answered with an error status.
    #[error("calendar API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The API answered with something other than an event.
    #[error("invalid calendar response: {0}")]
    InvalidResponse(String),
}

/// Creates calendar events.
#[async_trait]
pub trait CalendarService: Send + Sync {
    async fn create_event(&self, event: &CalendarEvent) -> Result<CreatedEvent, CalendarError>;
}

/// Stand-in used when no calendar credentials are available; every call fails
/// with [`CalendarError::NotConfigured`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredCalendar;

#[async_trait]
impl CalendarService for UnconfiguredCalendar {
    async fn create_event(&self, _event: &CalendarEvent) -> Result<CreatedEvent, CalendarError> {
        Err(CalendarError::NotConfigured)
    }
}

/// Google Calendar client authenticated with an OAuth bearer token.
///
/// Obtaining and refreshing the token is left to the caller.
///
/// ```rust,ignore
/// let calendar = GoogleCalendarClient::new(token)?.with_calendar_id("primary");
/// let created = calendar.create_event(&event).await?;
/// ```
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    client: reqwest::Client,
    access_token: String,
    calendar_id: String,
    base_url: String,
}

impl GoogleCalendarClient {
    pub fn new(access_token: impl Into<String>) -> Result<Self, CalendarError> {
        let access_token = access_token.into();
        if access_token.is_empty() {
            return Err(CalendarError::NotConfigured);
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CalendarError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            access_token,
            calendar_id: "primary".into(),
            base_url: GOOGLE_CALENDAR_API_BASE.into(),
        })
    }

    pub fn with_calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = calendar_id.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn events_url(&self) -> Result<reqwest::Url, CalendarError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| CalendarError::Request(format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| CalendarError::Request("base URL cannot have a path".into()))?
            .pop_if_empty()
            .extend(["calendars", self.calendar_id.as_str(), "events"]);
        Ok(url)
    }
}

#[derive(Serialize)]
struct EventBody<'a> {
    summary: &'a str,
    description: &'a str,
    start: EventTime<'a>,
    end: EventTime<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventTime<'a> {
    date_time: String,
    time_zone: &'a str,
}

impl<'a> EventTime<'a> {
    fn new(at: NaiveDateTime, time_zone: &'a str) -> Self {
        Self { date_time: at.format("%Y-%m-%dT%H:%M:%S").to_string(), time_zone }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventResponse {
    html_link: Option<String>,
}

#[async_trait]
impl CalendarService for GoogleCalendarClient {
    async fn create_event(&self, event: &CalendarEvent) -> Result<CreatedEvent, CalendarError> {
        let body = EventBody {
            summary: &event.summary,
            description: &event.description,
            start: EventTime::new(event.start, &event.timezone),
            end: EventTime::new(event.end, &event.timezone),
        };
        debug!(calendar = %self.calendar_id, start = %body.start.date_time, "creating calendar event");

        let response = self
            .client
            .post(self.events_url()?)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "calendar request failed");
                CalendarError::Request(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CalendarError::Api { status: status.as_u16(), message });
        }

        let parsed: EventResponse =
            response.json().await.map_err(|e| CalendarError::InvalidResponse(e.to_string()))?;
        let html_link =
            parsed.html_link.ok_or_else(|| CalendarError::InvalidResponse("missing htmlLink".into()))?;
        Ok(CreatedEvent { html_link })
    }
}
