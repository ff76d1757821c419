pub mod picker;

use chrono::{Duration, Local, NaiveDateTime, TimeZone};

use crate::calendar::{Calendar, CalendarError, EventId, EventRecord};
use crate::model::{DateTime, Permission};
pub use picker::{Picker, PickerEvent};

pub const DEFAULT_TITLE: &str = "Evento Importante";
pub const LOCATION: &str = "Local do Evento";
const EVENT_DURATION_MS: i64 = 3_600_000;

#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    title: String,
    start: DateTime,
}

impl EventDraft {
    pub fn new(start: DateTime) -> Self {
        Self { title: String::new(), start }
    }
    pub fn title(&self) -> &str {
        &self.title
    }
    pub fn start(&self) -> DateTime {
        self.start
    }
    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }
    pub fn set_start(&mut self, start: DateTime) {
        self.start = start;
    }

    /// Title falls back to the default one, the event always lasts one hour.
    pub fn record(&self) -> EventRecord {
        let title: &str = if self.title.is_empty() { DEFAULT_TITLE } else { &self.title };
        EventRecord {
            title: title.to_owned(),
            start: self.start,
            end: self.start + Duration::milliseconds(EVENT_DURATION_MS),
            location: LOCATION.to_owned(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("calendar permission denied")]
    PermissionDenied,
    #[error("no calendar available")]
    NoContainer,
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("can't read {0:?}, expected YYYY-MM-DD HH:MM or RFC 3339")]
    Format(String),
    #[error("{0} does not exist in the local time zone")]
    Nonexistent(String),
}

pub struct EventComposer {
    draft: EventDraft,
    picker: Picker,
}

impl EventComposer {
    pub fn new(start: DateTime) -> Self {
        Self { draft: EventDraft::new(start), picker: Picker::default() }
    }

    pub fn draft(&self) -> &EventDraft {
        &self.draft
    }
    pub fn picker(&self) -> Picker {
        self.picker
    }
    pub fn set_title(&mut self, title: String) {
        self.draft.set_title(title)
    }
    pub fn on_picker(&mut self, event: PickerEvent) -> Picker {
        self.picker = self.picker.on_event(&mut self.draft, event);
        self.picker
    }

    /// Creates the draft's event in the first calendar container. The draft
    /// stays as it is whatever the outcome, so a failed attempt can be repeated.
    pub async fn submit(&self, calendar: &dyn Calendar) -> Result<EventId, SubmitError> {
        if calendar.request_permission().await? != Permission::Granted {
            return Err(SubmitError::PermissionDenied);
        }
        let containers = calendar.list_containers().await?;
        let container = containers.first().ok_or(SubmitError::NoContainer)?;
        let record = self.draft.record();
        let id = calendar.create_event(container, &record).await?;
        log::info!("event {:?} added to calendar {}, id: {}", record.title, container.title, id);
        Ok(id)
    }
}

/// Reads a picker value: RFC 3339, or `YYYY-MM-DD HH:MM` in local time.
/// Ambiguous local times resolve to the earlier instant, times skipped by a
/// DST gap are rejected.
pub fn parse_start(s: &str) -> Result<DateTime, DateError> {
    let s = s.trim();
    if let Ok(date) = chrono::DateTime::parse_from_rfc3339(s) {
        return Ok(date);
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").map_err(|_| DateError::Format(s.to_owned()))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|date| date.with_timezone(date.offset()))
        .ok_or_else(|| DateError::Nonexistent(s.to_owned()))
}
