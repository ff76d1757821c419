pub mod store;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{DateTime, Permission};
pub use store::JsonCalendar;

/// Event handed to the calendar. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub title: String,
    #[serde(with = "rfc3339")]
    pub start: DateTime,
    #[serde(with = "rfc3339")]
    pub end: DateTime,
    pub location: String,
}

/// A calendar collection able to hold events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventId(pub String);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("calendar io: {0}")]
    Io(#[from] std::io::Error),
    #[error("calendar encoding: {0}")]
    Json(#[from] serde_json::Error),
    #[error("calendar container {0} not found")]
    UnknownContainer(String),
}

#[async_trait]
pub trait Calendar: Send + Sync {
    async fn request_permission(&self) -> Result<Permission, CalendarError>;
    /// Containers in the order the platform lists them.
    async fn list_containers(&self) -> Result<Vec<Container>, CalendarError>;
    async fn create_event(&self, container: &Container, event: &EventRecord) -> Result<EventId, CalendarError>;
}

mod rfc3339 {
    use chrono::DateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use crate::model::DateTime as FixedDateTime;

    pub fn serialize<S>(date: &FixedDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer {
        serializer.serialize_str(&date.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<FixedDateTime, D::Error>
    where D: Deserializer<'de> {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_record_json() {
        let start = chrono::DateTime::parse_from_rfc3339("2024-05-01T10:00:00-03:00").unwrap();
        let record = EventRecord {
            title: "Evento Importante".to_owned(),
            start,
            end: start + chrono::Duration::hours(1),
            location: "Local do Evento".to_owned(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["start"], "2024-05-01T10:00:00-03:00");
        assert_eq!(json["end"], "2024-05-01T11:00:00-03:00");
        let back: EventRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
