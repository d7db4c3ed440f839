//! Calendar event types
//!
//! Fixed-schema view of a remote calendar event. The wire format lives in
//! the infra adapter; core logic only ever sees this record.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free/busy marker on a calendar event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Transparency {
    /// Event blocks time on the calendar (booked slots)
    #[default]
    Opaque,
    /// Event shows the time as free (open slots)
    Transparent,
}

/// A calendar event as seen by the booking engine
///
/// `private_metadata` is the structured per-event key/value bag the store
/// persists alongside the human-readable fields; booking facts are written
/// to both (see the slot model).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    /// Optimistic-concurrency token reported by the store, when known.
    pub etag: Option<String>,
    pub summary: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub transparency: Transparency,
    pub private_metadata: BTreeMap<String, String>,
}

impl CalendarEvent {
    /// Typed lookup into the private metadata bag; empty values count as
    /// absent.
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.private_metadata.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }
}
