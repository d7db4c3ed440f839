//! Wire types for the calendar REST API
//!
//! Mirrors the Google Calendar v3 event schema for the fields the
//! booking engine needs. Conversion into the domain record is fallible;
//! listings skip malformed events with a warning instead of failing the
//! whole request.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use matchday_domain::{CalendarEvent, Transparency};
use serde::{Deserialize, Serialize};

/// One page of an events listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsPage {
    #[serde(default)]
    pub items: Vec<WireEvent>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// A calendar event as serialized on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEvent {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub start: WireEventTime,
    pub end: WireEventTime,
    #[serde(default)]
    pub transparency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_properties: Option<ExtendedProperties>,
}

/// Event boundary timestamp; all-day events carry `date` instead of
/// `date_time` and are not bookable slots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// Structured per-event metadata bags
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtendedProperties {
    #[serde(default)]
    pub private: BTreeMap<String, String>,
}

/// Why a wire event could not be converted into a domain event
#[derive(Debug)]
pub struct EventParseFailure {
    pub event_id: String,
    pub field: &'static str,
    pub reason: String,
}

impl WireEvent {
    /// Convert into the typed domain record.
    pub fn into_domain(self) -> Result<CalendarEvent, EventParseFailure> {
        let event_id = self.id.clone();
        let start = parse_boundary(&self.start).map_err(|reason| EventParseFailure {
            event_id: event_id.clone(),
            field: "start",
            reason,
        })?;
        let end = parse_boundary(&self.end).map_err(|reason| EventParseFailure {
            event_id: event_id.clone(),
            field: "end",
            reason,
        })?;

        let transparency = match self.transparency.as_deref() {
            Some("transparent") => Transparency::Transparent,
            // The API omits the field for its default busy state.
            _ => Transparency::Opaque,
        };

        Ok(CalendarEvent {
            id: self.id,
            etag: self.etag,
            summary: self.summary.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            start,
            end,
            transparency,
            private_metadata: self.extended_properties.map(|p| p.private).unwrap_or_default(),
        })
    }

    /// Build the wire form of a domain event for an update call.
    pub fn from_domain(event: &CalendarEvent) -> Self {
        Self {
            id: event.id.clone(),
            etag: event.etag.clone(),
            summary: Some(event.summary.clone()),
            description: Some(event.description.clone()),
            start: WireEventTime {
                date_time: Some(event.start.to_rfc3339()),
                date: None,
                time_zone: Some("UTC".to_string()),
            },
            end: WireEventTime {
                date_time: Some(event.end.to_rfc3339()),
                date: None,
                time_zone: Some("UTC".to_string()),
            },
            transparency: Some(
                match event.transparency {
                    Transparency::Opaque => "opaque",
                    Transparency::Transparent => "transparent",
                }
                .to_string(),
            ),
            extended_properties: Some(ExtendedProperties {
                private: event.private_metadata.clone(),
            }),
        }
    }
}

fn parse_boundary(time: &WireEventTime) -> Result<DateTime<Utc>, String> {
    let Some(value) = time.date_time.as_deref() else {
        return Err("missing dateTime (all-day events are not slots)".to_string());
    };

    let trimmed = value.trim();
    // Some writers omit the offset; those timestamps are UTC.
    let has_explicit_timezone = trimmed.ends_with('Z')
        || trimmed
            .rfind('T')
            .is_some_and(|idx| trimmed[idx + 1..].chars().any(|c| matches!(c, '+' | '-')));
    let candidate = if has_explicit_timezone { trimmed.to_string() } else { format!("{trimmed}Z") };

    DateTime::parse_from_rfc3339(&candidate)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid timestamp '{value}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_offset_and_offsetless_timestamps() {
        let with_offset = WireEventTime {
            date_time: Some("2025-06-01T10:00:00+02:00".to_string()),
            ..Default::default()
        };
        let utc = parse_boundary(&with_offset).unwrap();
        assert_eq!(utc.to_rfc3339(), "2025-06-01T08:00:00+00:00");

        let without_offset = WireEventTime {
            date_time: Some("2025-06-01T10:00:00".to_string()),
            ..Default::default()
        };
        assert_eq!(parse_boundary(&without_offset).unwrap().to_rfc3339(), "2025-06-01T10:00:00+00:00");
    }

    #[test]
    fn all_day_events_fail_conversion() {
        let wire = WireEvent {
            id: "evt".to_string(),
            etag: None,
            summary: Some("match".to_string()),
            description: None,
            start: WireEventTime { date: Some("2025-06-01".to_string()), ..Default::default() },
            end: WireEventTime { date: Some("2025-06-02".to_string()), ..Default::default() },
            transparency: None,
            extended_properties: None,
        };
        let err = wire.into_domain().unwrap_err();
        assert_eq!(err.field, "start");
    }

    #[test]
    fn domain_round_trip_keeps_metadata_bag() {
        let mut metadata = BTreeMap::new();
        metadata.insert("user_id".to_string(), "42".to_string());

        let wire = WireEvent {
            id: "evt".to_string(),
            etag: Some("\"7\"".to_string()),
            summary: Some("Stadium Booking".to_string()),
            description: Some("Booked by:\n- User ID: 42".to_string()),
            start: WireEventTime {
                date_time: Some("2025-06-01T10:00:00Z".to_string()),
                ..Default::default()
            },
            end: WireEventTime {
                date_time: Some("2025-06-01T11:00:00Z".to_string()),
                ..Default::default()
            },
            transparency: Some("opaque".to_string()),
            extended_properties: Some(ExtendedProperties { private: metadata }),
        };

        let domain = wire.into_domain().unwrap();
        assert_eq!(domain.metadata("user_id"), Some("42"));

        let back = WireEvent::from_domain(&domain);
        assert_eq!(back.etag.as_deref(), Some("\"7\""));
        assert_eq!(back.extended_properties.unwrap().private.get("user_id").unwrap(), "42");
    }
}
