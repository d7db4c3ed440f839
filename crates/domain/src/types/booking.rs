//! Booking projections
//!
//! Views the engine returns to the HTTP layer, plus the canonical booking
//! facts derived from an event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical booking facts for a slot
///
/// Derived on every read from the event's metadata bag, falling back to
/// the legacy description markers. Only `user_id` is guaranteed; the
/// fallback path cannot recover the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingInfo {
    pub user_id: String,
    pub user_name: Option<String>,
    pub user_phone: Option<String>,
    pub booked_at: Option<DateTime<Utc>>,
    pub stadium: Option<String>,
}

/// Display projection of one slot for a given day
///
/// Times are wall-clock strings in the configured local timezone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotView {
    pub start: String,
    pub end: String,
    pub event_id: String,
    pub summary: String,
    pub booked: bool,
}

/// One entry of a user's booking list, tagged with its stadium
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingView {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub summary: String,
    pub event_id: String,
    pub stadium_name: String,
    pub calendar_id: String,
}
