//! Slot model
//!
//! Interprets a raw calendar event as a bookable slot. An event belongs
//! to the booking domain only when the match tag appears in its summary
//! or description; everything else is ordinary calendar clutter.
//!
//! Booking facts are persisted in two places at once: the structured
//! private metadata bag and the human-readable description/summary.
//! Reads normalize both into one canonical [`BookingInfo`], metadata
//! first, so older description-only bookings remain visible until the
//! next successful write rewrites them in canonical form.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use matchday_domain::constants::{
    MATCH_TAG, META_BOOKED_AT, META_STADIUM, META_USER_ID, META_USER_NAME, META_USER_PHONE,
};
use matchday_domain::{BookingInfo, CalendarEvent, SlotView, Transparency, UserAccount};
use once_cell::sync::Lazy;
use regex::Regex;

/// Legacy marker left in event descriptions by older writers, with or
/// without the emoji prefix: `User ID: <id>` / `🆔 User ID: <id>`.
static DESCRIPTION_USER_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:🆔\s*)?User ID:\s*(\S+)").expect("user id marker pattern is valid")
});

/// `- Name: <name>` line of the human-readable booking block.
static DESCRIPTION_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-\s*Name:\s*(.+)").expect("name marker pattern is valid"));

/// Whether the event is part of the reservation domain at all.
pub fn is_match_slot(event: &CalendarEvent) -> bool {
    let tag = MATCH_TAG;
    event.summary.to_lowercase().contains(tag) || event.description.to_lowercase().contains(tag)
}

/// Canonical booking facts, or `None` for an unbooked slot.
///
/// Checks the metadata bag first, then falls back to parsing the
/// description markers. Both must be checked on every read path; the two
/// representations are known to diverge in historical data.
pub fn booking_info(event: &CalendarEvent) -> Option<BookingInfo> {
    if let Some(user_id) = event.metadata(META_USER_ID) {
        return Some(BookingInfo {
            user_id: user_id.to_string(),
            user_name: event.metadata(META_USER_NAME).map(str::to_string),
            user_phone: event.metadata(META_USER_PHONE).map(str::to_string),
            booked_at: event
                .metadata(META_BOOKED_AT)
                .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
                .map(|dt| dt.with_timezone(&Utc)),
            stadium: event.metadata(META_STADIUM).map(str::to_string),
        });
    }

    let user_id = DESCRIPTION_USER_ID.captures(&event.description)?.get(1)?.as_str().to_string();
    let user_name = DESCRIPTION_NAME
        .captures(&event.description)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string());

    Some(BookingInfo { user_id, user_name, user_phone: None, booked_at: None, stadium: None })
}

/// Whether the slot currently carries a booking, in either
/// representation.
pub fn is_booked(event: &CalendarEvent) -> bool {
    booking_info(event).is_some()
}

/// Project an event to its display view, with wall-clock times in the
/// caller's configured local timezone.
pub fn slot_view(event: &CalendarEvent, tz: Tz) -> SlotView {
    SlotView {
        start: event.start.with_timezone(&tz).format("%H:%M").to_string(),
        end: event.end.with_timezone(&tz).format("%H:%M").to_string(),
        event_id: event.id.clone(),
        summary: event.summary.clone(),
        booked: is_booked(event),
    }
}

/// Write a booking into the event, in both representations.
///
/// Intentionally redundant: downstream readers of the calendar only see
/// one of the two forms.
pub fn write_booking(
    event: &mut CalendarEvent,
    user: &UserAccount,
    stadium: &str,
    booked_at: DateTime<Utc>,
) {
    let name = user.booking_name();
    let phone = user.phone.as_deref().unwrap_or("Not provided");

    event.private_metadata.insert(META_USER_ID.into(), user.id.clone());
    event.private_metadata.insert(META_USER_NAME.into(), name.to_string());
    event
        .private_metadata
        .insert(META_USER_PHONE.into(), user.phone.clone().unwrap_or_default());
    event.private_metadata.insert(META_BOOKED_AT.into(), booked_at.to_rfc3339());
    event.private_metadata.insert(META_STADIUM.into(), stadium.to_string());

    event.description = format!(
        "Booked by:\n- Name: {name}\n- Username: {username}\n- Phone: {phone}\n- User ID: {id}\n- Stadium: {stadium}\n",
        username = user.username,
        id = user.id,
    );
    event.summary = format!("Stadium Booking - {stadium} - {name}");
    event.transparency = Transparency::Opaque;
}

/// Reset the event to its unbooked form: booking metadata removed,
/// summary and description back to the bare match tag, time shown free.
pub fn clear_booking(event: &mut CalendarEvent) {
    for key in [META_USER_ID, META_USER_NAME, META_USER_PHONE, META_BOOKED_AT, META_STADIUM] {
        event.private_metadata.remove(key);
    }
    event.description = MATCH_TAG.to_string();
    event.summary = MATCH_TAG.to_string();
    event.transparency = Transparency::Transparent;
}
