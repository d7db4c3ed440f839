//! Booking policy constants
//!
//! Centralized location for the fixed policy values of the reservation
//! engine. These are product decisions, not tunables.

/// Literal the caller must echo back to confirm a booking.
pub const CLAIM_CONFIRMATION_PHRASE: &str = "I CONFIRM";

/// Literal the caller must echo back to confirm a cancellation.
pub const CANCEL_CONFIRMATION_PHRASE: &str = "I AGREE";

/// Marker identifying bookable events. Matched case-insensitively as a
/// substring of the event summary or description.
pub const MATCH_TAG: &str = "match";

/// Mandatory waiting period after a cancellation before the same user
/// may claim again.
pub const COOLDOWN_MINUTES: i64 = 60;

/// How far into the future "my bookings" looks, per calendar.
pub const MY_BOOKINGS_HORIZON_DAYS: i64 = 30;

// Keys of the structured booking metadata written into the calendar
// event's private metadata bag.
pub const META_USER_ID: &str = "user_id";
pub const META_USER_NAME: &str = "user_name";
pub const META_USER_PHONE: &str = "user_phone";
pub const META_BOOKED_AT: &str = "booked_at";
pub const META_STADIUM: &str = "stadium";
