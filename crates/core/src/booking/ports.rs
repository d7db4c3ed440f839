//! Port interfaces for the reservation engine
//!
//! The engine owns no durable state. Slot and booking facts live in the
//! remote calendar store; the one locally-owned value, the per-user
//! cancellation timestamp, lives behind [`UserDirectory`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use matchday_domain::{CalendarEvent, Result, UserAccount, UserBookingState};

/// External calendar system of record for slot/booking state
///
/// Implementations must preserve the store's start-time ordering in
/// `list_events` and must honor the event's concurrency token (etag) in
/// `update_event`, failing with `BookingError::Conflict` when stale.
#[async_trait]
pub trait CalendarStore: Send + Sync {
    /// List events of one calendar within `[time_min, time_max)`,
    /// ordered by start time.
    async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>>;

    /// Fetch a single event. `BookingError::SlotNotFound` if absent.
    async fn get_event(&self, calendar_id: &str, event_id: &str) -> Result<CalendarEvent>;

    /// Persist an updated event. All-or-nothing; the returned event
    /// reflects the store's post-write view.
    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &CalendarEvent,
    ) -> Result<CalendarEvent>;
}

/// Identity, contact info and cooldown state per user
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolve a user from the SHA-256 of their bearer token.
    async fn find_by_token(&self, token_sha256: &str) -> Result<Option<UserAccount>>;

    /// Current booking policy state. Read fresh on every claim attempt;
    /// cooldown correctness depends on the latest value.
    async fn booking_state(&self, user_id: &str) -> Result<UserBookingState>;

    /// Record a cancellation timestamp. Called only after the remote
    /// cancellation write succeeded.
    async fn record_cancellation(&self, user_id: &str, at: DateTime<Utc>) -> Result<()>;
}

/// Wall-clock abstraction so cooldown math is testable without sleeping
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Real system clock, used in production
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
