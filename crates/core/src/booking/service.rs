//! Reservation engine - core booking logic
//!
//! Every decision re-reads the current event from the calendar store
//! before mutating it. The store offers no transactions; the defenses
//! against concurrent claims are, in order: a per-event in-process
//! mutex, the mandatory fresh re-read, and the store's optimistic
//! concurrency token on the single update call.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use dashmap::DashMap;
use matchday_domain::constants::{
    CANCEL_CONFIRMATION_PHRASE, CLAIM_CONFIRMATION_PHRASE, COOLDOWN_MINUTES,
    MY_BOOKINGS_HORIZON_DAYS,
};
use matchday_domain::{
    BookingError, BookingSettings, BookingView, Result, SlotView, UserAccount,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::ports::{CalendarStore, Clock, UserDirectory};
use super::slot;

/// Request to claim one slot for the calling user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimRequest {
    pub calendar_id: String,
    pub event_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub confirmation: String,
    pub stadium_name: String,
}

/// Successful claim result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimReceipt {
    pub slot: SlotView,
    pub message: String,
}

/// Request to cancel an existing booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelRequest {
    pub calendar_id: String,
    pub event_id: String,
    pub confirmation: String,
}

/// Successful cancellation result, carrying the cooldown expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelReceipt {
    pub message: String,
    pub cooldown_end: DateTime<Utc>,
}

/// One day's open slots, plus the raw count of calendar events the
/// window held before filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySlots {
    pub slots: Vec<SlotView>,
    pub total_events: usize,
}

/// Slot reservation engine
///
/// Holds no slot state across requests; the calendar store is the sole
/// durable owner. Thread-safe, shared across request handlers.
pub struct ReservationService {
    store: Arc<dyn CalendarStore>,
    users: Arc<dyn UserDirectory>,
    clock: Arc<dyn Clock>,
    settings: BookingSettings,
    // Serializes the read-decide-write window for concurrent requests
    // against the same event within this process. The remote store still
    // resolves cross-process races via its concurrency token.
    event_locks: DashMap<(String, String), Arc<tokio::sync::Mutex<()>>>,
}

impl ReservationService {
    /// Create a new reservation engine
    pub fn new(
        store: Arc<dyn CalendarStore>,
        users: Arc<dyn UserDirectory>,
        clock: Arc<dyn Clock>,
        settings: BookingSettings,
    ) -> Self {
        Self { store, users, clock, settings, event_locks: DashMap::new() }
    }

    fn event_lock(&self, calendar_id: &str, event_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.event_locks
            .entry((calendar_id.to_string(), event_id.to_string()))
            .or_default()
            .clone()
    }

    // Drops the entry once no other request holds it, keeping the table
    // bounded over a long-lived process. `remove_if` holds the shard
    // lock, so the count cannot race with a concurrent `event_lock`.
    fn release_event_lock(&self, calendar_id: &str, event_id: &str) {
        self.event_locks.remove_if(
            &(calendar_id.to_string(), event_id.to_string()),
            |_, lock| Arc::strong_count(lock) == 1,
        );
    }

    /// Atomically claim a slot for `user`.
    ///
    /// A claim retried after a timeout is treated as success when the
    /// slot already carries this user's booking, not as `AlreadyBooked`.
    #[instrument(skip(self, user, request), fields(calendar_id = %request.calendar_id, event_id = %request.event_id, user_id = %user.id))]
    pub async fn claim_slot(
        &self,
        user: &UserAccount,
        request: &ClaimRequest,
    ) -> Result<ClaimReceipt> {
        if request.confirmation != CLAIM_CONFIRMATION_PHRASE {
            return Err(BookingError::ConfirmationRequired(format!(
                "Please type '{CLAIM_CONFIRMATION_PHRASE}' to proceed with the booking"
            )));
        }
        if request.start_time >= request.end_time {
            return Err(BookingError::InvalidInput(
                "start_time must precede end_time".to_string(),
            ));
        }

        // Cooldown state is read fresh every time, never cached.
        let now = self.clock.now();
        let state = self.users.booking_state(&user.id).await?;
        if let Some(last_cancellation) = state.last_cancellation {
            let cooldown_end = last_cancellation + Duration::minutes(COOLDOWN_MINUTES);
            if now < cooldown_end {
                let minutes_remaining = (cooldown_end - now).num_seconds() / 60;
                return Err(BookingError::InCooldown(minutes_remaining));
            }
        }

        let lock = self.event_lock(&request.calendar_id, &request.event_id);
        let result = {
            let _guard = lock.lock().await;
            self.claim_locked(user, request, now).await
        };
        drop(lock);
        self.release_event_lock(&request.calendar_id, &request.event_id);
        result
    }

    async fn claim_locked(
        &self,
        user: &UserAccount,
        request: &ClaimRequest,
        now: DateTime<Utc>,
    ) -> Result<ClaimReceipt> {
        let event = self.store.get_event(&request.calendar_id, &request.event_id).await?;
        if !slot::is_match_slot(&event) {
            // Untagged events are not part of the reservation domain.
            return Err(BookingError::SlotNotFound);
        }

        if let Some(existing) = slot::booking_info(&event) {
            if existing.user_id == user.id {
                info!("claim retried against own booking, treating as success");
                return Ok(ClaimReceipt {
                    slot: slot::slot_view(&event, self.settings.timezone),
                    message: "Slot already booked by you".to_string(),
                });
            }
            return Err(BookingError::AlreadyBooked);
        }

        let mut updated = event;
        slot::write_booking(&mut updated, user, &request.stadium_name, now);

        let persisted =
            self.store.update_event(&request.calendar_id, &request.event_id, &updated).await?;

        info!(stadium = %request.stadium_name, "booking created");
        Ok(ClaimReceipt {
            slot: slot::slot_view(&persisted, self.settings.timezone),
            message: "Booking created successfully".to_string(),
        })
    }

    /// Cancel the caller's booking and start their cooldown.
    ///
    /// The cooldown timestamp commits only after the remote write
    /// succeeded; a failed update leaves all local state untouched.
    #[instrument(skip(self, user, request), fields(calendar_id = %request.calendar_id, event_id = %request.event_id, user_id = %user.id))]
    pub async fn cancel_booking(
        &self,
        user: &UserAccount,
        request: &CancelRequest,
    ) -> Result<CancelReceipt> {
        if request.confirmation != CANCEL_CONFIRMATION_PHRASE {
            return Err(BookingError::ConfirmationRequired(format!(
                "Please type '{CANCEL_CONFIRMATION_PHRASE}' to cancel the booking"
            )));
        }

        let lock = self.event_lock(&request.calendar_id, &request.event_id);
        let result = {
            let _guard = lock.lock().await;
            self.cancel_locked(user, request).await
        };
        drop(lock);
        self.release_event_lock(&request.calendar_id, &request.event_id);
        result
    }

    async fn cancel_locked(
        &self,
        user: &UserAccount,
        request: &CancelRequest,
    ) -> Result<CancelReceipt> {
        let event = self.store.get_event(&request.calendar_id, &request.event_id).await?;

        let owner = slot::booking_info(&event).ok_or(BookingError::NotOwner)?;
        if owner.user_id != user.id {
            return Err(BookingError::NotOwner);
        }

        let now = self.clock.now();
        if event.start < now {
            return Err(BookingError::SlotInPast);
        }

        let mut updated = event;
        slot::clear_booking(&mut updated);
        self.store.update_event(&request.calendar_id, &request.event_id, &updated).await?;

        self.users.record_cancellation(&user.id, now).await?;
        let cooldown_end = now + Duration::minutes(COOLDOWN_MINUTES);

        info!("booking cancelled, cooldown started");
        Ok(CancelReceipt {
            message: "Booking cancelled successfully. You cannot make a new booking for 1 hour."
                .to_string(),
            cooldown_end,
        })
    }

    /// List open match slots of one calendar for a given local date.
    ///
    /// The window is `[date 00:00, date+1 00:00)` in the configured
    /// timezone. Booked slots are excluded; the store's start-time
    /// ordering is preserved. `total_events` counts everything the
    /// window held, clutter and booked slots included.
    #[instrument(skip(self))]
    pub async fn list_available_slots(
        &self,
        calendar_id: &str,
        date: NaiveDate,
    ) -> Result<DaySlots> {
        let tz = self.settings.timezone;
        let time_min = local_midnight(date, tz)?;
        let next = date
            .succ_opt()
            .ok_or_else(|| BookingError::InvalidInput("date out of range".to_string()))?;
        let time_max = local_midnight(next, tz)?;

        let events = self.store.list_events(calendar_id, time_min, time_max).await?;

        let slots = events
            .iter()
            .filter(|e| slot::is_match_slot(e) && !slot::is_booked(e))
            .map(|e| slot::slot_view(e, tz))
            .collect();
        Ok(DaySlots { slots, total_events: events.len() })
    }

    /// List the user's upcoming bookings across every configured stadium
    /// calendar, merged and sorted ascending by start time.
    ///
    /// One unreachable calendar does not fail the whole listing; it is
    /// logged and skipped.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn list_my_bookings(&self, user: &UserAccount) -> Result<Vec<BookingView>> {
        let now = self.clock.now();
        let horizon = now + Duration::days(MY_BOOKINGS_HORIZON_DAYS);

        let mut bookings = Vec::new();
        for stadium in &self.settings.stadiums {
            let events = match self.store.list_events(&stadium.calendar_id, now, horizon).await {
                Ok(events) => events,
                Err(err) => {
                    warn!(calendar_id = %stadium.calendar_id, error = %err, "skipping unreachable calendar");
                    continue;
                }
            };

            for event in events {
                let Some(info) = slot::booking_info(&event) else { continue };
                if info.user_id != user.id {
                    continue;
                }
                bookings.push(BookingView {
                    start_time: event.start,
                    end_time: event.end,
                    summary: event.summary.clone(),
                    event_id: event.id.clone(),
                    stadium_name: stadium.name.clone(),
                    calendar_id: stadium.calendar_id.clone(),
                });
            }
        }

        bookings.sort_by_key(|b| b.start_time);
        Ok(bookings)
    }

    /// Timezone the engine projects wall-clock slot times in.
    pub fn timezone(&self) -> chrono_tz::Tz {
        self.settings.timezone
    }
}

fn local_midnight(date: NaiveDate, tz: chrono_tz::Tz) -> Result<DateTime<Utc>> {
    use chrono::TimeZone;

    let naive = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| BookingError::InvalidInput("date out of range".to_string()))?;

    // `earliest` resolves DST gaps/folds deterministically.
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| BookingError::InvalidInput(format!("no local midnight for {date}")))
}
