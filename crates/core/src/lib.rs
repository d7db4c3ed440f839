//! # Matchday Core
//!
//! Business logic for the Matchday booking backend: the slot model and
//! the reservation engine.
//!
//! ## Architecture
//! - Depends only on `matchday-domain` and external crates
//! - All I/O goes through port traits; adapters live in `matchday-infra`
//! - The remote calendar store owns all durable slot state; the engine
//!   re-reads before every write and never caches a slot

pub mod booking;

pub use booking::ports::{CalendarStore, Clock, SystemClock, UserDirectory};
pub use booking::service::{
    CancelReceipt, CancelRequest, ClaimReceipt, ClaimRequest, DaySlots, ReservationService,
};
pub use booking::slot;
