//! Domain types and models

pub mod booking;
pub mod event;
pub mod user;

pub use booking::{BookingInfo, BookingView, SlotView};
pub use event::{CalendarEvent, Transparency};
pub use user::{UserAccount, UserBookingState};
