//! Calendar store adapter
//!
//! Implements the core `CalendarStore` port against a Google-Calendar-style
//! REST API. The adapter owns the wire format; everything above it sees
//! the typed `CalendarEvent` record.

pub mod client;
pub mod types;

pub use client::{AccessTokenProvider, GoogleCalendarStore, StaticTokenProvider};
