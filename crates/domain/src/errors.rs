//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Matchday
///
/// Validation and policy violations carry user-actionable messages; the
/// HTTP layer maps each variant to a status code without leaking adapter
/// internals into response bodies.
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum BookingError {
    #[error("{0}")]
    ConfirmationRequired(String),

    #[error("You cannot make new bookings for {0} minutes due to a recent cancellation")]
    InCooldown(i64),

    #[error("Event not found")]
    SlotNotFound,

    #[error("This slot is already booked")]
    AlreadyBooked,

    #[error("You can only cancel your own bookings")]
    NotOwner,

    #[error("Cannot cancel past bookings")]
    SlotInPast,

    #[error("The slot was modified concurrently, please retry")]
    Conflict,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calendar service error: {0}")]
    Upstream(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BookingError {
    /// Whether the caller may safely retry the failed operation.
    ///
    /// Only transport-level faults qualify; policy rejections are final
    /// until the user changes something.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Upstream(_) | Self::Conflict)
    }
}

/// Result type alias for Matchday operations
pub type Result<T> = std::result::Result<T, BookingError>;
