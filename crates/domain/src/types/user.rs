//! User account types
//!
//! Identity and contact details come from the user directory; account
//! lifecycle management is out of scope for this service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated user as resolved by the user directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub phone: Option<String>,
}

impl UserAccount {
    /// Name written into booking metadata: display name when set,
    /// username otherwise.
    pub fn booking_name(&self) -> &str {
        self.display_name.as_deref().filter(|n| !n.is_empty()).unwrap_or(&self.username)
    }
}

/// Per-user booking policy state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserBookingState {
    pub last_cancellation: Option<DateTime<Utc>>,
}
