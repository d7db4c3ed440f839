//! Configuration management

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::errors::{BookingError, Result};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub calendar: CalendarConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

/// Calendar store configuration
///
/// `base_url` points at the calendar REST API; tests point it at a local
/// mock server. The stadium list is the fixed set of calendars the
/// booking engine iterates for "my bookings".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_token: String,
    pub request_timeout_secs: u64,
    /// IANA timezone name used for wall-clock slot display, e.g.
    /// "Europe/Rome".
    pub timezone: String,
    pub stadiums: Vec<StadiumCalendar>,
}

/// One stadium calendar: the remote calendar id plus a display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StadiumCalendar {
    pub calendar_id: String,
    pub name: String,
}

/// Settings slice the reservation engine is constructed with.
///
/// The engine never reads ambient configuration; everything it needs is
/// resolved here once, at wiring time.
#[derive(Debug, Clone)]
pub struct BookingSettings {
    pub timezone: Tz,
    pub stadiums: Vec<StadiumCalendar>,
}

impl Config {
    /// Resolve the engine-facing settings slice, parsing the timezone.
    pub fn booking_settings(&self) -> Result<BookingSettings> {
        let timezone: Tz = self
            .calendar
            .timezone
            .parse()
            .map_err(|_| BookingError::Config(format!("Invalid timezone: {}", self.calendar.timezone)))?;

        Ok(BookingSettings { timezone, stadiums: self.calendar.stadiums.clone() })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig { bind: "127.0.0.1:8080".to_string() },
            database: DatabaseConfig { path: "matchday.db".to_string(), pool_size: 8 },
            calendar: CalendarConfig {
                base_url: "https://www.googleapis.com/calendar/v3".to_string(),
                api_token: String::new(),
                request_timeout_secs: 30,
                timezone: "UTC".to_string(),
                stadiums: Vec::new(),
            },
        }
    }
}
