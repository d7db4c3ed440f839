//! Application context - dependency wiring
//!
//! Builds the adapter graph once at startup and hands the handlers a
//! cheaply cloneable view of it. Tests construct the same context from
//! fake ports instead.

use std::sync::Arc;

use matchday_core::{CalendarStore, Clock, ReservationService, SystemClock, UserDirectory};
use matchday_domain::{BookingSettings, Config, Result};
use matchday_infra::{DbManager, GoogleCalendarStore, SqliteUserDirectory, StaticTokenProvider};

/// Shared state for all route handlers
#[derive(Clone)]
pub struct AppContext {
    pub service: Arc<ReservationService>,
    pub users: Arc<dyn UserDirectory>,
    pub settings: BookingSettings,
}

impl AppContext {
    /// Wire the production adapters from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let settings = config.booking_settings()?;

        let db = Arc::new(DbManager::new(&config.database)?);
        db.run_migrations()?;
        let users: Arc<dyn UserDirectory> = Arc::new(SqliteUserDirectory::new(db));

        let token_provider = StaticTokenProvider::new(&config.calendar.api_token);
        let store: Arc<dyn CalendarStore> =
            Arc::new(GoogleCalendarStore::new(&config.calendar, Arc::new(token_provider))?);

        Ok(Self::from_ports(store, users, Arc::new(SystemClock), settings))
    }

    /// Assemble a context from explicit ports. Tests inject fakes here.
    pub fn from_ports(
        store: Arc<dyn CalendarStore>,
        users: Arc<dyn UserDirectory>,
        clock: Arc<dyn Clock>,
        settings: BookingSettings,
    ) -> Self {
        let service = Arc::new(ReservationService::new(
            store,
            users.clone(),
            clock,
            settings.clone(),
        ));
        Self { service, users, settings }
    }
}
