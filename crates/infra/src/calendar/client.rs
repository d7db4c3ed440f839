//! REST client implementing the `CalendarStore` port
//!
//! Listing requests rely on the store's `orderBy=startTime` ordering and
//! preserve it. Updates carry the event's etag as `If-Match` so a
//! concurrent writer surfaces as `Conflict` instead of a silent
//! overwrite.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use matchday_core::CalendarStore;
use matchday_domain::{BookingError, CalendarConfig, CalendarEvent, Result};
use reqwest::{header, Method, StatusCode};
use tracing::{debug, warn};

use super::types::{EventsPage, WireEvent};
use crate::http::HttpClient;

const MAX_RESULTS_PER_PAGE: u32 = 100;

/// Provides bearer tokens to authorize calendar API calls.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// Fixed-token provider, for service accounts whose token is managed
/// outside this process (and for tests).
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        if self.token.is_empty() {
            return Err(BookingError::Config("calendar API token is not configured".into()));
        }
        Ok(self.token.clone())
    }
}

/// Calendar store adapter over a Google-Calendar-style REST API
pub struct GoogleCalendarStore {
    base_url: String,
    http_client: HttpClient,
    token_provider: Arc<dyn AccessTokenProvider>,
}

impl GoogleCalendarStore {
    /// Create a new store adapter from configuration.
    pub fn new(
        config: &CalendarConfig,
        token_provider: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .max_attempts(3)
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
            token_provider,
        })
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!("{}/calendars/{calendar_id}/events", self.base_url)
    }

    fn event_url(&self, calendar_id: &str, event_id: &str) -> String {
        format!("{}/calendars/{calendar_id}/events/{event_id}", self.base_url)
    }

    async fn fetch_page(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        page_token: Option<&str>,
    ) -> Result<EventsPage> {
        let access_token = self.token_provider.access_token().await?;

        let mut builder = self
            .http_client
            .request(Method::GET, self.events_url(calendar_id))
            .bearer_auth(access_token)
            .query(&[
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
                ("timeMin", time_min.to_rfc3339()),
                ("timeMax", time_max.to_rfc3339()),
                ("timeZone", "UTC".to_string()),
                ("maxResults", MAX_RESULTS_PER_PAGE.to_string()),
            ]);
        if let Some(token) = page_token {
            builder = builder.query(&[("pageToken", token)]);
        }

        let response = self.http_client.send(builder).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(upstream_error(response, "list events").await);
        }

        response.json::<EventsPage>().await.map_err(|e| {
            BookingError::Upstream(format!("malformed events listing: {e}"))
        })
    }
}

#[async_trait]
impl CalendarStore for GoogleCalendarStore {
    async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;
        let mut skipped = 0usize;

        loop {
            let page =
                self.fetch_page(calendar_id, time_min, time_max, page_token.as_deref()).await?;

            for wire in page.items {
                match wire.into_domain() {
                    Ok(event) => events.push(event),
                    Err(failure) => {
                        skipped += 1;
                        warn!(
                            event_id = %failure.event_id,
                            field = failure.field,
                            reason = %failure.reason,
                            "skipping calendar event that failed to parse"
                        );
                    }
                }
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        if skipped > 0 {
            warn!(calendar_id, skipped, kept = events.len(), "dropped malformed calendar events");
        }
        debug!(calendar_id, count = events.len(), "listed calendar events");
        Ok(events)
    }

    async fn get_event(&self, calendar_id: &str, event_id: &str) -> Result<CalendarEvent> {
        let access_token = self.token_provider.access_token().await?;

        let builder = self
            .http_client
            .request(Method::GET, self.event_url(calendar_id, event_id))
            .bearer_auth(access_token);

        let response = self.http_client.send(builder).await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Err(BookingError::SlotNotFound);
        }
        if !status.is_success() {
            return Err(upstream_error(response, "get event").await);
        }

        let wire: WireEvent = response.json().await.map_err(|e| {
            BookingError::Upstream(format!("malformed event body: {e}"))
        })?;
        wire.into_domain().map_err(|failure| {
            BookingError::Upstream(format!(
                "event {} has unusable {}: {}",
                failure.event_id, failure.field, failure.reason
            ))
        })
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &CalendarEvent,
    ) -> Result<CalendarEvent> {
        let access_token = self.token_provider.access_token().await?;

        let mut builder = self
            .http_client
            .request(Method::PUT, self.event_url(calendar_id, event_id))
            .bearer_auth(access_token)
            .json(&WireEvent::from_domain(event));
        if let Some(etag) = event.etag.as_deref() {
            builder = builder.header(header::IF_MATCH, etag);
        }

        // Writes are never retried; a lost response must not turn into a
        // second blind overwrite.
        let response = self.http_client.send_once(builder).await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Err(BookingError::SlotNotFound);
        }
        if status == StatusCode::PRECONDITION_FAILED {
            return Err(BookingError::Conflict);
        }
        if !status.is_success() {
            return Err(upstream_error(response, "update event").await);
        }

        let wire: WireEvent = response.json().await.map_err(|e| {
            BookingError::Upstream(format!("malformed update response: {e}"))
        })?;
        wire.into_domain().map_err(|failure| {
            BookingError::Upstream(format!(
                "updated event {} has unusable {}: {}",
                failure.event_id, failure.field, failure.reason
            ))
        })
    }
}

async fn upstream_error(response: reqwest::Response, operation: &str) -> BookingError {
    let status = response.status();
    let body = response.text().await.unwrap_or_else(|_| "<unreadable body>".to_string());
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        BookingError::Upstream(format!(
            "calendar API rejected credentials during {operation} (HTTP {status})"
        ))
    } else {
        BookingError::Upstream(format!(
            "calendar API error during {operation} (HTTP {status}): {body}"
        ))
    }
}
