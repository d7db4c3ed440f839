//! HTTP routes and handlers

use axum::extract::{Query, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use matchday_core::{CancelRequest, ClaimRequest};
use matchday_domain::{BookingError, BookingView, SlotView};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::auth::AuthenticatedUser;
use crate::context::AppContext;
use crate::error::ApiError;

/// Build the application router.
pub fn router(context: AppContext) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/available-slots", get(available_slots))
        .route("/api/book-slot", post(book_slot))
        .route("/api/cancel-booking", delete(cancel_booking))
        .route("/api/my-bookings", get(my_bookings))
        .layer(TraceLayer::new_for_http())
        .with_state(context)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[derive(Debug, Deserialize)]
struct AvailableSlotsQuery {
    date: Option<String>,
    calendar_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct AvailableSlotsResponse {
    slots: Vec<SlotView>,
    timezone: String,
    date: String,
    total_events: usize,
}

async fn available_slots(
    State(context): State<AppContext>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<AvailableSlotsResponse>, ApiError> {
    let date_raw = query
        .date
        .ok_or_else(|| BookingError::InvalidInput("date parameter is required".to_string()))?;
    let date = NaiveDate::parse_from_str(&date_raw, "%Y-%m-%d").map_err(|_| {
        BookingError::InvalidInput("date must be in YYYY-MM-DD format".to_string())
    })?;
    let calendar_id = query.calendar_id.ok_or_else(|| {
        BookingError::InvalidInput("calendar_id parameter is required".to_string())
    })?;

    let listing = context.service.list_available_slots(&calendar_id, date).await?;

    Ok(Json(AvailableSlotsResponse {
        total_events: listing.total_events,
        timezone: context.settings.timezone.name().to_string(),
        date: date_raw,
        slots: listing.slots,
    }))
}

#[derive(Debug, Serialize)]
struct BookSlotResponse {
    event: SlotView,
    message: String,
}

async fn book_slot(
    State(context): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(request): Json<ClaimRequest>,
) -> Result<Json<BookSlotResponse>, ApiError> {
    let receipt = context.service.claim_slot(&user, &request).await?;
    Ok(Json(BookSlotResponse { event: receipt.slot, message: receipt.message }))
}

#[derive(Debug, Serialize)]
struct CancelResponse {
    message: String,
    cooldown_end: chrono::DateTime<chrono::Utc>,
}

async fn cancel_booking(
    State(context): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(request): Json<CancelRequest>,
) -> Result<Json<CancelResponse>, ApiError> {
    let receipt = context.service.cancel_booking(&user, &request).await?;
    Ok(Json(CancelResponse { message: receipt.message, cooldown_end: receipt.cooldown_end }))
}

#[derive(Debug, Serialize)]
struct MyBookingsResponse {
    bookings: Vec<BookingView>,
    total_bookings: usize,
}

async fn my_bookings(
    State(context): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<MyBookingsResponse>, ApiError> {
    let bookings = context.service.list_my_bookings(&user).await?;
    Ok(Json(MyBookingsResponse { total_bookings: bookings.len(), bookings }))
}
