//! HTTP error mapping
//!
//! Bridges `BookingError` to Axum responses. Every variant maps to one
//! status code; adapter details (SQL text, upstream URLs) never reach
//! the response body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use matchday_domain::BookingError;
use serde::Serialize;

/// Error returned by route handlers
#[derive(Debug)]
pub struct ApiError(pub BookingError);

/// Error response body (JSON)
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            BookingError::ConfirmationRequired(_)
            | BookingError::InCooldown(_)
            | BookingError::AlreadyBooked
            | BookingError::SlotInPast
            | BookingError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            BookingError::Unauthorized => StatusCode::UNAUTHORIZED,
            BookingError::NotOwner => StatusCode::FORBIDDEN,
            BookingError::SlotNotFound => StatusCode::NOT_FOUND,
            BookingError::Conflict => StatusCode::CONFLICT,
            BookingError::Upstream(_)
            | BookingError::Database(_)
            | BookingError::Config(_)
            | BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match &self.0 {
            // Server-side faults get a generic body; the detail goes to
            // the log only.
            BookingError::Upstream(_) => "Calendar service unavailable".to_string(),
            BookingError::Database(_) | BookingError::Config(_) | BookingError::Internal(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self.0, "request failed");
        }

        let body = ErrorResponse { error: self.public_message() };
        (status, Json(body)).into_response()
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        Self(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_policy_errors_to_400() {
        assert_eq!(ApiError(BookingError::AlreadyBooked).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError(BookingError::InCooldown(42)).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn maps_ownership_to_403() {
        assert_eq!(ApiError(BookingError::NotOwner).status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn maps_conflict_to_409() {
        assert_eq!(ApiError(BookingError::Conflict).status(), StatusCode::CONFLICT);
    }

    #[test]
    fn hides_adapter_detail() {
        let err = ApiError(BookingError::Database("no such table: users".to_string()));
        assert_eq!(err.public_message(), "Internal server error");
    }
}
