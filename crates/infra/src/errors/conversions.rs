//! Conversions from external infrastructure errors into domain errors.
//!
//! `BookingError` lives in `matchday-domain` and the error sources are
//! foreign types, so the orphan rule forces the glue through this
//! newtype.

use matchday_domain::BookingError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;
use tokio::task::JoinError;

/// Error newtype that keeps conversions on the infrastructure side and
/// can be converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub BookingError);

impl From<InfraError> for BookingError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<BookingError> for InfraError {
    fn from(value: BookingError) -> Self {
        InfraError(value)
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → BookingError */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for InfraError {
    fn from(err: HttpError) -> Self {
        let kind = if err.is_timeout() {
            "timeout"
        } else if err.is_connect() {
            "connection failed"
        } else if err.is_decode() {
            "malformed response body"
        } else {
            "request failed"
        };
        InfraError(BookingError::Upstream(format!("{kind}: {err}")))
    }
}

/* -------------------------------------------------------------------------- */
/* rusqlite / r2d2 → BookingError */
/* -------------------------------------------------------------------------- */

impl From<SqlError> for InfraError {
    fn from(err: SqlError) -> Self {
        use rusqlite::ffi::ErrorCode;

        let mapped = match err {
            SqlError::SqliteFailure(code, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match code.code {
                    ErrorCode::DatabaseBusy => BookingError::Database("database is busy".into()),
                    ErrorCode::DatabaseLocked => {
                        BookingError::Database("database is locked".into())
                    }
                    ErrorCode::ConstraintViolation => {
                        BookingError::Database(format!("constraint violation: {message}"))
                    }
                    _ => BookingError::Database(format!(
                        "sqlite failure {:?} (code {}): {message}",
                        code.code, code.extended_code
                    )),
                }
            }
            SqlError::QueryReturnedNoRows => {
                BookingError::Database("no rows returned by query".into())
            }
            other => BookingError::Database(other.to_string()),
        };
        InfraError(mapped)
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(err: r2d2::Error) -> Self {
        InfraError(BookingError::Database(format!("connection pool error: {err}")))
    }
}

impl From<JoinError> for InfraError {
    fn from(err: JoinError) -> Self {
        InfraError(BookingError::Internal(format!("blocking task failed: {err}")))
    }
}
