//! Bearer-token authentication
//!
//! Handlers that require a caller extract [`AuthenticatedUser`]; the
//! extractor hashes the bearer token and resolves it against the user
//! directory. Token issuance is not this service's concern.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use matchday_domain::{BookingError, UserAccount};
use matchday_infra::hash_token;

use crate::context::AppContext;
use crate::error::ApiError;

/// The caller resolved from the `Authorization: Bearer` header
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserAccount);

impl FromRequestParts<AppContext> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(BookingError::Unauthorized)?;

        let user = state
            .users
            .find_by_token(&hash_token(token))
            .await?
            .ok_or(BookingError::Unauthorized)?;

        Ok(Self(user))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(v) = value {
            builder = builder.header(AUTHORIZATION, v);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn extracts_bearer_token() {
        let parts = parts_with_auth(Some("Bearer abc123"));
        assert_eq!(bearer_token(&parts), Some("abc123"));
    }

    #[test]
    fn rejects_missing_header() {
        let parts = parts_with_auth(None);
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn rejects_non_bearer_scheme() {
        let parts = parts_with_auth(Some("Basic dXNlcjpwdw=="));
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn rejects_empty_token() {
        let parts = parts_with_auth(Some("Bearer "));
        assert_eq!(bearer_token(&parts), None);
    }
}
