//! # Matchday API
//!
//! HTTP surface of the Matchday booking backend: axum routing,
//! bearer-token auth, and the error-to-status mapping. All business
//! decisions live in `matchday-core`; handlers translate between HTTP
//! and the reservation engine.

pub mod auth;
pub mod context;
pub mod error;
pub mod routes;

pub use context::AppContext;
pub use routes::router;
