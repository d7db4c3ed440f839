//! # Matchday Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Calendar store adapter (Google-Calendar-style REST API)
//! - SQLite user directory
//! - HTTP client with timeout/retry handling
//! - Configuration loading (environment + TOML files)
//!
//! ## Architecture
//! - Implements traits defined in `matchday-core`
//! - Contains all "impure" code (network, filesystem, SQL)

pub mod calendar;
pub mod config;
pub mod database;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use calendar::{AccessTokenProvider, GoogleCalendarStore, StaticTokenProvider};
pub use database::{hash_token, DbManager, SqliteUserDirectory};
pub use errors::InfraError;
pub use http::HttpClient;
