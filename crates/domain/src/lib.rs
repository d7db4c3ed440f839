//! # Matchday Domain
//!
//! Business domain types and models for the Matchday booking backend.
//!
//! This crate contains:
//! - Calendar event, slot and booking data types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Booking policy constants
//!
//! ## Architecture
//! - No dependencies on other Matchday crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
