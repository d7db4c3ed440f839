//! SQLite persistence
//!
//! The only locally-owned durable state is the user directory: identity,
//! bearer-token lookup and the per-user cancellation timestamp.

pub mod manager;
pub mod user_directory;

pub use manager::DbManager;
pub use user_directory::{hash_token, SqliteUserDirectory};
