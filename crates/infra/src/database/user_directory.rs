//! User directory implementation backed by SQLite
//!
//! Provides bearer-token resolution and the per-user cancellation
//! timestamp the cooldown policy depends on. The timestamp is read
//! fresh on every call; nothing here is cached.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use matchday_core::UserDirectory;
use matchday_domain::{BookingError, Result, UserAccount, UserBookingState};
use rusqlite::{params, OptionalExtension, Row};
use sha2::{Digest, Sha256};
use tokio::task;

use super::manager::DbManager;
use crate::errors::InfraError;

/// Hex SHA-256 of a bearer token, as stored in the directory.
///
/// Tokens are never persisted in the clear.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// SQLite-backed implementation of the `UserDirectory` port
pub struct SqliteUserDirectory {
    db: Arc<DbManager>,
}

impl SqliteUserDirectory {
    /// Create a new directory instance.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Insert or update a user record, keyed by id.
    ///
    /// Used by fixtures and provisioning tooling; account CRUD beyond
    /// this is out of scope for the booking service.
    pub async fn upsert_user(&self, user: &UserAccount, token_sha256: &str) -> Result<()> {
        let db = Arc::clone(&self.db);
        let user = user.clone();
        let token_sha256 = token_sha256.to_string();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO users (id, username, display_name, phone, token_sha256)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET
                     username = excluded.username,
                     display_name = excluded.display_name,
                     phone = excluded.phone,
                     token_sha256 = excluded.token_sha256",
                params![user.id, user.username, user.display_name, user.phone, token_sha256],
            )
            .map_err(|e| BookingError::from(InfraError::from(e)))?;
            Ok(())
        })
        .await
        .map_err(|e| BookingError::from(InfraError::from(e)))?
    }
}

fn map_user_row(row: &Row<'_>) -> rusqlite::Result<UserAccount> {
    Ok(UserAccount {
        id: row.get(0)?,
        username: row.get(1)?,
        display_name: row.get(2)?,
        phone: row.get(3)?,
    })
}

#[async_trait]
impl UserDirectory for SqliteUserDirectory {
    async fn find_by_token(&self, token_sha256: &str) -> Result<Option<UserAccount>> {
        let db = Arc::clone(&self.db);
        let token_sha256 = token_sha256.to_string();

        task::spawn_blocking(move || -> Result<Option<UserAccount>> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT id, username, display_name, phone FROM users WHERE token_sha256 = ?1",
                params![token_sha256],
                map_user_row,
            )
            .optional()
            .map_err(|e| BookingError::from(InfraError::from(e)))
        })
        .await
        .map_err(|e| BookingError::from(InfraError::from(e)))?
    }

    async fn booking_state(&self, user_id: &str) -> Result<UserBookingState> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> Result<UserBookingState> {
            let conn = db.get_connection()?;
            let last: Option<Option<String>> = conn
                .query_row(
                    "SELECT last_cancellation FROM users WHERE id = ?1",
                    params![user_id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|e| BookingError::from(InfraError::from(e)))?;

            let last_cancellation = last.flatten().and_then(|raw| {
                DateTime::parse_from_rfc3339(&raw).ok().map(|dt| dt.with_timezone(&Utc))
            });
            Ok(UserBookingState { last_cancellation })
        })
        .await
        .map_err(|e| BookingError::from(InfraError::from(e)))?
    }

    async fn record_cancellation(&self, user_id: &str, at: DateTime<Utc>) -> Result<()> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "UPDATE users SET last_cancellation = ?1 WHERE id = ?2",
                    params![at.to_rfc3339(), user_id],
                )
                .map_err(|e| BookingError::from(InfraError::from(e)))?;

            if changed == 0 {
                return Err(BookingError::Database(format!("unknown user: {user_id}")));
            }
            Ok(())
        })
        .await
        .map_err(|e| BookingError::from(InfraError::from(e)))?
    }
}
