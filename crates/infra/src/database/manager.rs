//! Database connection manager backed by an r2d2 SQLite pool.

use std::path::{Path, PathBuf};

use matchday_domain::{BookingError, DatabaseConfig, Result};
use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use tracing::info;

use crate::errors::InfraError;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Pooled SQLite connection
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Database manager that wraps an r2d2 SQLite pool.
pub struct DbManager {
    pool: r2d2::Pool<SqliteConnectionManager>,
    path: PathBuf,
}

impl DbManager {
    /// Open (or create) the database and initialize the pool and schema.
    pub fn new(config: &DatabaseConfig) -> Result<Self> {
        let path = PathBuf::from(&config.path);
        let manager = SqliteConnectionManager::file(&path);
        let pool = r2d2::Pool::builder()
            .max_size(config.pool_size.max(1))
            .build(manager)
            .map_err(|e| BookingError::from(InfraError::from(e)))?;

        let db = Self { pool, path };
        db.run_migrations()?;

        info!(db_path = %db.path.display(), max_connections = config.pool_size, "sqlite pool initialised");
        Ok(db)
    }

    /// In-memory database, for tests and fixtures.
    pub fn in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = r2d2::Pool::builder()
            // A single shared connection keeps the in-memory database
            // alive and visible to every caller.
            .max_size(1)
            .build(manager)
            .map_err(|e| BookingError::from(InfraError::from(e)))?;

        let db = Self { pool, path: PathBuf::from(":memory:") };
        db.run_migrations()?;
        Ok(db)
    }

    /// Acquire a connection from the pool.
    pub fn get_connection(&self) -> Result<DbConnection> {
        self.pool.get().map_err(|e| BookingError::from(InfraError::from(e)))
    }

    /// Ensure the full schema exists on the current database.
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.execute_batch(SCHEMA_SQL).map_err(|e| BookingError::from(InfraError::from(e)))?;
        Ok(())
    }

    /// Return the configured database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Verify database connectivity with a trivial query.
    pub fn health_check(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.query_row("SELECT 1", params![], |row| row.get::<_, i32>(0))
            .map_err(|e| BookingError::from(InfraError::from(e)))?;
        Ok(())
    }
}
