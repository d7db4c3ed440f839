//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `MATCHDAY_BIND`: HTTP bind address
//! - `MATCHDAY_DB_PATH`: Database file path
//! - `MATCHDAY_DB_POOL_SIZE`: Connection pool size
//! - `MATCHDAY_CALENDAR_BASE_URL`: Calendar REST API base URL
//! - `MATCHDAY_CALENDAR_TOKEN`: Calendar API bearer token
//! - `MATCHDAY_CALENDAR_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `MATCHDAY_TIMEZONE`: IANA timezone for slot display
//! - `MATCHDAY_STADIUMS`: JSON array of `{calendar_id, name}` objects
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./matchday.toml` / `./matchday.json`
//! 2. `./config.toml` / `./config.json`
//! 3. The same names in the parent directory

use std::path::{Path, PathBuf};

use matchday_domain::{
    BookingError, CalendarConfig, Config, DatabaseConfig, Result, ServerConfig, StadiumCalendar,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// All required environment variables must be present. Returns an error
/// if any are missing.
pub fn load_from_env() -> Result<Config> {
    let bind = env_var("MATCHDAY_BIND")?;
    let db_path = env_var("MATCHDAY_DB_PATH")?;
    let db_pool_size = env_var("MATCHDAY_DB_POOL_SIZE").and_then(|s| {
        s.parse::<u32>().map_err(|e| BookingError::Config(format!("Invalid pool size: {e}")))
    })?;

    let base_url = env_var("MATCHDAY_CALENDAR_BASE_URL")?;
    let api_token = env_var("MATCHDAY_CALENDAR_TOKEN")?;
    let request_timeout_secs = env_var("MATCHDAY_CALENDAR_TIMEOUT_SECS").and_then(|s| {
        s.parse::<u64>().map_err(|e| BookingError::Config(format!("Invalid timeout: {e}")))
    })?;
    let timezone = env_var("MATCHDAY_TIMEZONE")?;

    let stadiums: Vec<StadiumCalendar> = env_var("MATCHDAY_STADIUMS").and_then(|raw| {
        serde_json::from_str(&raw)
            .map_err(|e| BookingError::Config(format!("Invalid MATCHDAY_STADIUMS: {e}")))
    })?;

    Ok(Config {
        server: ServerConfig { bind },
        database: DatabaseConfig { path: db_path, pool_size: db_pool_size },
        calendar: CalendarConfig {
            base_url,
            api_token,
            request_timeout_secs,
            timezone,
            stadiums,
        },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
pub fn load_from_file(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(BookingError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p.to_path_buf()
        }
        None => probe_config_paths().ok_or_else(|| {
            BookingError::Config("No config file found in probed locations".into())
        })?,
    };

    let contents = std::fs::read_to_string(&path).map_err(|e| {
        BookingError::Config(format!("Failed to read {}: {e}", path.display()))
    })?;

    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&contents)
            .map_err(|e| BookingError::Config(format!("Invalid TOML: {e}")))?,
        Some("json") => serde_json::from_str(&contents)
            .map_err(|e| BookingError::Config(format!("Invalid JSON: {e}")))?,
        other => {
            return Err(BookingError::Config(format!(
                "Unsupported config format: {other:?} ({})",
                path.display()
            )))
        }
    };

    tracing::info!(path = %path.display(), "Configuration loaded from file");
    Ok(config)
}

/// Probe the known config file locations, returning the first that
/// exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let names = ["matchday.toml", "matchday.json", "config.toml", "config.json"];
    let roots = [PathBuf::from("."), PathBuf::from("..")];

    for root in &roots {
        for name in &names {
            let candidate = root.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| BookingError::Config(format!("Missing environment variable: {name}")))
}
