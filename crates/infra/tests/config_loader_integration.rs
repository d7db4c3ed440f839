//! Integration tests for file-based configuration loading

use std::io::Write;

use matchday_infra::config::load_from_file;
use tempfile::NamedTempFile;

fn temp_config(extension: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(&format!(".{extension}"))
        .tempfile()
        .expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn loads_toml_config() {
    let file = temp_config(
        "toml",
        r#"
[server]
bind = "127.0.0.1:9000"

[database]
path = "/tmp/matchday-test.db"
pool_size = 4

[calendar]
base_url = "http://localhost:1234/calendar/v3"
api_token = "test-token"
request_timeout_secs = 10
timezone = "Europe/Rome"

[[calendar.stadiums]]
calendar_id = "cal-north@example.com"
name = "North Stadium"

[[calendar.stadiums]]
calendar_id = "cal-south@example.com"
name = "South Stadium"
"#,
    );

    let config = load_from_file(Some(file.path())).expect("load toml config");

    assert_eq!(config.server.bind, "127.0.0.1:9000");
    assert_eq!(config.database.pool_size, 4);
    assert_eq!(config.calendar.timezone, "Europe/Rome");
    assert_eq!(config.calendar.stadiums.len(), 2);
    assert_eq!(config.calendar.stadiums[1].name, "South Stadium");

    let settings = config.booking_settings().expect("parse settings");
    assert_eq!(settings.timezone, chrono_tz::Europe::Rome);
}

#[test]
fn loads_json_config() {
    let file = temp_config(
        "json",
        r#"{
            "server": { "bind": "0.0.0.0:8080" },
            "database": { "path": "matchday.db", "pool_size": 8 },
            "calendar": {
                "base_url": "http://localhost:1234/calendar/v3",
                "api_token": "test-token",
                "request_timeout_secs": 30,
                "timezone": "UTC",
                "stadiums": [
                    { "calendar_id": "cal@example.com", "name": "Main" }
                ]
            }
        }"#,
    );

    let config = load_from_file(Some(file.path())).expect("load json config");

    assert_eq!(config.server.bind, "0.0.0.0:8080");
    assert_eq!(config.calendar.stadiums[0].calendar_id, "cal@example.com");
}

#[test]
fn rejects_missing_file() {
    let err = load_from_file(Some(std::path::Path::new("/nonexistent/matchday.toml")))
        .expect_err("should fail");
    assert!(err.to_string().contains("not found"));
}

#[test]
fn rejects_malformed_toml() {
    let file = temp_config("toml", "[server\nbind = ");
    let err = load_from_file(Some(file.path())).expect_err("should fail");
    assert!(err.to_string().contains("Invalid TOML"));
}

#[test]
fn rejects_invalid_timezone() {
    let file = temp_config(
        "toml",
        r#"
[server]
bind = "127.0.0.1:9000"

[database]
path = "matchday.db"
pool_size = 2

[calendar]
base_url = "http://localhost:1234"
api_token = "t"
request_timeout_secs = 5
timezone = "Mars/Olympus"
stadiums = []
"#,
    );

    let config = load_from_file(Some(file.path())).expect("load config");
    let err = config.booking_settings().expect_err("timezone should be rejected");
    assert!(err.to_string().contains("Invalid timezone"));
}
