use std::path::PathBuf;
use std::time::Duration;

use team_schedule::ScheduleError;
use team_schedule::config::{Config, InputSource};

#[test]
fn config_defaults_fill_optional_fields() {
    let json = serde_json::json!({
        "teams": { "path": "data/teams.csv" },
        "locations": { "url": "https://example.com/locations.csv" }
    });
    let config = Config::from_json(&json.to_string()).unwrap();

    assert_eq!(config.title, "Game Schedule");
    assert_eq!(config.timezone, "America/Chicago");
    assert_eq!(config.output_dir, PathBuf::from("dist"));
    assert_eq!(config.calendar_domain, "schedule.invalid");
    assert_eq!(config.location_separator, " - ");
    assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
    assert!(config.games.is_empty());
    assert!(config.notes.is_empty());
    assert!(config.assets.stylesheet.is_none());

    assert_eq!(config.teams, InputSource::Path(PathBuf::from("data/teams.csv")));
    assert_eq!(config.locations.describe(), "https://example.com/locations.csv");
}

#[test]
fn config_reads_source_lists() {
    let json = serde_json::json!({
        "title": "Lightning",
        "timezone": "America/Denver",
        "fetch_timeout_secs": 3,
        "teams": { "path": "teams.csv" },
        "locations": { "path": "locations.csv" },
        "games": [{ "url": "https://example.com/a.csv" }, { "path": "b.csv" }],
        "notes": [{ "path": "notes.csv" }]
    });
    let config = Config::from_json(&json.to_string()).unwrap();
    assert_eq!(config.games.len(), 2);
    assert_eq!(config.games[0], InputSource::Url("https://example.com/a.csv".to_string()));
    assert_eq!(config.tz().unwrap(), chrono_tz::America::Denver);
    assert_eq!(config.fetch_timeout(), Duration::from_secs(3));
}

#[test]
fn config_rejects_unknown_timezone() {
    let json = serde_json::json!({
        "timezone": "Mars/Olympus_Mons",
        "teams": { "path": "teams.csv" },
        "locations": { "path": "locations.csv" }
    });
    let err = Config::from_json(&json.to_string()).unwrap_err();
    assert!(matches!(err, ScheduleError::Config(_)), "{err}");
}

#[test]
fn config_requires_reference_tables() {
    let err = Config::from_json(r#"{"title": "x"}"#).unwrap_err();
    assert!(matches!(err, ScheduleError::Json(_)));
}

#[test]
fn config_from_missing_file_is_config_error() {
    let err = Config::from_path(&PathBuf::from("/nonexistent/schedule.json")).unwrap_err();
    assert!(matches!(err, ScheduleError::Config(_)));
}
