mod common;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use team_schedule::ScheduleError;
use team_schedule::config::Config;
use team_schedule::output::OutputWriter;
use team_schedule::pipeline::run;
use team_schedule::render::calendar::count_parsed_events;
use team_schedule::schedule::Scope;

const TEAMS_WITHOUT_RESULTS: &str = "Name,Slug,Color,Order\nVarsity,varsity,#f59c44,1\n14U White,14uwhite,#FFFFFF,2\n12U Blue,12ublue,#5b9de9,3\n";

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn config_for(dir: &Path, games: &Path) -> Config {
    let teams = dir.join("teams.csv");
    fs::write(&teams, TEAMS_WITHOUT_RESULTS).unwrap();
    let json = serde_json::json!({
        "title": "Lightning Schedule",
        "output_dir": dir.join("dist"),
        "calendar_domain": "schedule.test",
        "teams": { "path": teams },
        "locations": { "path": fixture_path("locations.csv") },
        "games": [{ "path": games }, { "path": dir.join("missing.csv") }],
        "notes": [{ "path": fixture_path("notes.csv") }]
    });
    Config::from_json(&json.to_string()).unwrap()
}

#[tokio::test]
async fn run_writes_every_scope() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), &fixture_path("games.csv"));
    let generated_at = Utc.with_ymd_and_hms(2025, 10, 16, 17, 0, 0).unwrap();

    let summary = run(&config, generated_at).await.unwrap();
    assert_eq!(summary.games, 4);
    assert_eq!(summary.notes, 3);
    assert_eq!(summary.files_written, 8);
    assert_eq!(summary.failures, 0);

    let out = dir.path().join("dist");
    for sub in ["", "varsity", "14uwhite", "12ublue"] {
        assert!(out.join(sub).join("index.html").is_file(), "missing html for {sub:?}");
        assert!(out.join(sub).join("schedule.ics").is_file(), "missing ics for {sub:?}");
    }
    let leftovers: Vec<_> = fs::read_dir(&out)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());

    // Combined feed: 3 dated games plus 3 notes; the "someday" game stays off the calendar.
    let combined = fs::read_to_string(out.join("schedule.ics")).unwrap();
    assert_eq!(count_parsed_events(&combined).unwrap(), 6);
    let combined_html = fs::read_to_string(out.join("index.html")).unwrap();
    assert!(combined_html.contains("Ralston"));
    assert!(combined_html.contains("Millard North"));

    let white_html = fs::read_to_string(out.join("14uwhite/index.html")).unwrap();
    assert!(white_html.contains("Millard North"));
    assert!(!white_html.contains("Bellevue East"));
    assert!(!white_html.contains("Bring a white jersey"));
    assert!(white_html.contains("Picture day!"));

    let blue_ics = fs::read_to_string(out.join("12ublue/schedule.ics")).unwrap();
    assert_eq!(count_parsed_events(&blue_ics).unwrap(), 2);

    // Same inputs and instant, same bytes.
    let again = run(&config, generated_at).await.unwrap();
    assert_eq!(again, summary);
    assert_eq!(fs::read_to_string(out.join("schedule.ics")).unwrap(), combined);
    assert_eq!(fs::read_to_string(out.join("index.html")).unwrap(), combined_html);
}

#[tokio::test]
async fn html_write_failure_still_writes_calendar() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), &fixture_path("games.csv"));
    let blocked = dir.path().join("dist/varsity/index.html");
    fs::create_dir_all(&blocked).unwrap();
    fs::write(blocked.join("keep"), "x").unwrap();

    let summary = run(&config, Utc.with_ymd_and_hms(2025, 10, 16, 17, 0, 0).unwrap()).await.unwrap();
    assert_eq!(summary.failures, 1);
    assert_eq!(summary.files_written, 7);

    let varsity = dir.path().join("dist/varsity");
    assert!(blocked.is_dir());
    assert!(varsity.join("schedule.ics").is_file());
    assert!(!varsity.join(".index.html.tmp").exists());
    assert!(dir.path().join("dist/14uwhite/index.html").is_file());
}

#[tokio::test]
async fn run_without_games_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let empty_games = dir.path().join("games.csv");
    fs::write(&empty_games, "Team,Date,Time,Location,Jersey,Opponent,Score\n").unwrap();
    let config = config_for(dir.path(), &empty_games);

    let result = run(&config, Utc::now()).await;
    assert!(matches!(result, Err(ScheduleError::NoGames)));
    assert!(!dir.path().join("dist").exists());
}

#[tokio::test]
async fn missing_reference_table_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_for(dir.path(), &fixture_path("games.csv"));
    config.teams = team_schedule::config::InputSource::Path(dir.path().join("nope.csv"));

    let result = run(&config, Utc::now()).await;
    assert!(matches!(result, Err(ScheduleError::Fetch { .. })));
}

#[test]
fn writer_places_team_scopes_under_slug() {
    let dir = tempfile::tempdir().unwrap();
    let writer = OutputWriter::new(dir.path());
    let team = common::team("12U Blue", 1);

    let path = writer.write(&Scope::Team(team), "index.html", "<p>hi</p>").unwrap();
    assert_eq!(path, dir.path().join("12ublue").join("index.html"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "<p>hi</p>");
    assert!(!dir.path().join("12ublue").join(".index.html.tmp").exists());

    let root = writer.write(&Scope::Combined, "schedule.ics", "x").unwrap();
    assert_eq!(root, dir.path().join("schedule.ics"));
    assert_eq!(writer.root(), dir.path());
}
