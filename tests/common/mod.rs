#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use team_schedule::model::{Audience, Game, GameTime, Note, ResultTag, ScheduleDate, Team, Venue};
use team_schedule::reference::ReferenceRepository;

pub fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {}: {}", path, e))
}

pub fn repo() -> ReferenceRepository {
    ReferenceRepository::from_csv(&fixture("teams.csv"), &fixture("locations.csv")).expect("reference tables")
}

pub fn team(name: &str, order: u32) -> Arc<Team> {
    Arc::new(Team {
        name: name.to_string(),
        slug: Team::slugify(name),
        color: "#000000".to_string(),
        order,
        results: None,
    })
}

pub fn date(y: i32, m: u32, d: u32) -> ScheduleDate {
    ScheduleDate::On(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

pub fn at(h: u32, m: u32) -> GameTime {
    GameTime::At(NaiveTime::from_hms_opt(h, m, 0).unwrap())
}

pub fn game(team: &Arc<Team>, date: ScheduleDate, time: GameTime, opponent: &str) -> Game {
    Game {
        team: team.clone(),
        date,
        time,
        venue: Venue::tbd(),
        opponent: opponent.to_string(),
        home_away: None,
        score: "-".to_string(),
        result: ResultTag::None,
        score_display: "-".to_string(),
    }
}

pub fn note(date: ScheduleDate, text: &str, audience: &str) -> Note {
    Note {
        date,
        html: text.to_string(),
        plain: text.to_string(),
        audience: Audience::parse(audience),
    }
}
