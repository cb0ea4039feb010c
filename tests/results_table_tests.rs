mod common;

use std::sync::Arc;

use team_schedule::model::{HomeAway, ResultTag};
use team_schedule::normalize::Normalizer;
use team_schedule::sources::results_table::parse_results_page;
use team_schedule::sources::{LocationLookup, RawScore};

const OUR_NAME: &str = "Omaha Lightning Blue 6th";

#[test]
fn parse_results_page_extracts_our_games() {
    let repo = common::repo();
    let team = repo.team("12U Blue").expect("fixture team").clone();
    let games = parse_results_page(&team, OUR_NAME, &common::fixture("results.html")).expect("parse");

    // Header row, other teams' game, note row and the TBD game are skipped.
    assert_eq!(games.len(), 3);

    let first = &games[0];
    assert_eq!(first.date, "Saturday, October 18, 2025");
    assert_eq!(first.time, "9:00 AM");
    assert_eq!(first.opponent, "Papillion Storm");
    assert_eq!(first.home_away, Some(HomeAway::Away));
    assert_eq!(first.score, RawScore::Text("21-15".to_string()));
    assert_eq!(first.lookup, LocationLookup::FullName);
    assert!(Arc::ptr_eq(&first.team, &team));

    // Home side: the score flips to ours-theirs.
    let second = &games[1];
    assert_eq!(second.opponent, "Gretna Thunder");
    assert_eq!(second.home_away, Some(HomeAway::Home));
    assert_eq!(second.score, RawScore::Text("25-30".to_string()));

    let third = &games[2];
    assert_eq!(third.date, "Sunday, October 19, 2025");
    assert_eq!(third.time, "2:00 PM");
    assert_eq!(third.score, RawScore::Unplayed);
}

#[test]
fn scraped_games_normalize_against_reference_tables() {
    let repo = common::repo();
    let team = repo.team("12ublue").expect("fixture team").clone();
    let raw = parse_results_page(&team, OUR_NAME, &common::fixture("results.html")).expect("parse");
    let normalizer = Normalizer::new(&repo, " - ");
    let games: Vec<_> = raw.into_iter().map(|g| normalizer.game(g)).collect();

    assert_eq!(games[0].date, common::date(2025, 10, 18));
    assert_eq!(games[0].time, common::at(9, 0));
    assert_eq!(games[0].result, ResultTag::Win);
    assert_eq!(games[0].score_display, "W 21-15");
    assert_eq!(
        games[0].venue.location.as_ref().map(|l| l.abbreviation.as_str()),
        Some("UBT South")
    );
    assert_eq!(games[0].venue.sub_venue.as_deref(), Some("court 2"));

    assert_eq!(games[1].result, ResultTag::Loss);
    assert_eq!(games[1].score_display, "L 25-30");
    assert_eq!(
        games[1].venue.location.as_ref().map(|l| l.name.as_str()),
        Some("Trinity Classical Academy")
    );

    // Unplayed placeholder: no result, dash display.
    assert_eq!(games[2].date, common::date(2025, 10, 19));
    assert_eq!(games[2].result, ResultTag::None);
    assert_eq!(games[2].score_display, "-");
    let location = games[2].venue.location.as_ref().expect("resolved location");
    assert!(!location.has_abbreviation());
    assert_eq!(games[2].venue.sub_venue.as_deref(), Some("gym a"));
}

#[test]
fn page_without_date_headers_yields_nothing() {
    let team = common::team("12U Blue", 1);
    let body = r#"<table>
        <tr><td>1</td><td>9:00 AM</td><td>Gym</td><td>Omaha Lightning Blue 6th</td>
        <td>1</td><td>0</td><td>Other</td><td></td></tr>
    </table>"#;
    let games = parse_results_page(&team, OUR_NAME, body).expect("parse");
    assert!(games.is_empty());
}

#[test]
fn empty_page_is_not_an_error() {
    let team = common::team("12U Blue", 1);
    let games = parse_results_page(&team, OUR_NAME, "").expect("parse");
    assert!(games.is_empty());
}
