mod common;

use team_schedule::model::{GameTime, ScheduleDate, ScheduleItem};
use team_schedule::normalize::Normalizer;
use team_schedule::schedule::{Scope, merge};
use team_schedule::sources::notes_sheet::parse_notes_sheet;

fn describe(items: &[ScheduleItem]) -> Vec<String> {
    items
        .iter()
        .map(|item| match item {
            ScheduleItem::Note(n) => format!("note:{}", n.plain),
            ScheduleItem::Game(g) => format!("{}:{}", g.team.name, g.opponent),
        })
        .collect()
}

#[test]
fn merge_orders_by_date_then_notes_then_time_then_team() {
    let a = common::team("Alpha", 2);
    let b = common::team("Bravo", 1);
    let day = common::date(2025, 10, 18);

    let games = vec![
        common::game(&a, day, GameTime::Tbd, "tbd-a"),
        common::game(&a, day, common::at(18, 0), "evening-a"),
        common::game(&b, common::date(2025, 10, 17), common::at(9, 0), "friday"),
        common::game(&a, day, common::at(9, 0), "morning-a"),
        common::game(&b, day, GameTime::Tbd, "tbd-b"),
        common::game(&b, day, common::at(9, 0), "morning-b"),
        common::game(&a, ScheduleDate::Unparsed, common::at(8, 0), "unknown"),
    ];
    let notes = vec![
        common::note(day, "first", ""),
        common::note(ScheduleDate::Unparsed, "floating", ""),
        common::note(day, "second", ""),
    ];

    let items = merge(&games, &notes, &Scope::Combined);
    assert_eq!(
        describe(&items),
        vec![
            "Bravo:friday",
            "note:first",
            "note:second",
            "Bravo:morning-b",
            "Alpha:morning-a",
            "Alpha:evening-a",
            "Bravo:tbd-b",
            "Alpha:tbd-a",
            "note:floating",
            "Alpha:unknown",
        ]
    );
}

#[test]
fn merge_is_deterministic_for_shuffled_input() {
    let a = common::team("Alpha", 1);
    let b = common::team("Bravo", 2);
    let games = vec![
        common::game(&a, common::date(2025, 10, 18), common::at(10, 0), "x"),
        common::game(&b, common::date(2025, 10, 18), common::at(10, 0), "y"),
        common::game(&a, common::date(2025, 10, 19), GameTime::Tbd, "z"),
        common::game(&b, common::date(2025, 10, 17), GameTime::Tbd, "w"),
    ];
    let mut reversed = games.clone();
    reversed.reverse();

    let forward = describe(&merge(&games, &[], &Scope::Combined));
    let backward = describe(&merge(&reversed, &[], &Scope::Combined));
    assert_eq!(forward, backward);
    assert_eq!(forward, vec!["Bravo:w", "Alpha:x", "Bravo:y", "Alpha:z"]);
}

#[test]
fn team_scope_filters_games_and_addressed_notes() {
    let repo = common::repo();
    let normalizer = Normalizer::new(&repo, " - ");
    let notes: Vec<_> = parse_notes_sheet("notes", &common::fixture("notes.csv"))
        .expect("parse")
        .into_iter()
        .map(|n| normalizer.note(n))
        .collect();

    let varsity = repo.team("Varsity").expect("team").clone();
    let blue = repo.team("12U Blue").expect("team").clone();
    let games = vec![
        common::game(&varsity, common::date(2025, 10, 18), common::at(18, 0), "Bellevue East"),
        common::game(&blue, common::date(2025, 10, 19), common::at(9, 0), "Papillion"),
    ];

    let scopes = Scope::all(&repo);
    assert_eq!(scopes.len(), 4);
    assert_eq!(scopes[0].label(), "All Teams");

    let combined = merge(&games, &notes, &Scope::Combined);
    assert_eq!(combined.len(), 5);

    let blue_items = merge(&games, &notes, &Scope::Team(blue.clone()));
    let blue_desc = describe(&blue_items);
    assert_eq!(blue_desc.len(), 3);
    assert!(blue_desc[0].starts_with("note:Picture day!"));
    assert_eq!(blue_desc[1], "note:Bring a white jersey");
    assert_eq!(blue_desc[2], "12U Blue:Papillion");

    // The slug in the Teams column addresses the team too.
    let varsity_desc = describe(&merge(&games, &notes, &Scope::Team(varsity)));
    assert_eq!(varsity_desc.len(), 3);
    assert_eq!(varsity_desc[0], "note:Gym closed; use the north door, please");

    let white = repo.team("14U White").expect("team").clone();
    let white_desc = describe(&merge(&games, &notes, &Scope::Team(white)));
    assert_eq!(white_desc.len(), 1);
    assert!(white_desc[0].starts_with("note:Picture day!"));
}
