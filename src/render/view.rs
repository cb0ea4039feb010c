//! Render-only derived values, computed from the merged sequence without
//! touching the canonical records.

use std::sync::Arc;

use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::model::{Game, GameTime, HomeAway, Note, ScheduleDate, ScheduleItem, Team, Venue};
use crate::normalize::display_time;
use crate::schedule::Scope;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationCell {
    Tbd,
    /// Shown as-is, no tooltip.
    Plain { text: String, sub_venue: Option<String> },
    /// Abbreviation with the full name (and address) as tooltip.
    Abbreviated { abbr: String, tooltip: String, sub_venue: Option<String> },
}

impl LocationCell {
    pub fn from_venue(venue: &Venue) -> Self {
        let sub_venue = venue.sub_venue.clone();
        match (&venue.location, &venue.name) {
            (None, None) => LocationCell::Tbd,
            (None, Some(raw)) => LocationCell::Plain { text: raw.clone(), sub_venue },
            (Some(loc), _) => {
                let text = loc.display_name().to_string();
                let tooltip = match &loc.address {
                    Some(addr) => format!("{}, {}", loc.name, addr),
                    None => loc.name.clone(),
                };
                // An empty abbreviation shows the full name without a tooltip.
                if !loc.has_abbreviation() || text == tooltip {
                    LocationCell::Plain { text, sub_venue }
                } else {
                    LocationCell::Abbreviated { abbr: text, tooltip, sub_venue }
                }
            }
        }
    }
}

#[derive(Debug)]
pub struct GameRow<'a> {
    pub game: &'a Game,
    pub week_start: bool,
    pub past: bool,
    pub when: String,
    pub location: LocationCell,
    pub jersey: &'static str,
}

#[derive(Debug)]
pub struct NoteRow<'a> {
    pub note: &'a Note,
    pub when: String,
}

#[derive(Debug)]
pub enum Row<'a> {
    Note(NoteRow<'a>),
    Game(GameRow<'a>),
}

#[derive(Debug)]
pub struct PageView<'a> {
    pub title: &'a str,
    pub scope: &'a Scope,
    pub teams: &'a [Arc<Team>],
    pub rows: Vec<Row<'a>>,
    pub generated_at: DateTime<Utc>,
    pub generated_local: String,
}

/// For each position: does this game open a new ISO week relative to the
/// nearest preceding game? Notes are never week starts and are skipped when
/// looking back.
pub fn week_starts(items: &[ScheduleItem]) -> Vec<bool> {
    let mut previous: Option<Option<chrono::IsoWeek>> = None;
    items
        .iter()
        .map(|item| match item {
            ScheduleItem::Note(_) => false,
            ScheduleItem::Game(g) => {
                let week = g.date.iso_week();
                let starts = previous != Some(week);
                previous = Some(week);
                starts
            }
        })
        .collect()
}

/// A game is past once it has a result, or, without one, when its date is
/// before yesterday (one day of grace for timezone skew).
pub fn is_past(game: &Game, today: NaiveDate) -> bool {
    if game.result.is_decided() {
        return true;
    }
    match (game.date, today.checked_sub_days(Days::new(1))) {
        (ScheduleDate::On(d), Some(yesterday)) => d < yesterday,
        _ => false,
    }
}

/// "Sat Oct 18 11AM", "Sat Oct 18 TBD", or "TBD" for an unparsed date.
pub fn display_when(date: ScheduleDate, time: Option<GameTime>) -> String {
    match (date, time) {
        (ScheduleDate::Unparsed, _) => "TBD".to_string(),
        (ScheduleDate::On(d), None) => d.format("%a %b %-d").to_string(),
        (ScheduleDate::On(d), Some(t)) => format!("{} {}", d.format("%a %b %-d"), display_time(t)),
    }
}

pub fn jersey_symbol(home_away: Option<HomeAway>) -> &'static str {
    match home_away {
        Some(HomeAway::Home) => "⬜️",
        Some(HomeAway::Away) => "⬛️",
        None => "TBD",
    }
}

pub fn build_page<'a>(
    title: &'a str,
    scope: &'a Scope,
    teams: &'a [Arc<Team>],
    items: &'a [ScheduleItem],
    generated_at: DateTime<Utc>,
    tz: Tz,
) -> PageView<'a> {
    let local = generated_at.with_timezone(&tz);
    let today = local.date_naive();
    let rows = items
        .iter()
        .zip(week_starts(items))
        .map(|(item, week_start)| match item {
            ScheduleItem::Note(note) => Row::Note(NoteRow { note, when: display_when(note.date, None) }),
            ScheduleItem::Game(game) => Row::Game(GameRow {
                game,
                week_start,
                past: is_past(game, today),
                when: display_when(game.date, Some(game.time)),
                location: LocationCell::from_venue(&game.venue),
                jersey: jersey_symbol(game.home_away),
            }),
        })
        .collect();

    PageView {
        title,
        scope,
        teams,
        rows,
        generated_at,
        generated_local: local.format("%-m/%-d/%y at %-I:%M%p %Z").to_string(),
    }
}
