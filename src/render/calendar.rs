//! iCalendar feed for one scope.
//!
//! Serialized by hand so the output is a pure function of its inputs
//! (stable UIDs, DTSTAMP from the generation instant) and then parsed back
//! with `icalendar` before it is accepted.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::model::{Game, GameTime, HomeAway, Note, ScheduleDate, ScheduleItem};
use crate::render::vtimezone::{format_offset, timezone_blocks};
use crate::schedule::Scope;
use crate::text::{collapse_whitespace, fnv1a64};

pub const PRODID: &str = "-//team-schedule//Schedule Feed//EN";
const MAX_LINE_OCTETS: usize = 75;

pub struct FeedOptions<'a> {
    pub title: &'a str,
    pub domain: &'a str,
    pub tz: Tz,
    pub generated_at: DateTime<Utc>,
}

/// Escape a TEXT value: backslash, semicolon, comma and newline; other
/// control characters are dropped.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let normalized = s.replace("\r\n", "\n");
    for ch in normalized.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            c if c.is_control() && c != '\t' => {}
            c => out.push(c),
        }
    }
    out
}

/// Fold a content line at 75 octets without splitting a UTF-8 sequence.
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut used = 0;
    // Continuation lines start with a space, which counts toward the limit.
    let mut limit = MAX_LINE_OCTETS;
    for ch in line.chars() {
        let width = ch.len_utf8();
        if used + width > limit {
            out.push_str("\r\n ");
            used = 0;
            limit = MAX_LINE_OCTETS - 1;
        }
        out.push(ch);
        used += width;
    }
    out
}

#[derive(Default)]
struct Lines {
    out: String,
}

impl Lines {
    fn line(&mut self, content: &str) {
        self.out.push_str(&fold_line(content));
        self.out.push_str("\r\n");
    }

    fn prop(&mut self, name: &str, value: &str) {
        self.line(&format!("{}:{}", name, value));
    }

    fn text(&mut self, name: &str, value: &str) {
        self.prop(name, &escape_text(value));
    }
}

fn ics_date(d: NaiveDate) -> String {
    d.format("%Y%m%d").to_string()
}

fn ics_local(dt: NaiveDateTime) -> String {
    dt.format("%Y%m%dT%H%M%S").to_string()
}

/// Stable UID for a game: same team, date, time and opponent give the same id.
pub fn game_uid(game: &Game, date: NaiveDate, domain: &str) -> String {
    let time = match game.time {
        GameTime::At(t) => t.format("%H%M").to_string(),
        GameTime::Tbd => "tbd".to_string(),
    };
    let hash = fnv1a64(&[&game.team.slug, &ics_date(date), &time, &game.opponent.to_lowercase()]);
    format!("game-{}-{}-{}-{:016x}@{}", game.team.slug, ics_date(date), time, hash, domain)
}

pub fn note_uid(note: &Note, date: NaiveDate, domain: &str) -> String {
    let hash = fnv1a64(&[&ics_date(date), &note.plain, &note.audience.label()]);
    format!("note-{}-{:016x}@{}", ics_date(date), hash, domain)
}

fn game_summary(game: &Game) -> String {
    let opponent = if game.opponent.is_empty() { "TBD" } else { &game.opponent };
    match game.home_away {
        Some(HomeAway::Away) => format!("{} @ {}", game.team.name, opponent),
        _ => format!("{} vs {}", game.team.name, opponent),
    }
}

fn game_description(game: &Game) -> String {
    let mut parts = Vec::new();
    if let Some(side) = game.home_away {
        let jersey = match side {
            HomeAway::Home => "light",
            HomeAway::Away => "dark",
        };
        parts.push(format!("{} - {} jerseys", side.label(), jersey));
    }
    if game.time == GameTime::Tbd {
        parts.push("Time TBD".to_string());
    }
    if game.score != "-" {
        parts.push(format!("Score: {}", game.score_display));
    }
    parts.join("\n")
}

fn write_game(lines: &mut Lines, game: &Game, date: NaiveDate, opts: &FeedOptions<'_>, stamp: &str) {
    lines.line("BEGIN:VEVENT");
    lines.prop("UID", &game_uid(game, date, opts.domain));
    lines.prop("DTSTAMP", stamp);
    match game.time {
        GameTime::At(t) => {
            let start = date.and_time(t);
            let end = start + Duration::hours(1);
            let tzid = opts.tz.name();
            lines.prop(&format!("DTSTART;TZID={}", tzid), &ics_local(start));
            lines.prop(&format!("DTEND;TZID={}", tzid), &ics_local(end));
        }
        GameTime::Tbd => {
            lines.prop("DTSTART;VALUE=DATE", &ics_date(date));
            let next = date.checked_add_days(Days::new(1)).unwrap_or(date);
            lines.prop("DTEND;VALUE=DATE", &ics_date(next));
        }
    }
    lines.text("SUMMARY", &game_summary(game));
    if let Some(location) = game.venue.full_text() {
        lines.text("LOCATION", &location);
    }
    let description = game_description(game);
    if !description.is_empty() {
        lines.text("DESCRIPTION", &description);
    }
    lines.line("END:VEVENT");
}

fn write_note(lines: &mut Lines, note: &Note, date: NaiveDate, opts: &FeedOptions<'_>, stamp: &str) {
    lines.line("BEGIN:VEVENT");
    lines.prop("UID", &note_uid(note, date, opts.domain));
    lines.prop("DTSTAMP", stamp);
    lines.prop("DTSTART;VALUE=DATE", &ics_date(date));
    let next = date.checked_add_days(Days::new(1)).unwrap_or(date);
    lines.prop("DTEND;VALUE=DATE", &ics_date(next));
    lines.text("SUMMARY", &collapse_whitespace(&note.plain));
    if note.plain.contains('\n') {
        lines.text("DESCRIPTION", &note.plain);
    }
    lines.prop("TRANSP", "TRANSPARENT");
    lines.line("END:VEVENT");
}

/// Observances start the year before the earliest event so every event
/// falls after an onset. Zones without a yearly rule get one-off onsets for
/// each year the feed spans.
fn write_timezone(lines: &mut Lines, tz: Tz, first_year: i32, last_year: i32) {
    lines.line("BEGIN:VTIMEZONE");
    lines.prop("TZID", tz.name());
    lines.prop("X-LIC-LOCATION", tz.name());
    let mut blocks = timezone_blocks(tz, first_year - 1);
    if blocks.iter().any(|b| b.rrule.is_none() && b.offset_from != b.offset_to) {
        for year in first_year..=last_year {
            blocks.extend(timezone_blocks(tz, year));
        }
    }
    for block in blocks {
        lines.line(&format!("BEGIN:{}", block.kind.name()));
        lines.prop("TZOFFSETFROM", &format_offset(block.offset_from));
        lines.prop("TZOFFSETTO", &format_offset(block.offset_to));
        lines.text("TZNAME", &block.abbreviation);
        lines.prop("DTSTART", &ics_local(block.start));
        if let Some(rule) = &block.rrule {
            lines.prop("RRULE", rule);
        }
        lines.line(&format!("END:{}", block.kind.name()));
    }
    lines.line("END:VTIMEZONE");
}

/// Render the feed for `scope`. Items with an unparsed date are left out.
pub fn render_feed(scope: &Scope, items: &[ScheduleItem], opts: &FeedOptions<'_>) -> Result<String> {
    let stamp = opts.generated_at.format("%Y%m%dT%H%M%SZ").to_string();
    let name = match scope {
        Scope::Combined => opts.title.to_string(),
        Scope::Team(t) => format!("{} - {}", t.name, opts.title),
    };
    let years = || items.iter().filter_map(|i| i.date().date()).map(|d| d.year());
    let first_year = years().min().unwrap_or_else(|| opts.generated_at.year());
    let last_year = years().max().unwrap_or(first_year);

    let mut lines = Lines::default();
    lines.line("BEGIN:VCALENDAR");
    lines.prop("VERSION", "2.0");
    lines.prop("PRODID", PRODID);
    lines.prop("CALSCALE", "GREGORIAN");
    lines.prop("METHOD", "PUBLISH");
    lines.text("X-WR-CALNAME", &name);
    lines.prop("X-WR-TIMEZONE", opts.tz.name());
    write_timezone(&mut lines, opts.tz, first_year, last_year);

    let mut events = 0usize;
    for item in items {
        let ScheduleDate::On(date) = item.date() else {
            debug!(scope = %scope.label(), "Leaving undated item out of the feed");
            continue;
        };
        match item {
            ScheduleItem::Game(game) => write_game(&mut lines, game, date, opts, &stamp),
            ScheduleItem::Note(note) => write_note(&mut lines, note, date, opts, &stamp),
        }
        events += 1;
    }
    lines.line("END:VCALENDAR");

    let ics = lines.out;
    let parsed_events = count_parsed_events(&ics)?;
    if parsed_events != events {
        return Err(ScheduleError::Render(format!(
            "calendar for {} parsed back with {} events, expected {}",
            scope.label(),
            parsed_events,
            events
        )));
    }
    Ok(ics)
}

/// Parse a feed with `icalendar` and count its VEVENTs.
pub fn count_parsed_events(ics: &str) -> Result<usize> {
    let unfolded = icalendar::parser::unfold(ics);
    let parsed = icalendar::parser::read_calendar(&unfolded)
        .map_err(|e| ScheduleError::Render(format!("generated calendar does not parse: {}", e)))?;
    let calendar: icalendar::Calendar = parsed.into();
    Ok(calendar
        .components
        .iter()
        .filter(|c| matches!(c, icalendar::CalendarComponent::Event(_)))
        .count())
}
