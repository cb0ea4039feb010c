//! Provisional records to canonical ones.
//!
//! Nothing here fails: unparseable dates become `ScheduleDate::Unparsed`,
//! unparseable times `GameTime::Tbd`, unparseable scores `ResultTag::None`.

use std::sync::{Arc, LazyLock};

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use tracing::{debug, warn};

use crate::model::{
    Audience, Game, GameTime, HomeAway, Location, Note, ResultTag, ScheduleDate, Venue,
};
use crate::reference::ReferenceRepository;
use crate::sources::{LocationLookup, ProvisionalGame, ProvisionalNote, RawScore};
use crate::text::{collapse_whitespace, escape_html};

/// Tried in order; the first that parses wins.
const DATE_FORMATS: [&str; 7] = [
    "%A, %B %d, %Y",
    "%a, %b %d, %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    // Two-digit years first: %Y would read "06" as the year 6.
    "%m/%d/%y",
    "%m/%d/%Y",
    "%Y-%m-%d",
];

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{1,2}):(\d{2})\s*(AM|PM)").expect("valid time regex"));

static WEEKDAY_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+day,\s*").expect("valid weekday regex"));

static MARKDOWN_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\((https?://[^\s)]+)\)").expect("valid markdown link regex")
});

static BARE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"]+"#).expect("valid url regex"));

pub fn parse_date(raw: &str) -> ScheduleDate {
    let s = collapse_whitespace(raw);
    if s.is_empty() {
        return ScheduleDate::Unparsed;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(&s, fmt) {
            return ScheduleDate::On(d);
        }
    }
    // chrono rejects a weekday that disagrees with the date; the date wins.
    if let Some(m) = WEEKDAY_PREFIX_RE.find(&s) {
        let rest = &s[m.end()..];
        for fmt in ["%B %d, %Y", "%b %d, %Y"] {
            if let Ok(d) = NaiveDate::parse_from_str(rest, fmt) {
                return ScheduleDate::On(d);
            }
        }
    }
    debug!(date = %raw, "Unparseable date");
    ScheduleDate::Unparsed
}

/// `H:MM AM|PM`, case-insensitive, anywhere in the text. Anything else is TBD.
pub fn parse_time(raw: &str) -> GameTime {
    let Some(caps) = TIME_RE.captures(raw) else {
        return GameTime::Tbd;
    };
    let hour: u32 = caps[1].parse().unwrap_or(0);
    let minute: u32 = caps[2].parse().unwrap_or(60);
    if !(1..=12).contains(&hour) {
        return GameTime::Tbd;
    }
    let pm = caps[3].eq_ignore_ascii_case("PM");
    let hour24 = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    NaiveTime::from_hms_opt(hour24, minute, 0).map_or(GameTime::Tbd, GameTime::At)
}

/// Compact a time for display: "4:00 PM" -> "4PM", "9:30 am" -> "9:30AM".
/// Text that is not a time (including "TBD") comes back unchanged.
pub fn format_time(raw: &str) -> String {
    let Some(caps) = TIME_RE.captures(raw) else {
        return raw.to_string();
    };
    let meridiem = caps[3].to_ascii_uppercase();
    if &caps[2] == "00" {
        format!("{}{}", &caps[1], meridiem)
    } else {
        format!("{}:{}{}", &caps[1], &caps[2], meridiem)
    }
}

pub fn display_time(time: GameTime) -> String {
    match time {
        GameTime::At(t) => format_time(&t.format("%-I:%M %p").to_string()),
        GameTime::Tbd => "TBD".to_string(),
    }
}

/// Interpret an "ours-theirs" score.
///
/// Returns (recorded score, result tag, display text). Ties are not a valid
/// final state for this format and yield `ResultTag::None`.
pub fn score_outcome(score: &RawScore) -> (String, ResultTag, String) {
    let text = match score {
        RawScore::Unplayed => return ("-".to_string(), ResultTag::None, "-".to_string()),
        RawScore::Text(t) => t.trim(),
    };
    if text.is_empty() || text == "-" {
        return ("-".to_string(), ResultTag::None, "-".to_string());
    }

    let parsed = text
        .split_once(['-', '–'])
        .and_then(|(a, b)| Some((a.trim().parse::<u32>().ok()?, b.trim().parse::<u32>().ok()?)));
    let Some((ours, theirs)) = parsed else {
        return (text.to_string(), ResultTag::None, text.to_string());
    };

    let line = format!("{}-{}", ours, theirs);
    if ours > theirs {
        (line.clone(), ResultTag::Win, format!("W {}", line))
    } else if ours < theirs {
        (line.clone(), ResultTag::Loss, format!("L {}", line))
    } else {
        warn!(score = %text, "Tied score has no defined result; leaving it undecided");
        (line.clone(), ResultTag::None, line)
    }
}

/// Jersey column marker to home/away.
pub fn jersey_home_away(marker: &str) -> Option<HomeAway> {
    let m = marker.to_lowercase();
    if m.contains("home") || m.contains("light") {
        Some(HomeAway::Home)
    } else if m.contains("away") || m.contains("dark") {
        Some(HomeAway::Away)
    } else {
        None
    }
}

/// Convert note text to safe HTML: markdown links first, then bare URLs in
/// the text between them.
pub fn note_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 32);
    let mut last = 0;
    for caps in MARKDOWN_LINK_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&linkify_bare_urls(&text[last..whole.start()]));
        out.push_str(&anchor(&caps[2], &caps[1]));
        last = whole.end();
    }
    out.push_str(&linkify_bare_urls(&text[last..]));
    out.trim().replace('\n', "<br>")
}

/// Markup-free note text: "[label](url)" becomes "label (url)".
pub fn note_plain(text: &str) -> String {
    MARKDOWN_LINK_RE.replace_all(text, "$1 ($2)").trim().to_string()
}

fn linkify_bare_urls(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut last = 0;
    for m in BARE_URL_RE.find_iter(segment) {
        // Sentence punctuation right after a URL belongs to the sentence.
        let url = m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?', ')']);
        out.push_str(&escape_html(&segment[last..m.start()]));
        out.push_str(&anchor(url, url));
        last = m.start() + url.len();
    }
    out.push_str(&escape_html(&segment[last..]));
    out
}

fn anchor(url: &str, label: &str) -> String {
    format!(
        r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
        escape_html(url),
        escape_html(label)
    )
}

/// Completes provisional records against the reference tables.
pub struct Normalizer<'a> {
    repo: &'a ReferenceRepository,
    separator: &'a str,
}

impl<'a> Normalizer<'a> {
    pub fn new(repo: &'a ReferenceRepository, separator: &'a str) -> Self {
        Self { repo, separator }
    }

    pub fn game(&self, raw: ProvisionalGame) -> Game {
        let (score, result, score_display) = score_outcome(&raw.score);
        Game {
            date: parse_date(&raw.date),
            time: parse_time(&raw.time),
            venue: self.venue(&raw.location, raw.lookup),
            opponent: collapse_whitespace(&raw.opponent),
            home_away: raw.home_away,
            score,
            result,
            score_display,
            team: raw.team,
        }
    }

    pub fn note(&self, raw: ProvisionalNote) -> Note {
        Note {
            date: parse_date(&raw.date),
            html: note_html(&raw.text),
            plain: note_plain(&raw.text),
            audience: Audience::parse(&raw.audience),
        }
    }

    /// Split "Base - court 2" into a resolved base location and a sub-venue.
    /// Unknown base names are carried as raw text.
    pub fn venue(&self, raw: &str, lookup: LocationLookup) -> Venue {
        let raw = collapse_whitespace(raw);
        if raw.is_empty() || raw.eq_ignore_ascii_case("TBD") {
            return Venue::tbd();
        }

        // A canonical name may itself contain the separator.
        if let Some(loc) = self.lookup(&raw, lookup) {
            return Venue { name: Some(raw), location: Some(loc.clone()), sub_venue: None };
        }

        let (base, sub_venue) = match raw.split_once(self.separator) {
            Some((base, sub)) => {
                let sub = sub.trim().to_lowercase();
                (base.trim().to_string(), Some(sub).filter(|s| !s.is_empty()))
            }
            None => (raw, None),
        };
        let location = self.lookup(&base, lookup).cloned();
        if location.is_none() {
            debug!(location = %base, "Location not in reference table");
        }
        Venue { name: Some(base), location, sub_venue }
    }

    fn lookup(&self, name: &str, lookup: LocationLookup) -> Option<&Arc<Location>> {
        match lookup {
            LocationLookup::FullName => self.repo.location_by_name(name),
            LocationLookup::Abbreviation => self
                .repo
                .location_by_abbreviation(name)
                .or_else(|| self.repo.location_by_name(name)),
        }
    }
}
