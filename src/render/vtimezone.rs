//! VTIMEZONE rules derived from a `chrono-tz` zone.
//!
//! chrono-tz does not expose its rules, so transitions are found by probing
//! UTC offsets across one year and re-expressed as yearly RRULEs.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Offset, TimeZone, Weekday};
use chrono_tz::Tz;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Standard,
    Daylight,
}

impl BlockKind {
    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Standard => "STANDARD",
            BlockKind::Daylight => "DAYLIGHT",
        }
    }
}

/// One STANDARD or DAYLIGHT sub-component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimezoneBlock {
    pub kind: BlockKind,
    /// Onset in local time before the change.
    pub start: NaiveDateTime,
    pub offset_from: i32,
    pub offset_to: i32,
    pub abbreviation: String,
    pub rrule: Option<String>,
}

fn offset_at(tz: Tz, utc: NaiveDateTime) -> i32 {
    tz.offset_from_utc_datetime(&utc).fix().local_minus_utc()
}

fn abbreviation_at(tz: Tz, utc: NaiveDateTime) -> String {
    tz.from_utc_datetime(&utc).format("%Z").to_string()
}

/// "+HHMM" / "-HHMM" as used by TZOFFSETFROM/TZOFFSETTO.
pub fn format_offset(seconds: i32) -> String {
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.abs() / 60;
    format!("{}{:02}{:02}", sign, minutes / 60, minutes % 60)
}

fn weekday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.and_then(|d| d.pred_opt()).map_or(31, |d| d.day())
}

/// "Nth weekday of month" rule for a local onset; 4th/5th occurrences that
/// are also the month's last become -1 so they hold every year.
fn yearly_rule(local: NaiveDateTime) -> String {
    let day = local.day();
    let ordinal = ((day - 1) / 7 + 1) as i32;
    let is_last = day + 7 > days_in_month(local.year(), local.month());
    let ordinal = if ordinal >= 4 && is_last { -1 } else { ordinal };
    format!(
        "FREQ=YEARLY;BYMONTH={};BYDAY={}{}",
        local.month(),
        ordinal,
        weekday_code(local.weekday())
    )
}

/// Offset changes during `year`, in UTC.
fn transitions(tz: Tz, year: i32) -> Vec<(NaiveDateTime, i32, i32)> {
    let Some(start) = NaiveDate::from_ymd_opt(year - 1, 12, 31).and_then(|d| d.and_hms_opt(12, 0, 0)) else {
        return Vec::new();
    };
    let mut found = Vec::new();
    let mut probe = start;
    let mut offset = offset_at(tz, probe);
    for _ in 0..366 {
        let next = probe + Duration::days(1);
        let next_offset = offset_at(tz, next);
        if next_offset != offset {
            // Narrow to the quarter hour.
            let mut t = probe;
            while t < next && offset_at(tz, t) == offset {
                t += Duration::minutes(15);
            }
            found.push((t, offset, next_offset));
            offset = next_offset;
        }
        probe = next;
    }
    found
}

/// Sub-components for `tz`, anchored at `year`.
pub fn timezone_blocks(tz: Tz, year: i32) -> Vec<TimezoneBlock> {
    let changes = transitions(tz, year);
    if changes.is_empty() {
        let anchor = NaiveDate::from_ymd_opt(year, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        let offset = offset_at(tz, anchor);
        return vec![TimezoneBlock {
            kind: BlockKind::Standard,
            start: anchor,
            offset_from: offset,
            offset_to: offset,
            abbreviation: abbreviation_at(tz, anchor),
            rrule: None,
        }];
    }

    // A regular DST zone changes exactly twice a year; anything else is
    // written as one-off onsets.
    let recurring = changes.len() == 2;
    changes
        .into_iter()
        .map(|(utc, from, to)| {
            let local = utc + Duration::seconds(i64::from(from));
            TimezoneBlock {
                kind: if to > from { BlockKind::Daylight } else { BlockKind::Standard },
                start: local,
                offset_from: from,
                offset_to: to,
                abbreviation: abbreviation_at(tz, utc),
                rrule: recurring.then(|| yearly_rule(local)),
            }
        })
        .collect()
}
