use std::sync::Arc;

use chrono::{Datelike, IsoWeek, NaiveDate, NaiveTime};

use super::location::Location;
use super::team::Team;

/// Calendar date of an item. `Unparsed` orders after every real date and is
/// never shown as one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScheduleDate {
    On(NaiveDate),
    Unparsed,
}

impl ScheduleDate {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            ScheduleDate::On(d) => Some(*d),
            ScheduleDate::Unparsed => None,
        }
    }

    pub fn iso_week(&self) -> Option<IsoWeek> {
        self.date().map(|d| d.iso_week())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameTime {
    At(NaiveTime),
    Tbd,
}

impl GameTime {
    pub fn time(&self) -> Option<NaiveTime> {
        match self {
            GameTime::At(t) => Some(*t),
            GameTime::Tbd => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HomeAway {
    Home,
    Away,
}

impl HomeAway {
    pub fn label(&self) -> &'static str {
        match self {
            HomeAway::Home => "Home",
            HomeAway::Away => "Away",
        }
    }
}

/// Outcome derived once from the score; `None` covers unplayed, unparseable and tied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultTag {
    Win,
    Loss,
    None,
}

impl ResultTag {
    pub fn is_decided(&self) -> bool {
        !matches!(self, ResultTag::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultTag::Win => "win",
            ResultTag::Loss => "loss",
            ResultTag::None => "none",
        }
    }
}

/// Resolved playing venue. `name` is the base location text (None when TBD);
/// `location` is set only when that text matched the reference table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Venue {
    pub name: Option<String>,
    pub location: Option<Arc<Location>>,
    pub sub_venue: Option<String>,
}

impl Venue {
    pub fn tbd() -> Self {
        Self::default()
    }

    pub fn is_tbd(&self) -> bool {
        self.name.is_none()
    }

    /// Full human description for calendar clients: name, sub-venue, address.
    pub fn full_text(&self) -> Option<String> {
        let base = match (&self.location, &self.name) {
            (Some(loc), _) => loc.name.clone(),
            (None, Some(name)) => name.clone(),
            (None, None) => return None,
        };
        let mut text = base;
        if let Some(sub) = &self.sub_venue {
            text.push_str(" - ");
            text.push_str(sub);
        }
        if let Some(addr) = self.location.as_ref().and_then(|l| l.address.as_deref()) {
            text.push_str(", ");
            text.push_str(addr);
        }
        Some(text)
    }
}

#[derive(Clone, Debug)]
pub struct Game {
    pub team: Arc<Team>,
    pub date: ScheduleDate,
    pub time: GameTime,
    pub venue: Venue,
    pub opponent: String,
    pub home_away: Option<HomeAway>,
    /// Score as recorded from our side, "-" when unplayed.
    pub score: String,
    pub result: ResultTag,
    /// Score text for display, prefixed with W/L when decided.
    pub score_display: String,
}
