use super::game::ScheduleDate;
use super::team::Team;

pub const ALL_TEAMS: &str = "All Teams";

/// Who a note is addressed to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Audience {
    All,
    Teams(Vec<String>),
}

impl Audience {
    /// Parse the sheet's Teams column. Empty or "All Teams" (any case) means everyone.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(ALL_TEAMS) {
            return Audience::All;
        }
        let names: Vec<String> = raw
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();
        if names.iter().any(|n| n.eq_ignore_ascii_case(ALL_TEAMS)) {
            Audience::All
        } else {
            Audience::Teams(names)
        }
    }

    pub fn includes(&self, team: &Team) -> bool {
        match self {
            Audience::All => true,
            Audience::Teams(names) => names
                .iter()
                .any(|n| n.eq_ignore_ascii_case(&team.name) || n.eq_ignore_ascii_case(&team.slug)),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Audience::All => ALL_TEAMS.to_string(),
            Audience::Teams(names) => names.join(", "),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Note {
    pub date: ScheduleDate,
    /// Safe HTML with links already converted.
    pub html: String,
    /// Markup-free form used by the calendar feed.
    pub plain: String,
    pub audience: Audience,
}
