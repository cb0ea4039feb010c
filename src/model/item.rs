use super::game::{Game, ScheduleDate};
use super::note::Note;

/// The unit the merger orders and the renderers consume.
#[derive(Clone, Debug)]
pub enum ScheduleItem {
    Note(Note),
    Game(Game),
}

impl ScheduleItem {
    pub fn date(&self) -> ScheduleDate {
        match self {
            ScheduleItem::Note(n) => n.date,
            ScheduleItem::Game(g) => g.date,
        }
    }

    pub fn as_game(&self) -> Option<&Game> {
        match self {
            ScheduleItem::Game(g) => Some(g),
            ScheduleItem::Note(_) => None,
        }
    }
}
