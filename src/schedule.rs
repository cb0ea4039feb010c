//! Merging games and notes into one ordered sequence per scope.
//!
//! Order: date ascending (unparsed last); notes before games on a date;
//! notes keep insertion order; games with times before TBD games, timed
//! games by time then team, TBD games by team. Team order is the reference
//! table's (order, name). Remaining ties keep insertion order because the
//! sort is stable, so equal input gives identical output.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::model::{Game, GameTime, Note, ScheduleItem, Team};
use crate::reference::ReferenceRepository;

#[derive(Clone, Debug)]
pub enum Scope {
    Combined,
    Team(Arc<Team>),
}

impl Scope {
    /// Every output scope: combined first, then each known team in display order.
    pub fn all(repo: &ReferenceRepository) -> Vec<Scope> {
        std::iter::once(Scope::Combined)
            .chain(repo.teams().iter().cloned().map(Scope::Team))
            .collect()
    }

    pub fn team(&self) -> Option<&Arc<Team>> {
        match self {
            Scope::Combined => None,
            Scope::Team(t) => Some(t),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Scope::Combined => "All Teams",
            Scope::Team(t) => &t.name,
        }
    }

    pub fn includes_game(&self, game: &Game) -> bool {
        match self {
            Scope::Combined => true,
            Scope::Team(t) => t.slug == game.team.slug,
        }
    }

    pub fn includes_note(&self, note: &Note) -> bool {
        match self {
            Scope::Combined => true,
            Scope::Team(t) => note.audience.includes(t),
        }
    }
}

fn compare_teams(a: &Team, b: &Team) -> Ordering {
    a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name))
}

/// Same-date game order.
pub fn compare_games(a: &Game, b: &Game) -> Ordering {
    match (a.time, b.time) {
        (GameTime::At(ta), GameTime::At(tb)) => ta.cmp(&tb).then_with(|| compare_teams(&a.team, &b.team)),
        (GameTime::Tbd, GameTime::Tbd) => compare_teams(&a.team, &b.team),
        (GameTime::At(_), GameTime::Tbd) => Ordering::Less,
        (GameTime::Tbd, GameTime::At(_)) => Ordering::Greater,
    }
}

pub fn compare_items(a: &ScheduleItem, b: &ScheduleItem) -> Ordering {
    a.date().cmp(&b.date()).then_with(|| match (a, b) {
        (ScheduleItem::Note(_), ScheduleItem::Game(_)) => Ordering::Less,
        (ScheduleItem::Game(_), ScheduleItem::Note(_)) => Ordering::Greater,
        (ScheduleItem::Note(_), ScheduleItem::Note(_)) => Ordering::Equal,
        (ScheduleItem::Game(ga), ScheduleItem::Game(gb)) => compare_games(ga, gb),
    })
}

/// Select the items belonging to `scope` and sort them.
pub fn merge(games: &[Game], notes: &[Note], scope: &Scope) -> Vec<ScheduleItem> {
    let mut items: Vec<ScheduleItem> = notes
        .iter()
        .filter(|n| scope.includes_note(n))
        .cloned()
        .map(ScheduleItem::Note)
        .chain(games.iter().filter(|g| scope.includes_game(g)).cloned().map(ScheduleItem::Game))
        .collect();
    // Must stay a stable sort: note order and exact game ties depend on it.
    items.sort_by(compare_items);
    items
}
