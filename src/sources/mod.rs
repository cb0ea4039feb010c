//! Source adapters: raw input in, provisional records out.
//!
//! Adapters never fail a whole source because of one bad row; they log and
//! skip. A source-level `Err` (unreadable body, bad header) is handled by the
//! pipeline as an empty contribution.

pub mod games_sheet;
pub mod notes_sheet;
pub mod results_table;

use std::sync::Arc;

use crate::model::{HomeAway, Team};

/// How a provisional location string should be matched against the
/// reference table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocationLookup {
    /// Scraped tables carry canonical full names.
    FullName,
    /// Hand-entered sheets use abbreviations.
    Abbreviation,
}

/// Score as seen by an adapter, before any numeric interpretation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawScore {
    /// "ours-theirs" text.
    Text(String),
    Unplayed,
}

#[derive(Clone, Debug)]
pub struct ProvisionalGame {
    pub team: Arc<Team>,
    pub date: String,
    pub time: String,
    pub location: String,
    pub lookup: LocationLookup,
    pub opponent: String,
    pub home_away: Option<HomeAway>,
    pub score: RawScore,
}

#[derive(Clone, Debug)]
pub struct ProvisionalNote {
    pub date: String,
    pub text: String,
    pub audience: String,
}
