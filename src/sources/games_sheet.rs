use tracing::{info, warn};

use crate::error::Result;
use crate::normalize::jersey_home_away;
use crate::reference::ReferenceRepository;
use crate::sheet::Sheet;
use crate::sources::{LocationLookup, ProvisionalGame, RawScore};

/// Read manually entered games.
///
/// Columns: Team, Date, Time, Location, Jersey, Opponent, Score. Team, Date
/// and Opponent are required; the rest may be blank or missing.
pub fn parse_games_sheet(label: &str, body: &str, repo: &ReferenceRepository) -> Result<Vec<ProvisionalGame>> {
    let sheet = Sheet::parse(label, body)?;
    sheet.require_columns(label, &["Team", "Date", "Opponent"])?;
    let mut games = Vec::new();

    for row in sheet.rows() {
        let (team_name, date, opponent) = (row.get("Team"), row.get("Date"), row.get("Opponent"));
        if team_name.is_empty() || date.is_empty() || opponent.is_empty() {
            if !row.is_blank() {
                warn!(source = %label, line = row.line, "Skipping game row missing team, date or opponent");
            }
            continue;
        }
        let Some(team) = repo.team(team_name) else {
            warn!(source = %label, line = row.line, team = %team_name, "Skipping game row for unknown team");
            continue;
        };

        games.push(ProvisionalGame {
            team: team.clone(),
            date: date.to_string(),
            time: row.get("Time").to_string(),
            location: row.get("Location").to_string(),
            lookup: LocationLookup::Abbreviation,
            opponent: opponent.to_string(),
            home_away: jersey_home_away(row.get("Jersey")),
            score: match row.opt("Score") {
                Some(s) => RawScore::Text(s.to_string()),
                None => RawScore::Unplayed,
            },
        });
    }

    info!(source = %label, rows = sheet.len(), games = games.len(), "Parsed games sheet");
    Ok(games)
}
