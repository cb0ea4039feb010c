//! Scraper for tournament "team results" pages.
//!
//! The page is a sequence of `<tr>` rows: a `<th>` row carrying a long-form
//! date ("Saturday, October 18, 2025") opens a day, and each following
//! 8-cell data row is a game on that day:
//! game#, time, location, visitor, visitor score, home score, home, (blank).

use std::sync::{Arc, LazyLock};

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};

use crate::error::{Result, ScheduleError};
use crate::model::{HomeAway, Team};
use crate::sources::{LocationLookup, ProvisionalGame, RawScore};
use crate::text::collapse_whitespace;

/// Placeholder the results site shows in score cells of unplayed games.
pub const UNPLAYED_SCORE: &str = "×";

const DATA_ROW_CELLS: usize = 8;

static DATE_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z]+day,\s+[A-Za-z]+\s+\d{1,2},\s+\d{4}").expect("valid date header regex")
});

static TIME_DATE_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Mon|Tue|Wed|Thu|Fri|Sat|Sun)\s+\d+/\d+/\d+\s+").expect("valid time prefix regex")
});

static HAS_CLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+:\d+").expect("valid clock regex"));

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScheduleError::Scrape(format!("bad selector {css}: {e:?}")))
}

fn cell_text(el: &ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

/// Extract `team`'s games from one results page.
///
/// `html_name` is the exact label the page uses for our team; rows naming
/// neither side as ours are skipped.
#[instrument(level = "info", skip(team, body), fields(team = %team.name, bytes = body.len()))]
pub fn parse_results_page(team: &Arc<Team>, html_name: &str, body: &str) -> Result<Vec<ProvisionalGame>> {
    let document = Html::parse_document(body);
    let row_selector = selector("tr")?;
    let th_selector = selector("th")?;
    let td_selector = selector("td")?;

    let ours = collapse_whitespace(html_name);
    let mut games = Vec::new();
    let mut current_date: Option<String> = None;

    for row in document.select(&row_selector) {
        if row.select(&th_selector).next().is_some() {
            let header = cell_text(&row);
            if let Some(m) = DATE_HEADER_RE.find(&header) {
                current_date = Some(m.as_str().to_string());
            }
        }

        let cells: Vec<String> = row.select(&td_selector).map(|c| cell_text(&c)).collect();
        if cells.len() != DATA_ROW_CELLS {
            continue;
        }
        let Some(date) = current_date.as_ref() else {
            debug!("Data row before any date header");
            continue;
        };

        let game_number = &cells[0];
        let time = TIME_DATE_PREFIX_RE.replace(&cells[1], "").into_owned();
        if game_number.is_empty() || !HAS_CLOCK_RE.is_match(&time) {
            continue;
        }

        let (location, visitor, visitor_score, home_score, home) =
            (&cells[2], &cells[3], &cells[4], &cells[5], &cells[6]);

        let (opponent, home_away, our_score, their_score) = if *visitor == ours {
            (home, HomeAway::Away, visitor_score, home_score)
        } else if *home == ours {
            (visitor, HomeAway::Home, home_score, visitor_score)
        } else {
            continue;
        };

        games.push(ProvisionalGame {
            team: team.clone(),
            date: date.clone(),
            time,
            location: location.clone(),
            lookup: LocationLookup::FullName,
            opponent: opponent.clone(),
            home_away: Some(home_away),
            score: raw_score(our_score, their_score),
        });
    }

    info!(games = games.len(), "Parsed results page");
    Ok(games)
}

fn raw_score(ours: &str, theirs: &str) -> RawScore {
    let unplayed = |s: &str| s.is_empty() || s == UNPLAYED_SCORE;
    if unplayed(ours) || unplayed(theirs) {
        RawScore::Unplayed
    } else {
        RawScore::Text(format!("{}-{}", ours, theirs))
    }
}
