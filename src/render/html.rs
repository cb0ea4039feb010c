use std::fmt::Write;
use std::path::Path;

use chrono::SecondsFormat;

use crate::config::AssetPaths;
use crate::error::{Result, ScheduleError};
use crate::model::Team;
use crate::render::view::{GameRow, LocationCell, NoteRow, PageView, Row};
use crate::render::CALENDAR_FILE;
use crate::schedule::Scope;
use crate::text::escape_html;

const ACTIVE_ALL_STYLE: &str = "background-color: #fbcb44 !important; color: black !important;";

/// Stylesheet and script embedded verbatim into every page.
#[derive(Debug, Clone)]
pub struct Assets {
    pub stylesheet: String,
    pub script: String,
}

impl Default for Assets {
    fn default() -> Self {
        Self {
            stylesheet: include_str!("../../assets/schedule.css").to_string(),
            script: include_str!("../../assets/schedule.js").to_string(),
        }
    }
}

impl Assets {
    /// Configured files override the built-in defaults one by one.
    pub fn load(paths: &AssetPaths) -> Result<Self> {
        let read = |p: &Path| {
            std::fs::read_to_string(p)
                .map_err(|e| ScheduleError::Config(format!("cannot read asset {}: {}", p.display(), e)))
        };
        let mut assets = Self::default();
        if let Some(p) = &paths.stylesheet {
            assets.stylesheet = read(p)?;
        }
        if let Some(p) = &paths.script {
            assets.script = read(p)?;
        }
        Ok(assets)
    }
}

fn badge_style(team: &Team) -> String {
    let border = if team.needs_border() { " border: 1px solid black;" } else { "" };
    format!("background-color: {}; color: {};{}", team.color, team.text_color(), border)
}

pub fn render_page(view: &PageView<'_>, assets: &Assets) -> Result<String> {
    let mut out = String::with_capacity(16 * 1024);
    let title = escape_html(view.title);

    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, r#"<html lang="en">"#)?;
    writeln!(out, "<head>")?;
    writeln!(out, r#"    <meta charset="UTF-8">"#)?;
    writeln!(out, r#"    <meta name="viewport" content="width=device-width, initial-scale=1.0">"#)?;
    match view.scope {
        Scope::Combined => writeln!(out, "    <title>{}</title>", title)?,
        Scope::Team(t) => writeln!(out, "    <title>{} - {}</title>", escape_html(&t.name), title)?,
    }
    writeln!(out, "    <style>\n{}\n    </style>", assets.stylesheet)?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "    <h1>{}</h1>", title)?;
    writeln!(
        out,
        r#"    <p id="lastUpdated" class="last-updated" data-utc="{}">Last updated on {}</p>"#,
        view.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        escape_html(&view.generated_local)
    )?;

    write_filters(&mut out, view)?;
    writeln!(
        out,
        r#"    <p class="calendar-link"><a href="{}">Subscribe to calendar</a></p>"#,
        CALENDAR_FILE
    )?;

    writeln!(out, r#"    <table id="scheduleTable">"#)?;
    writeln!(out, "        <thead>")?;
    writeln!(out, "            <tr>")?;
    for heading in ["Team", "Time", "Location", "Jersey", "Opponent", "Score"] {
        writeln!(out, "                <th>{}</th>", heading)?;
    }
    writeln!(out, "            </tr>")?;
    writeln!(out, "        </thead>")?;
    writeln!(out, "        <tbody>")?;
    for row in &view.rows {
        match row {
            Row::Note(note) => write_note_row(&mut out, note)?,
            Row::Game(game) => write_game_row(&mut out, game)?,
        }
    }
    writeln!(out, "        </tbody>")?;
    writeln!(out, "    </table>")?;
    writeln!(out, "    <script>\n{}\n    </script>", assets.script)?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")?;
    Ok(out)
}

fn write_filters(out: &mut String, view: &PageView<'_>) -> Result<()> {
    let nested = matches!(view.scope, Scope::Team(_));
    writeln!(out, r#"    <div class="filter-buttons">"#)?;

    let (all_class, all_style) = match view.scope {
        Scope::Combined => ("filter-btn active", ACTIVE_ALL_STYLE),
        Scope::Team(_) => ("filter-btn", ""),
    };
    writeln!(
        out,
        r#"        <a href="{}" class="{}" style="{}">All Teams</a>"#,
        if nested { "../" } else { "./" },
        all_class,
        all_style
    )?;

    for team in view.teams {
        let active = view.scope.team().is_some_and(|t| t.slug == team.slug);
        let href = if nested { format!("../{}/", team.slug) } else { format!("{}/", team.slug) };
        let (class, style) = if active {
            ("filter-btn active", badge_style(team))
        } else {
            ("filter-btn", String::new())
        };
        writeln!(
            out,
            r#"        <a href="{}" class="{}" style="{}">{}</a>"#,
            escape_html(&href),
            class,
            escape_html(&style),
            escape_html(&team.name)
        )?;
    }
    writeln!(out, "    </div>")?;
    Ok(())
}

fn location_html(cell: &LocationCell) -> String {
    let sub = |s: &Option<String>| match s {
        Some(sub) => format!(" ({})", escape_html(sub)),
        None => String::new(),
    };
    match cell {
        LocationCell::Tbd => "TBD".to_string(),
        LocationCell::Plain { text, sub_venue } => format!("{}{}", escape_html(text), sub(sub_venue)),
        LocationCell::Abbreviated { abbr, tooltip, sub_venue } => format!(
            r#"<span class="location-wrapper"><span class="location-abbr">{}</span><span class="location-tooltip">{}</span></span>{}"#,
            escape_html(abbr),
            escape_html(tooltip),
            sub(sub_venue)
        ),
    }
}

fn write_game_row(out: &mut String, row: &GameRow<'_>) -> Result<()> {
    let game = row.game;
    let mut classes = vec!["game-row", game.result.as_str()];
    if row.week_start {
        classes.push("week-start");
    }
    if row.past {
        classes.push("past");
    }
    let opponent = if game.opponent.is_empty() { "TBD" } else { &game.opponent };

    writeln!(out, r#"            <tr class="{}" data-team="{}">"#, classes.join(" "), escape_html(&game.team.slug))?;
    writeln!(
        out,
        r#"                <td><span class="team-badge" style="{}">{}</span></td>"#,
        escape_html(&badge_style(&game.team)),
        escape_html(&game.team.name)
    )?;
    writeln!(out, "                <td>{}</td>", escape_html(&row.when))?;
    writeln!(out, "                <td>{}</td>", location_html(&row.location))?;
    writeln!(out, "                <td>{}</td>", row.jersey)?;
    writeln!(out, "                <td>{}</td>", escape_html(opponent))?;
    writeln!(out, "                <td>{}</td>", escape_html(&game.score_display))?;
    writeln!(out, "            </tr>")?;
    Ok(())
}

fn write_note_row(out: &mut String, row: &NoteRow<'_>) -> Result<()> {
    writeln!(
        out,
        r#"            <tr class="note-row" data-teams="{}">"#,
        escape_html(&row.note.audience.label())
    )?;
    writeln!(
        out,
        r#"                <td colspan="6"><span class="note-date">{}</span> {}</td>"#,
        escape_html(&row.when),
        row.note.html
    )?;
    writeln!(out, "            </tr>")?;
    Ok(())
}
