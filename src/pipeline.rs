use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{error, info, info_span, instrument, warn};

use crate::config::{Config, InputSource};
use crate::error::{Result, ScheduleError};
use crate::fetch::Fetcher;
use crate::model::{Game, Note};
use crate::normalize::Normalizer;
use crate::output::OutputWriter;
use crate::reference::ReferenceRepository;
use crate::render::{Assets, CALENDAR_FILE, FeedOptions, HTML_FILE, build_page, render_feed, render_page};
use crate::schedule::{Scope, merge};
use crate::sources::games_sheet::parse_games_sheet;
use crate::sources::notes_sheet::parse_notes_sheet;
use crate::sources::results_table::parse_results_page;
use crate::sources::{ProvisionalGame, ProvisionalNote};

/// What one source contributed. Failed sources contribute nothing.
#[derive(Debug, Default)]
pub struct SourceOutput {
    pub label: String,
    pub games: Vec<ProvisionalGame>,
    pub notes: Vec<ProvisionalNote>,
}

impl SourceOutput {
    fn empty(label: String) -> Self {
        Self { label, ..Default::default() }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub games: usize,
    pub notes: usize,
    pub files_written: usize,
    pub failures: usize,
}

/// Settings the render stage needs, independent of where inputs came from.
pub struct RenderSettings<'a> {
    pub title: &'a str,
    pub calendar_domain: &'a str,
    pub tz: Tz,
    pub generated_at: DateTime<Utc>,
    pub assets: &'a Assets,
}

/// Run the whole pipeline once.
#[instrument(level = "info", skip_all, fields(output = %config.output_dir.display()))]
pub async fn run(config: &Config, generated_at: DateTime<Utc>) -> Result<RunSummary> {
    let tz = config.tz()?;
    let assets = Assets::load(&config.assets)?;
    let fetcher = Fetcher::new(config.fetch_timeout());

    let repo = Arc::new(load_reference(&fetcher, config).await?);
    let outputs = collect_sources(&fetcher, config, repo.clone()).await;

    let normalizer = Normalizer::new(&repo, &config.location_separator);
    let mut games: Vec<Game> = Vec::new();
    let mut notes: Vec<Note> = Vec::new();
    for output in outputs {
        info!(source = %output.label, games = output.games.len(), notes = output.notes.len(), "Source contributed");
        games.extend(output.games.into_iter().map(|g| normalizer.game(g)));
        notes.extend(output.notes.into_iter().map(|n| normalizer.note(n)));
    }

    if games.is_empty() {
        error!("No games from any source; refusing to write output");
        return Err(ScheduleError::NoGames);
    }
    info!(games = games.len(), notes = notes.len(), "Total schedule items");

    let settings = RenderSettings {
        title: &config.title,
        calendar_domain: &config.calendar_domain,
        tz,
        generated_at,
        assets: &assets,
    };
    let writer = OutputWriter::new(&config.output_dir);
    let mut summary = render_all(&repo, &games, &notes, &settings, &writer);
    summary.games = games.len();
    summary.notes = notes.len();
    Ok(summary)
}

async fn load_reference(fetcher: &Fetcher, config: &Config) -> Result<ReferenceRepository> {
    let fetcher = fetcher.clone();
    let (teams, locations) = (config.teams.clone(), config.locations.clone());
    tokio::task::spawn_blocking(move || {
        let teams_csv = fetcher.load("teams", &teams)?;
        let locations_csv = fetcher.load("locations", &locations)?;
        ReferenceRepository::from_csv(&teams_csv, &locations_csv)
    })
    .await
    .map_err(|e| ScheduleError::Config(format!("reference table task failed: {}", e)))?
}

/// Fetch and parse every source, one blocking task each.
///
/// Each task owns its inputs and returns its own slice; results are combined
/// in spawn order, so completion order never affects the output.
async fn collect_sources(fetcher: &Fetcher, config: &Config, repo: Arc<ReferenceRepository>) -> Vec<SourceOutput> {
    let mut handles: Vec<(String, tokio::task::JoinHandle<SourceOutput>)> = Vec::new();

    for team in repo.teams() {
        let Some(locator) = team.results.clone() else { continue };
        let (fetcher, team) = (fetcher.clone(), team.clone());
        let label = format!("results:{}", team.slug);
        let task_label = label.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let games = fetcher
                .get(&task_label, &locator.url)
                .and_then(|body| parse_results_page(&team, &locator.html_name, &body));
            match games {
                Ok(games) => SourceOutput { label: task_label, games, notes: Vec::new() },
                Err(e) => {
                    error!(source = %task_label, error = %e, "Source failed; skipping");
                    SourceOutput::empty(task_label)
                }
            }
        });
        handles.push((label, handle));
    }

    for (i, source) in config.games.iter().enumerate() {
        let label = format!("games#{}", i + 1);
        let (fetcher, source, repo, task_label) = (fetcher.clone(), source.clone(), repo.clone(), label.clone());
        let handle = tokio::task::spawn_blocking(move || {
            match load_games(&fetcher, &task_label, &source, &repo) {
                Ok(games) => SourceOutput { label: task_label, games, notes: Vec::new() },
                Err(e) => {
                    error!(source = %task_label, input = %source.describe(), error = %e, "Source failed; skipping");
                    SourceOutput::empty(task_label)
                }
            }
        });
        handles.push((label, handle));
    }

    for (i, source) in config.notes.iter().enumerate() {
        let label = format!("notes#{}", i + 1);
        let (fetcher, source, task_label) = (fetcher.clone(), source.clone(), label.clone());
        let handle = tokio::task::spawn_blocking(move || {
            let notes = fetcher
                .load(&task_label, &source)
                .and_then(|body| parse_notes_sheet(&task_label, &body));
            match notes {
                Ok(notes) => SourceOutput { label: task_label, games: Vec::new(), notes },
                Err(e) => {
                    error!(source = %task_label, input = %source.describe(), error = %e, "Source failed; skipping");
                    SourceOutput::empty(task_label)
                }
            }
        });
        handles.push((label, handle));
    }

    let mut outputs = Vec::with_capacity(handles.len());
    for (label, handle) in handles {
        match handle.await {
            Ok(output) => outputs.push(output),
            Err(e) => error!(source = %label, error = %e, "Source task join error"),
        }
    }
    outputs
}

fn load_games(
    fetcher: &Fetcher,
    label: &str,
    source: &InputSource,
    repo: &ReferenceRepository,
) -> Result<Vec<ProvisionalGame>> {
    let body = fetcher.load(label, source)?;
    parse_games_sheet(label, &body, repo)
}

/// Render both formats for every scope. A failure affects only that
/// (scope, format) pair.
pub fn render_all(
    repo: &ReferenceRepository,
    games: &[Game],
    notes: &[Note],
    settings: &RenderSettings<'_>,
    writer: &OutputWriter,
) -> RunSummary {
    let mut summary = RunSummary::default();
    let feed_options = FeedOptions {
        title: settings.title,
        domain: settings.calendar_domain,
        tz: settings.tz,
        generated_at: settings.generated_at,
    };

    for scope in Scope::all(repo) {
        let _span = info_span!("render_scope", scope = %scope.label()).entered();
        let items = merge(games, notes, &scope);

        let view = build_page(settings.title, &scope, repo.teams(), &items, settings.generated_at, settings.tz);
        match render_page(&view, settings.assets).and_then(|html| writer.write(&scope, HTML_FILE, &html)) {
            Ok(_) => summary.files_written += 1,
            Err(e) => {
                warn!(error = %e, "Skipping HTML output for scope");
                summary.failures += 1;
            }
        }

        match render_feed(&scope, &items, &feed_options).and_then(|ics| writer.write(&scope, CALENDAR_FILE, &ics)) {
            Ok(_) => summary.files_written += 1,
            Err(e) => {
                warn!(error = %e, "Skipping calendar output for scope");
                summary.failures += 1;
            }
        }
    }
    summary
}
