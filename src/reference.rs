use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::Result;
use crate::model::team::DEFAULT_TEAM_COLOR;
use crate::model::{Location, ResultsLocator, Team};
use crate::sheet::Sheet;

/// Known teams and locations, built once and shared read-only by every
/// adapter and renderer.
#[derive(Debug, Default)]
pub struct ReferenceRepository {
    teams: Vec<Arc<Team>>,
    locations: Vec<Arc<Location>>,
    team_index: HashMap<String, usize>,
    location_by_name: HashMap<String, usize>,
    location_by_abbr: HashMap<String, usize>,
}

impl ReferenceRepository {
    pub fn new(mut teams: Vec<Team>, locations: Vec<Location>) -> Self {
        // Display and tie-break order is (order, name); never the input order.
        teams.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));

        // Slugs name output directories; the first team with a slug keeps it.
        let mut seen_slugs = HashSet::new();
        teams.retain(|team| {
            let fresh = seen_slugs.insert(team.slug.to_lowercase());
            if !fresh {
                warn!(team = %team.name, slug = %team.slug, "Skipping team with a duplicate slug");
            }
            fresh
        });

        let mut team_index = HashMap::new();
        for (i, team) in teams.iter().enumerate() {
            team_index.entry(team.name.to_lowercase()).or_insert(i);
            team_index.entry(team.slug.to_lowercase()).or_insert(i);
        }

        let mut location_by_name = HashMap::new();
        let mut location_by_abbr = HashMap::new();
        for (i, loc) in locations.iter().enumerate() {
            location_by_name.entry(loc.name.clone()).or_insert(i);
            if loc.has_abbreviation() {
                location_by_abbr.entry(loc.abbreviation.clone()).or_insert(i);
            }
        }

        Self {
            teams: teams.into_iter().map(Arc::new).collect(),
            locations: locations.into_iter().map(Arc::new).collect(),
            team_index,
            location_by_name,
            location_by_abbr,
        }
    }

    /// Build from the team and location CSV exports.
    pub fn from_csv(teams_csv: &str, locations_csv: &str) -> Result<Self> {
        let teams = parse_teams(&Sheet::parse("teams", teams_csv)?);
        let locations = parse_locations(&Sheet::parse("locations", locations_csv)?);
        info!(teams = teams.len(), locations = locations.len(), "Loaded reference tables");
        Ok(Self::new(teams, locations))
    }

    /// Teams in display order.
    pub fn teams(&self) -> &[Arc<Team>] {
        &self.teams
    }

    pub fn locations(&self) -> &[Arc<Location>] {
        &self.locations
    }

    /// Case-insensitive lookup by display name or slug.
    pub fn team(&self, name_or_slug: &str) -> Option<&Arc<Team>> {
        self.team_index
            .get(&name_or_slug.trim().to_lowercase())
            .map(|&i| &self.teams[i])
    }

    pub fn location_by_name(&self, name: &str) -> Option<&Arc<Location>> {
        self.location_by_name.get(name.trim()).map(|&i| &self.locations[i])
    }

    pub fn location_by_abbreviation(&self, abbr: &str) -> Option<&Arc<Location>> {
        self.location_by_abbr.get(abbr.trim()).map(|&i| &self.locations[i])
    }
}

fn parse_teams(sheet: &Sheet) -> Vec<Team> {
    let mut teams = Vec::new();
    for (position, row) in sheet.rows().enumerate() {
        let Some(name) = row.opt("Name") else {
            if !row.is_blank() {
                warn!(line = row.line, "Skipping team row without a name");
            }
            continue;
        };
        let slug = row
            .opt("Slug")
            .map(Team::slugify)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Team::slugify(name));
        let order = row
            .opt("Order")
            .and_then(|o| o.parse::<u32>().ok())
            .unwrap_or(position as u32);
        let results = match (row.opt("URL"), row.opt("HTML Name")) {
            (Some(url), Some(html_name)) => Some(ResultsLocator {
                url: url.to_string(),
                html_name: html_name.to_string(),
            }),
            (Some(_), None) => {
                warn!(team = %name, "Results URL without an HTML name; team will not be scraped");
                None
            }
            _ => None,
        };
        teams.push(Team {
            name: name.to_string(),
            slug,
            color: row.opt("Color").unwrap_or(DEFAULT_TEAM_COLOR).to_string(),
            order,
            results,
        });
    }
    teams
}

fn parse_locations(sheet: &Sheet) -> Vec<Location> {
    sheet
        .rows()
        .filter_map(|row| {
            let name = row.opt("Name")?;
            Some(Location {
                name: name.to_string(),
                abbreviation: row.get("Abbreviation").to_string(),
                address: row.opt("Address").map(|s| s.to_string()),
            })
        })
        .collect()
}
