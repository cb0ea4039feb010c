use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

pub const CONFIG_ENV: &str = "SCHEDULE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "schedule.json";

/// Where one raw input comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSource {
    Url(String),
    Path(PathBuf),
}

impl InputSource {
    pub fn describe(&self) -> String {
        match self {
            InputSource::Url(url) => url.clone(),
            InputSource::Path(path) => path.display().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetPaths {
    pub stylesheet: Option<PathBuf>,
    pub script: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_calendar_domain")]
    pub calendar_domain: String,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_location_separator")]
    pub location_separator: String,
    pub teams: InputSource,
    pub locations: InputSource,
    #[serde(default)]
    pub games: Vec<InputSource>,
    #[serde(default)]
    pub notes: Vec<InputSource>,
    #[serde(default)]
    pub assets: AssetPaths,
}

fn default_title() -> String {
    "Game Schedule".to_string()
}

fn default_timezone() -> String {
    "America/Chicago".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_calendar_domain() -> String {
    "schedule.invalid".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_location_separator() -> String {
    " - ".to_string()
}

impl Config {
    /// Load the configuration file named by `SCHEDULE_CONFIG` (or `schedule.json`).
    pub fn from_env() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::from_path(Path::new(&path))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let body = std::fs::read_to_string(path).map_err(|e| {
            ScheduleError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_json(&body)
    }

    pub fn from_json(body: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(body)?;
        // Fail early on a bad zone name rather than at render time.
        config.tz()?;
        Ok(config)
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| ScheduleError::Config(format!("Unknown timezone {}: {}", self.timezone, e)))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
