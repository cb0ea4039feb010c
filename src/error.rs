use thiserror::Error;

/// Errors surfaced by the schedule pipeline.
///
/// Only `Config`, reference-table failures and `NoGames` stop a run; the
/// rest are logged and confined to one source or one output file.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fetch failed for {label}: {reason}")]
    Fetch { label: String, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Sheet {label} has no {column} column")]
    MissingColumn { label: String, column: String },

    #[error("HTML scrape error: {0}")]
    Scrape(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Formatting error")]
    Fmt(#[from] std::fmt::Error),

    #[error("No games found from any source")]
    NoGames,
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
