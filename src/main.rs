use team_schedule::config::Config;
use team_schedule::pipeline;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

type Error = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize structured logging with tracing
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_current_span(false)
        .with_target(false)
        .with_ansi(false)
        .try_init();

    let config = Config::from_env()?;
    match pipeline::run(&config, chrono::Utc::now()).await {
        Ok(summary) => {
            info!(
                games = summary.games,
                notes = summary.notes,
                files = summary.files_written,
                failures = summary.failures,
                "Schedule generated"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Schedule generation failed");
            Err(e.into())
        }
    }
}
