use std::time::Duration;

use tracing::{error, info, info_span};
use ureq::Agent;

use crate::config::InputSource;
use crate::error::{Result, ScheduleError};

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,text/csv;q=0.9,*/*;q=0.8";

/// Retrieves raw source bodies over HTTP or from disk.
#[derive(Clone)]
pub struct Fetcher {
    agent: Agent,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }

    pub fn load(&self, label: &str, source: &InputSource) -> Result<String> {
        match source {
            InputSource::Url(url) => self.get(label, url),
            InputSource::Path(path) => std::fs::read_to_string(path).map_err(|e| ScheduleError::Fetch {
                label: label.to_string(),
                reason: format!("cannot read {}: {}", path.display(), e),
            }),
        }
    }

    /// GET `url` and return the body. Non-2xx statuses and timeouts are errors.
    pub fn get(&self, label: &str, url: &str) -> Result<String> {
        let fail = |reason: String| ScheduleError::Fetch { label: label.to_string(), reason };

        let response_result = {
            let _span = info_span!("source_fetch", source = %label, url = %url).entered();
            self.agent
                .get(url)
                .header("User-Agent", USER_AGENT)
                .header("Accept", ACCEPT)
                .header("Accept-Language", "en-US,en;q=0.9")
                .call()
        };

        match response_result {
            Ok(response) => {
                let code = response.status().as_u16();
                let mut body_reader = response.into_body();
                let body = body_reader.read_to_string().map_err(|e| {
                    error!(source = %label, error = %e, "Failed to read response body");
                    fail(format!("failed to read response body: {}", e))
                })?;
                if !(200..300).contains(&code) {
                    error!(source = %label, status = code, "Non-success status");
                    return Err(fail(format!("received status code {}", code)));
                }
                info!(source = %label, status = code, bytes = body.len(), "Fetched source");
                Ok(body)
            }
            Err(e) => {
                error!(source = %label, url = %url, error = %e, "Request failed");
                Err(fail(format!("request failed: {}", e)))
            }
        }
    }
}
