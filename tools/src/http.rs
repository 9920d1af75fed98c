use anyhow::{Context, Result};
use assistant_core::ToolError;
use std::time::Duration;

const USER_AGENT: &str = concat!("assistant/", env!("CARGO_PKG_VERSION"));

/// Shared client settings for every HTTP collaborator.
pub(crate) fn client(timeout_seconds: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .context("Failed to build HTTP client")
}

/// Transport failures (timeouts, refused connections, bad payloads) all
/// surface as `ServiceUnavailable`.
pub(crate) fn unavailable(what: &str, error: reqwest::Error) -> ToolError {
    if error.is_timeout() {
        ToolError::service_unavailable(format!("{what} request timed out."))
    } else if error.is_decode() {
        ToolError::service_unavailable(format!("{what} returned an unexpected response."))
    } else {
        ToolError::service_unavailable(format!("{what} request failed: {error}"))
    }
}
