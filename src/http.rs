// src/http.rs
// Shared HTTP client for all log requests

use crate::error::{HarnessError, Result};
use std::time::Duration;

/// Per-request timeout the log client is bounded by
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connect timeout
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Create the shared HTTP client.
///
/// Built once per run and handed to every log client the run creates, so
/// connections to the same endpoint are pooled across scenarios.
pub fn create_shared_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .user_agent(concat!("vct-bdd/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(HarnessError::Transport)
}
