// src/error.rs
// Error taxonomy for the harness

use thiserror::Error;

/// Errors surfaced by harness steps, the log client and the runner.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("log API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("fixture not found: {0}")]
    FixtureNotFound(String),

    #[error("invalid fixture name: {0}")]
    InvalidFixtureName(String),

    #[error("not connected: run the connect step first")]
    NotConnected,

    #[error("no entries fetched yet: run the entries step first")]
    NoEntries,

    #[error("entry index {index} out of range, {available} entries fetched")]
    IndexOutOfRange { index: usize, available: usize },

    #[error("{0}")]
    Mismatch(String),

    #[error("{0}")]
    Invariant(String),

    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<HarnessError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Result using HarnessError
pub type Result<T> = std::result::Result<T, HarnessError>;

impl HarnessError {
    /// Whether a polling step should try again after this error.
    ///
    /// Client failures inside a poll count as "log not converged yet";
    /// script and state errors never do.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            HarnessError::Transport(_)
                | HarnessError::Api { .. }
                | HarnessError::Decode { .. }
                | HarnessError::Mismatch(_)
                | HarnessError::Invariant(_)
        )
    }

    pub fn mismatch(msg: impl Into<String>) -> Self {
        HarnessError::Mismatch(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        HarnessError::Invariant(msg.into())
    }
}
