// src/config/mod.rs
// Harness configuration: CLI > environment > config file > defaults

mod env;
mod file;

pub use env::{
    ENV_ENDPOINT, ENV_FIXTURES_DIR, ENV_LOG, ENV_POLL_ATTEMPTS, ENV_POLL_INTERVAL_MS,
    ENV_REQUEST_TIMEOUT_SECS,
};
pub use file::DEFAULT_CONFIG_FILE;

use crate::client::normalize_endpoint;
use crate::error::{HarnessError, Result};
use crate::http::DEFAULT_TIMEOUT;
use crate::retry::PollPolicy;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Default tracing filter when nothing else is configured
pub const DEFAULT_LOG_FILTER: &str = "info";

/// One source of settings. Every field is optional so layers can be stacked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    /// Overrides the endpoint quoted in connect steps
    pub endpoint: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub poll_attempts: Option<u32>,
    pub request_timeout_secs: Option<u64>,
    pub fixtures_dir: Option<PathBuf>,
    /// tracing filter directive
    pub log_filter: Option<String>,
}

impl ConfigLayer {
    /// Fill unset fields from a lower-priority layer
    pub fn or(self, lower: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            endpoint: self.endpoint.or(lower.endpoint),
            poll_interval_ms: self.poll_interval_ms.or(lower.poll_interval_ms),
            poll_attempts: self.poll_attempts.or(lower.poll_attempts),
            request_timeout_secs: self.request_timeout_secs.or(lower.request_timeout_secs),
            fixtures_dir: self.fixtures_dir.or(lower.fixtures_dir),
            log_filter: self.log_filter.or(lower.log_filter),
        }
    }

    pub fn validate(&self) -> ConfigValidation {
        let mut validation = ConfigValidation::default();

        if let Some(endpoint) = &self.endpoint
            && let Err(e) = normalize_endpoint(endpoint)
        {
            validation.add_error(e.to_string());
        }
        if self.poll_attempts == Some(0) {
            validation.add_error("poll_attempts must be at least 1");
        }
        if self.poll_interval_ms == Some(0) {
            validation
                .add_warning("poll_interval_ms is 0: polling steps will not wait for the log");
        }
        if self.request_timeout_secs == Some(0) {
            validation.add_error("request_timeout_secs must be at least 1");
        }
        if let Some(dir) = &self.fixtures_dir
            && !dir.is_dir()
        {
            validation.add_error(format!("fixtures_dir {} is not a directory", dir.display()));
        }

        validation
    }

    /// Validate and apply defaults
    pub fn resolve(self) -> Result<HarnessConfig> {
        let validation = self.validate();
        for w in &validation.warnings {
            warn!("{}", w);
        }
        validation.into_result()?;

        let defaults = PollPolicy::default();
        let poll = PollPolicy::new(
            self.poll_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.interval),
            self.poll_attempts.unwrap_or(defaults.max_attempts),
        );

        Ok(HarnessConfig {
            endpoint: self.endpoint,
            poll,
            request_timeout: self
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
            fixtures_dir: self.fixtures_dir,
            log_filter: self.log_filter.unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}

/// Fully resolved settings for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub endpoint: Option<String>,
    pub poll: PollPolicy,
    pub request_timeout: Duration,
    pub fixtures_dir: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            poll: PollPolicy::default(),
            request_timeout: DEFAULT_TIMEOUT,
            fixtures_dir: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Problems found in a merged layer; warnings are logged, errors abort
#[derive(Debug, Default)]
pub struct ConfigValidation {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ConfigValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// All errors folded into one `Config` error
    pub fn into_result(self) -> Result<()> {
        if self.errors.is_empty() {
            return Ok(());
        }
        Err(HarnessError::Config(self.errors.join("; ")))
    }
}
