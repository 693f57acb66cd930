// src/config/env.rs
// Environment-based configuration - every VCT_BDD_* variable in one place

use super::ConfigLayer;
use tracing::warn;

pub const ENV_ENDPOINT: &str = "VCT_BDD_ENDPOINT";
pub const ENV_POLL_INTERVAL_MS: &str = "VCT_BDD_POLL_INTERVAL_MS";
pub const ENV_POLL_ATTEMPTS: &str = "VCT_BDD_POLL_ATTEMPTS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "VCT_BDD_REQUEST_TIMEOUT_SECS";
pub const ENV_FIXTURES_DIR: &str = "VCT_BDD_FIXTURES_DIR";
pub const ENV_LOG: &str = "VCT_BDD_LOG";

impl ConfigLayer {
    /// Load the layer from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the layer through an arbitrary variable lookup.
    /// Empty values count as unset; unparsable numbers are ignored with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            endpoint: read(ENV_ENDPOINT),
            poll_interval_ms: read(ENV_POLL_INTERVAL_MS)
                .and_then(|v| parse_number(ENV_POLL_INTERVAL_MS, &v)),
            poll_attempts: read(ENV_POLL_ATTEMPTS)
                .and_then(|v| parse_number(ENV_POLL_ATTEMPTS, &v)),
            request_timeout_secs: read(ENV_REQUEST_TIMEOUT_SECS)
                .and_then(|v| parse_number(ENV_REQUEST_TIMEOUT_SECS, &v)),
            fixtures_dir: read(ENV_FIXTURES_DIR).map(Into::into),
            log_filter: read(ENV_LOG),
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Option<T> {
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(key, value, "Ignoring non-numeric environment value");
            None
        }
    }
}
