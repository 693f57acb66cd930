// src/retry.rs
// Fixed-interval polling for steps that wait on log convergence

use crate::error::{HarnessError, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Default wait between attempts
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default number of attempts before giving up
pub const DEFAULT_POLL_ATTEMPTS: u32 = 15;

/// Bounded polling policy: constant interval, no jitter, no growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_POLL_ATTEMPTS,
        }
    }
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Upper bound on time spent sleeping between attempts
    pub fn max_wait(&self) -> Duration {
        self.interval * self.max_attempts.saturating_sub(1)
    }
}

/// Run `operation` until it succeeds, a non-retryable error occurs, or the
/// attempt budget runs out.
///
/// The closure receives the 1-based attempt number. Exhaustion is reported
/// as `RetriesExhausted` wrapping the last error seen.
pub async fn poll<F, Fut, T>(policy: PollPolicy, what: &str, mut operation: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                debug!(step = what, attempt, "Condition met");
                return Ok(value);
            }
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) if attempt >= max_attempts => {
                warn!(step = what, attempts = attempt, error = %e, "Giving up");
                return Err(HarnessError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(e),
                });
            }
            Err(e) => {
                debug!(
                    step = what,
                    attempt,
                    max_attempts,
                    error = %e,
                    "Not converged, retrying in {:?}",
                    policy.interval
                );
                tokio::time::sleep(policy.interval).await;
                attempt += 1;
            }
        }
    }
}
