use std::thread;
use std::time::Duration;

use log::{debug, warn};

use crate::config::EvaluatorConfig;

/// Bounded retry loop around a blocking request. The caller never sees the
/// individual attempts, only the final outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub timeout: Duration,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            timeout: Duration::from_secs(60),
            retry_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &EvaluatorConfig) -> Self {
        Self {
            max_attempts: config.max_retries.max(1),
            timeout: config.timeout(),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    /// Runs `attempt(n, timeout)` for n = 1..=max_attempts until it succeeds,
    /// sleeping `retry_delay` between failures. Returns the last error when
    /// every attempt failed.
    pub fn run<T, E, F>(&self, mut attempt: F) -> Result<T, E>
    where
        E: std::fmt::Display,
        F: FnMut(u32, Duration) -> Result<T, E>,
    {
        let attempts = self.max_attempts.max(1);
        let mut n = 1;
        loop {
            debug!("evaluator attempt {n}/{attempts}");
            match attempt(n, self.timeout) {
                Ok(value) => return Ok(value),
                Err(err) if n < attempts => {
                    warn!("evaluator attempt {n}/{attempts} failed: {err}");
                    if !self.retry_delay.is_zero() {
                        thread::sleep(self.retry_delay);
                    }
                    n += 1;
                }
                Err(err) => {
                    warn!("evaluator gave up after {attempts} attempt(s): {err}");
                    return Err(err);
                }
            }
        }
    }
}
