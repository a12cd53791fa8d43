//! Bounded retry with exponential backoff

use std::error::Error;
use std::future::Future;
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

/// How often and how patiently to retry a fallible operation
///
/// The delay after the n-th failed attempt is
/// `min_delay * factor^(n-1)`, multiplied by a random factor in `[1, 2)`
/// when `randomize` is set, then clamped to `[min_delay, max_delay]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, first one included
    pub max_attempts: u32,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub factor: f64,
    pub randomize: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            min_delay_ms: 1000,
            max_delay_ms: 30_000,
            factor: 2.0,
            randomize: true,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after `failed_attempt` (1-based) before the next try
    pub fn delay_after(&self, failed_attempt: u32) -> Duration {
        let exponent = failed_attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let mut millis = self.min_delay_ms as f64 * self.factor.max(1.0).powi(exponent);
        if self.randomize {
            millis *= 1.0 + fastrand::f64();
        }
        let millis = millis
            .min(self.max_delay_ms as f64)
            .max(self.min_delay_ms as f64);
        Duration::from_millis(millis as u64)
    }
}

/// Run `operation` until it succeeds or `policy.max_attempts` is spent.
///
/// Every error is treated as transient. The operation receives the 1-based
/// attempt number; the last error is returned once attempts run out.
pub async fn retry_async<T, E, F, Fut>(policy: &RetryPolicy, what: &str, mut operation: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Error + 'static,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    info!("{what} succeeded on attempt {attempt}/{attempts}");
                }
                return Ok(value);
            }
            Err(e) if attempt >= attempts => {
                warn!("{what} failed on final attempt {attempt}/{attempts}: {}", describe(&e));
                return Err(e);
            }
            Err(e) => {
                let delay = policy.delay_after(attempt);
                warn!(
                    "{what} failed (attempt {attempt}/{attempts}): {}; retrying in {} ms",
                    describe(&e),
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// `outer: inner: root` rendering of an error and its sources
fn describe(err: &(dyn Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
