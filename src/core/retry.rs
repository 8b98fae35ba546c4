//! Bounded retry with backoff for remote calls.
//!
//! The policy knows nothing about what it wraps: it takes an async
//! operation factory, calls it until it succeeds or the attempt
//! budget runs out, and sleeps between failed attempts.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

/// Delay schedule between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// `attempt × base` after the n-th failed attempt (1-based)
    Linear { base: Duration },
    /// Same delay every time
    Fixed(Duration),
}

impl Backoff {
    /// Delay after the given failed attempt (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match *self {
            Backoff::Linear { base } => base.saturating_mul(attempt),
            Backoff::Fixed(delay) => delay,
        }
    }
}

/// Every attempt failed; carries the last error seen
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

impl<E: fmt::Display> fmt::Display for RetryExhausted<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gave up after {} attempts: {}",
            self.attempts, self.last_error
        )
    }
}

/// Retry policy configuration for transient failures
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, the first call included
    max_attempts: u32,
    backoff: Backoff,
}

impl RetryPolicy {
    /// Create a new retry policy
    ///
    /// # Panics
    ///
    /// Panics if `max_attempts` is 0.
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        assert!(max_attempts > 0, "max_attempts must be greater than 0");
        Self {
            max_attempts,
            backoff,
        }
    }

    /// Linear backoff: wait `n × base_delay` after the n-th failure
    pub fn linear(max_attempts: u32, base_delay: Duration) -> Self {
        Self::new(max_attempts, Backoff::Linear { base: base_delay })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> Backoff {
        self.backoff
    }

    /// Run `operation` until it succeeds or attempts run out.
    ///
    /// No delay follows the final failed attempt.
    pub async fn execute<F, Fut, T, E>(&self, mut operation: F) -> Result<T, RetryExhausted<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;
            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("Operation succeeded on attempt {}", attempt);
                    }
                    return Ok(value);
                }
                Err(err) if attempt >= self.max_attempts => {
                    warn!("Operation failed after {} attempts: {}", attempt, err);
                    return Err(RetryExhausted {
                        attempts: attempt,
                        last_error: err,
                    });
                }
                Err(err) => {
                    let delay = self.backoff.delay_after(attempt);
                    warn!(
                        "Attempt {}/{} failed: {}. Retrying in {:?}",
                        attempt, self.max_attempts, err, delay
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    /// Three attempts, 10s then 20s between them
    fn default() -> Self {
        Self::linear(3, Duration::from_secs(10))
    }
}
