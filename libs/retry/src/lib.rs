//! Bounded retry primitives.
//!
//! This library provides the retry driver used for polling
//! eventually-consistent external state. Key concepts:
//!
//! - **Policy**: How often and how long to keep trying.
//! - **Operation**: A fallible async closure, re-invoked per attempt.
//! - **Exhaustion**: The policy giving up, carrying the last error.
//!
//! # Invariants
//!
//! - The operation runs at least once regardless of policy
//! - Delays apply between attempts, never before the first
//! - The delay grows exponentially and is capped at `max_interval`

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tracing::trace;

/// Retry errors.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// The policy gave up. Carries the error from the final attempt.
    #[error("retries exhausted after {attempts} attempts: {source}")]
    Exhausted { attempts: u32, source: E },
}

impl<E> RetryError<E> {
    /// The error returned by the final attempt.
    pub fn into_source(self) -> E {
        match self {
            RetryError::Exhausted { source, .. } => source,
        }
    }
}

/// Retry policy: attempt count and backoff shape.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    pub retries: u32,

    /// Base delay between attempts.
    pub interval: Duration,

    /// Multiplier applied to the delay per attempt.
    pub backoff_factor: f64,

    /// Cap on the per-attempt delay.
    pub max_interval: Duration,

    /// Jitter fraction (0.0 to 1.0) applied to each delay.
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 24,
            interval: Duration::from_secs(2),
            backoff_factor: 1.5,
            max_interval: Duration::from_secs(30),
            jitter: 0.25,
        }
    }
}

impl RetryPolicy {
    /// A policy with fixed spacing and no jitter.
    pub fn fixed(retries: u32, interval: Duration) -> Self {
        Self {
            retries,
            interval,
            backoff_factor: 1.0,
            max_interval: interval,
            jitter: 0.0,
        }
    }

    /// Calculate the delay preceding the given retry attempt (0-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let delay = self.interval.as_millis() as f64 * self.backoff_factor.powi(attempt as i32);
        let delay = delay.min(self.max_interval.as_millis() as f64);

        let jitter_range = delay * self.jitter;
        let jitter = if jitter_range > 0.0 {
            rand::rng().random_range(-jitter_range..=jitter_range)
        } else {
            0.0
        };

        Duration::from_millis((delay + jitter).max(0.0) as u64)
    }
}

/// Run `op` until it succeeds or the policy is exhausted.
///
/// Exhaustion returns [`RetryError::Exhausted`] wrapping the error from the
/// final attempt.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt: u32 = 0;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(source) => {
                attempt += 1;
                if attempt > policy.retries {
                    return Err(RetryError::Exhausted {
                        attempts: attempt,
                        source,
                    });
                }

                let delay = policy.delay(attempt - 1);
                let delay_ms = delay.as_millis() as u64;
                trace!(attempt, delay_ms, "Attempt failed, backing off");
                tokio::time::sleep(delay).await;
            }
        }
    }
}
