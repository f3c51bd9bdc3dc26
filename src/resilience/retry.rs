// Copyright (c) 2025 - Cowboy AI, Inc.
//! Bounded Retry with Backoff
//!
//! Retries a fallible asynchronous operation up to a fixed number of
//! attempts, sleeping between attempts according to a backoff strategy.
//! There is no error classification here: every failure is retried until
//! the attempt budget runs out, and the final error names the last failure.

use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use super::ResilienceError;

/// Delay progression between retry attempts
#[derive(Debug, Clone, PartialEq)]
pub enum BackoffStrategy {
    /// Same delay before every retry
    Fixed { delay: Duration },

    /// `initial_delay + increment * attempt`
    Linear {
        initial_delay: Duration,
        increment: Duration,
    },

    /// `initial_delay * base^attempt`, capped at `max_delay`, with optional
    /// ±25% jitter to spread synchronized retries
    Exponential {
        initial_delay: Duration,
        base: f64,
        max_delay: Duration,
        jitter: bool,
    },
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self::Exponential {
            initial_delay: Duration::from_millis(100),
            base: 2.0,
            max_delay: Duration::from_secs(30),
            jitter: true,
        }
    }
}

impl BackoffStrategy {
    /// Delay before retrying after the given failed attempt (0-based)
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay } => *delay,

            Self::Linear {
                initial_delay,
                increment,
            } => *initial_delay + *increment * attempt,

            Self::Exponential {
                initial_delay,
                base,
                max_delay,
                jitter,
            } => {
                let millis = initial_delay.as_millis() as f64 * base.powf(f64::from(attempt));
                let delay = Duration::from_millis(millis as u64).min(*max_delay);

                if *jitter {
                    add_jitter(delay)
                } else {
                    delay
                }
            }
        }
    }
}

fn add_jitter(delay: Duration) -> Duration {
    let mut rng = rand::thread_rng();
    let factor = rng.gen_range(0.75..=1.25);
    Duration::from_millis((delay.as_millis() as f64 * factor) as u64)
}

/// Bounded retry policy
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one; at least 1
    pub max_attempts: u32,

    /// Delay progression between attempts
    pub backoff: BackoffStrategy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: BackoffStrategy::default(),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: BackoffStrategy) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Run the operation, retrying failures until the attempt budget ends
    pub async fn execute<F, Fut, T, E>(&self, operation: &str, f: F) -> Result<T, ResilienceError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let attempts = self.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 0..attempts {
            match f().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    last_error = e.to_string();

                    if attempt + 1 < attempts {
                        let delay = self.backoff.calculate_delay(attempt);
                        debug!(
                            operation = operation,
                            attempt = attempt + 1,
                            delay_ms = delay.as_millis() as u64,
                            error = %last_error,
                            "Attempt failed, retrying after delay"
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(ResilienceError::RetriesExhausted {
            operation: operation.to_string(),
            attempts,
            last_error,
        })
    }
}
