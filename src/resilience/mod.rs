// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resilience Primitives for Collaborator Calls
//!
//! Outbound calls to reference-data providers and the solver go through
//! three composable guards:
//!
//! ```text
//! caller ──> circuit breaker ──> retry ──> timeout ──> collaborator
//! ```
//!
//! - [`timeout`] - bounds one attempt with `tokio::time::timeout`
//! - [`retry`] - bounded retries with fixed, linear, or exponential backoff
//! - [`circuit_breaker`] - Closed/Open/HalfOpen breaker per collaborator
//!
//! An open circuit fails fast with a typed error; no fallback data is ever
//! substituted for a failed call.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

pub mod circuit_breaker;
pub mod retry;
pub mod timeout;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use retry::{BackoffStrategy, RetryPolicy};
pub use timeout::TimeoutPolicy;

/// Errors from the resilience layer
///
/// The underlying collaborator error is carried as text; callers translate
/// these into domain failures (the orchestrator maps them all to a
/// generation failure reason).
#[derive(Debug, thiserror::Error)]
pub enum ResilienceError {
    /// A single attempt exceeded its time budget
    #[error("Operation '{operation}' timed out after {timeout:?}")]
    Timeout { operation: String, timeout: Duration },

    /// All retry attempts failed
    #[error("Operation '{operation}' failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        operation: String,
        attempts: u32,
        last_error: String,
    },

    /// The circuit is open and the call was not attempted
    #[error("Circuit for '{operation}' is open")]
    CircuitOpen { operation: String },
}

/// One collaborator call wrapped in timeout, retry, and circuit breaking
///
/// The per-attempt timeout runs innermost, the retry loop around it, and
/// the breaker outermost: an open circuit skips the call entirely, and the
/// overall outcome feeds the breaker's failure accounting.
pub struct ResilientCall {
    operation: String,
    breaker: Arc<CircuitBreaker>,
    retry: RetryPolicy,
    attempt_timeout: Duration,
}

impl ResilientCall {
    pub fn new(operation: impl Into<String>, breaker: Arc<CircuitBreaker>) -> Self {
        Self {
            operation: operation.into(),
            breaker,
            retry: RetryPolicy::default(),
            attempt_timeout: Duration::from_secs(30),
        }
    }

    /// Replace the retry policy
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the per-attempt time budget
    pub fn attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    /// Run the operation through the full guard stack
    pub async fn run<F, Fut, T, E>(&self, f: F) -> Result<T, ResilienceError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: Display,
    {
        self.breaker.try_acquire(&self.operation).await?;

        let timeout = TimeoutPolicy::new(self.attempt_timeout);
        let result = self
            .retry
            .execute(&self.operation, || async {
                match timeout.run(&self.operation, f()).await {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(e)) => Err(e.to_string()),
                    Err(e) => Err(e.to_string()),
                }
            })
            .await;

        match result {
            Ok(value) => {
                self.breaker.record_success().await;
                Ok(value)
            }
            Err(e) => {
                self.breaker.record_failure().await;
                Err(e)
            }
        }
    }
}
