// Copyright (c) 2025 - Cowboy AI, Inc.
//! Timeout Policy
//!
//! Bounds a single asynchronous operation with `tokio::time::timeout`.
//! The wrapped future is dropped on expiry; there is no graceful
//! cancellation protocol with the collaborator.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

use super::ResilienceError;

/// Time budget for one collaborator call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutPolicy {
    pub limit: Duration,
}

impl TimeoutPolicy {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    /// Run the future, failing with [`ResilienceError::Timeout`] on expiry
    pub async fn run<F, T>(&self, operation: &str, fut: F) -> Result<T, ResilienceError>
    where
        F: Future<Output = T>,
    {
        match tokio::time::timeout(self.limit, fut).await {
            Ok(value) => Ok(value),
            Err(_) => {
                warn!(
                    operation = operation,
                    timeout_ms = self.limit.as_millis() as u64,
                    "Operation timed out"
                );
                Err(ResilienceError::Timeout {
                    operation: operation.to_string(),
                    timeout: self.limit,
                })
            }
        }
    }
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self {
            limit: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fast_operation_completes() {
        let policy = TimeoutPolicy::new(Duration::from_secs(1));
        let result = policy.run("quick", async { 7 }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_slow_operation_times_out() {
        let policy = TimeoutPolicy::new(Duration::from_millis(10));
        let result = policy
            .run("slow", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                7
            })
            .await;

        assert!(matches!(
            result,
            Err(ResilienceError::Timeout { ref operation, .. }) if operation == "slow"
        ));
    }
}
