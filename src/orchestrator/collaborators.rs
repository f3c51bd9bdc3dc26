// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resilient Collaborator Wrappers
//!
//! Wraps the raw collaborator traits in the resilience guard stack. One
//! circuit breaker per collaborator: the reference-data provider's three
//! fetches share a breaker (one remote system), the solver gets its own.

use std::sync::Arc;
use std::time::Duration;

use crate::resilience::{
    CircuitBreaker, CircuitBreakerConfig, ResilienceError, ResilientCall, RetryPolicy,
};

use super::contracts::{
    CourseRecord, EnrollmentRecord, PreferenceRecord, ReferenceData, ReferenceDataKey,
    ReferenceDataProvider, SolverClient, SolverRequest, SolverResponse,
};

/// Reference-data provider behind timeout, retry, and a shared breaker
pub struct ResilientDataProvider {
    inner: Arc<dyn ReferenceDataProvider>,
    breaker: Arc<CircuitBreaker>,
    retry: RetryPolicy,
    attempt_timeout: Duration,
}

impl ResilientDataProvider {
    pub fn new(inner: Arc<dyn ReferenceDataProvider>) -> Self {
        Self {
            inner,
            breaker: Arc::new(CircuitBreaker::new(CircuitBreakerConfig::default())),
            retry: RetryPolicy::default(),
            attempt_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    pub fn with_breaker(mut self, breaker: Arc<CircuitBreaker>) -> Self {
        self.breaker = breaker;
        self
    }

    fn call(&self, operation: &str) -> ResilientCall {
        ResilientCall::new(operation, self.breaker.clone())
            .retry(self.retry.clone())
            .attempt_timeout(self.attempt_timeout)
    }

    pub async fn fetch_enrollments(
        &self,
        key: &ReferenceDataKey,
    ) -> Result<ReferenceData<EnrollmentRecord>, ResilienceError> {
        self.call("fetch_enrollments")
            .run(|| self.inner.fetch_enrollments(key))
            .await
    }

    pub async fn fetch_courses(
        &self,
        key: &ReferenceDataKey,
    ) -> Result<ReferenceData<CourseRecord>, ResilienceError> {
        self.call("fetch_courses")
            .run(|| self.inner.fetch_courses(key))
            .await
    }

    pub async fn fetch_preferences(
        &self,
        key: &ReferenceDataKey,
    ) -> Result<ReferenceData<PreferenceRecord>, ResilienceError> {
        self.call("fetch_preferences")
            .run(|| self.inner.fetch_preferences(key))
            .await
    }
}

/// Solver client behind its own breaker and a generous time budget
///
/// The solver is expected to be slow; retry defaults to a single attempt
/// because re-running a minutes-long solve on a transient error is rarely
/// what the caller wants.
pub struct ResilientSolver {
    inner: Arc<dyn SolverClient>,
    breaker: Arc<CircuitBreaker>,
    retry: RetryPolicy,
    attempt_timeout: Duration,
}

impl ResilientSolver {
    pub fn new(inner: Arc<dyn SolverClient>) -> Self {
        Self {
            inner,
            breaker: Arc::new(CircuitBreaker::new(CircuitBreakerConfig::default())),
            retry: RetryPolicy {
                max_attempts: 1,
                ..RetryPolicy::default()
            },
            attempt_timeout: Duration::from_secs(300),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    pub fn with_breaker(mut self, breaker: Arc<CircuitBreaker>) -> Self {
        self.breaker = breaker;
        self
    }

    pub async fn solve(&self, request: SolverRequest) -> Result<SolverResponse, ResilienceError> {
        ResilientCall::new("solve", self.breaker.clone())
            .retry(self.retry.clone())
            .attempt_timeout(self.attempt_timeout)
            .run(|| self.inner.solve(request.clone()))
            .await
    }
}
