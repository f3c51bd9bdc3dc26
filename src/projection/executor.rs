// Copyright (c) 2025 - Cowboy AI, Inc.
//! Side Effect Executors
//!
//! Executors interpret the [`SideEffect`] values returned by pure
//! projection steps and perform the actual I/O: publishing integration
//! events to NATS and emitting log lines. Keeping execution behind a trait
//! lets the projection logic run in tests without a broker.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::pure::{LogLevel, SideEffect};
use crate::nats::NatsClient;

/// Errors from side effect execution
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// Publishing an integration event failed
    #[error("Publish failed: {0}")]
    PublishFailed(String),
}

/// Trait for executing side effects
///
/// Effects are executed in order. A failing effect aborts the batch.
#[async_trait]
pub trait SideEffectExecutor: Send + Sync {
    async fn execute(&self, effects: Vec<SideEffect>) -> Result<(), ExecutorError>;
}

fn emit_log(level: LogLevel, message: &str) {
    match level {
        LogLevel::Debug => debug!("{message}"),
        LogLevel::Info => info!("{message}"),
        LogLevel::Warn => warn!("{message}"),
        LogLevel::Error => error!("{message}"),
    }
}

/// NATS-backed executor used in production
///
/// Publishes integration events on their canonical
/// `examsched.integration.<notification>` subjects and forwards log
/// effects to `tracing`.
pub struct NatsSideEffectExecutor {
    client: NatsClient,
}

impl NatsSideEffectExecutor {
    pub fn new(client: NatsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SideEffectExecutor for NatsSideEffectExecutor {
    async fn execute(&self, effects: Vec<SideEffect>) -> Result<(), ExecutorError> {
        for effect in effects {
            match effect {
                SideEffect::Publish(event) => {
                    self.client
                        .publish_integration(&event)
                        .await
                        .map_err(|e| ExecutorError::PublishFailed(e.to_string()))?;
                }
                SideEffect::Log { level, message } => emit_log(level, &message),
            }
        }
        Ok(())
    }
}

/// Executor that forwards log effects to `tracing` and drops publishes
///
/// The default when no NATS client is attached, and during rebuilds where
/// re-notifying downstream consumers would duplicate history.
#[derive(Debug, Default)]
pub struct LoggingExecutor;

impl LoggingExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SideEffectExecutor for LoggingExecutor {
    async fn execute(&self, effects: Vec<SideEffect>) -> Result<(), ExecutorError> {
        for effect in effects {
            match effect {
                SideEffect::Publish(event) => debug!(
                    notification = event.notification_type(),
                    schedule_id = %event.schedule_id(),
                    "Dropping integration publish (no NATS client attached)"
                ),
                SideEffect::Log { level, message } => emit_log(level, &message),
            }
        }
        Ok(())
    }
}

/// Executor that records effects for assertions in tests
#[derive(Debug, Default)]
pub struct CollectingExecutor {
    effects: Mutex<Vec<SideEffect>>,
}

impl CollectingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Effects executed so far, in order
    pub async fn effects(&self) -> Vec<SideEffect> {
        self.effects.lock().await.clone()
    }
}

#[async_trait]
impl SideEffectExecutor for CollectingExecutor {
    async fn execute(&self, effects: Vec<SideEffect>) -> Result<(), ExecutorError> {
        self.effects.lock().await.extend(effects);
        Ok(())
    }
}
