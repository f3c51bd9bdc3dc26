// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for scheduling infrastructure operations

use thiserror::Error;

/// Errors that can occur in scheduling infrastructure operations
///
/// The messaging layer produces these directly; the module-level error
/// enums convert into it so callers crossing layers (tests, binaries) can
/// work against a single error type.
#[derive(Debug, Error)]
pub enum SchedulingError {
    /// NATS connection error
    #[error("NATS connection error: {0}")]
    NatsConnection(String),

    /// NATS publish error
    #[error("NATS publish error: {0}")]
    NatsPublish(String),

    /// NATS subscribe error
    #[error("NATS subscribe error: {0}")]
    NatsSubscribe(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Event store failure
    #[error(transparent)]
    EventStore(#[from] crate::event_store::EventStoreError),

    /// Command service failure
    #[error(transparent)]
    Service(#[from] crate::service::ServiceError),

    /// Projection failure
    #[error(transparent)]
    Projection(#[from] crate::projection::ProjectionError),

    /// Generic scheduling infrastructure error
    #[error("Scheduling error: {0}")]
    Generic(String),
}

/// Result type for scheduling infrastructure operations
pub type SchedulingResult<T> = Result<T, SchedulingError>;

impl From<async_nats::Error> for SchedulingError {
    fn from(err: async_nats::Error) -> Self {
        SchedulingError::NatsConnection(err.to_string())
    }
}

impl From<serde_json::Error> for SchedulingError {
    fn from(err: serde_json::Error) -> Self {
        SchedulingError::Serialization(err.to_string())
    }
}
