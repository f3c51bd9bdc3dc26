// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event Store Abstraction
//!
//! This module defines the event storage interface and implementations for
//! persisting and retrieving schedule events in the event-sourced core.
//!
//! # Architecture
//!
//! ```text
//! Command → Aggregate → Events → EventStore → Persistent Storage
//!                                    ↓
//!                              Projections
//! ```
//!
//! # Event Store Requirements
//!
//! 1. **Append-Only**: Events are never updated or deleted
//! 2. **Ordered**: Events maintain sequence within a schedule, starting at 1
//! 3. **Correlation**: Events track causation chains
//! 4. **Versioning**: Payloads are upcast to the latest schema on read
//! 5. **Replay**: State is reconstructed by folding events in order
//!
//! # Implementations
//!
//! - [`NatsEventStore`] - JetStream-backed store for production use
//! - [`InMemoryEventStore`] - process-local store for tests and tooling
//!
//! Both enforce identical optimistic concurrency semantics, so aggregate
//! tests written against the in-memory store hold for the NATS store.
//!
//! # Example
//!
//! ```rust,no_run
//! use examsched_core::event_store::{EventStore, NatsEventStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = NatsEventStore::connect("nats://localhost:4222").await?;
//!
//!     let schedule_id = examsched_core::domain::ScheduleId::new();
//!
//!     // Append expects the stream to be empty (version 0)
//!     let events = vec![/* ... events from a command handler ... */];
//!     let version = store.append(schedule_id, events, Some(0)).await?;
//!
//!     // Read events back in order
//!     let stored = store.read_events(schedule_id).await?;
//!     assert_eq!(stored.len() as u64, version);
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::ScheduleId;
use crate::events::{ScheduleEvent, UpcastError};
use crate::jetstream::StoredEvent;

pub mod memory;
pub mod nats;
pub mod snapshot;

pub use memory::InMemoryEventStore;
pub use nats::NatsEventStore;
pub use snapshot::{
    InMemorySnapshotStore, NatsSnapshotStore, ScheduleSnapshot, SnapshotStore,
    DEFAULT_SNAPSHOT_THRESHOLD,
};

/// Errors from event store operations
#[derive(Debug, Error)]
pub enum EventStoreError {
    /// Optimistic concurrency check failed on append
    #[error("Concurrency conflict: expected version {expected}, stream is at {actual}")]
    ConcurrencyConflict { expected: u64, actual: u64 },

    /// NATS transport or JetStream failure
    #[error("NATS error: {0}")]
    Nats(String),

    /// Envelope encoding or decoding failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored payload could not be migrated to the latest schema
    #[error("Upcast error: {0}")]
    Upcast(#[from] UpcastError),
}

/// Result type for event store operations
pub type EventStoreResult<T> = Result<T, EventStoreError>;

/// Event Store trait for persisting and retrieving schedule events
///
/// This trait provides the core interface for the event-sourced schedule
/// aggregate to interact with persistent event storage. Implementations
/// must ensure:
///
/// - **Atomicity**: Appending a batch succeeds or fails as a unit
/// - **Consistency**: Event ordering is maintained per schedule
/// - **Durability**: Events survive system failures (NATS implementation)
/// - **Replay**: Events can be read back in write order
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Append events to a schedule's event stream
    ///
    /// Events are written in order with consecutive sequence numbers
    /// continuing from the current stream version. The expected_version
    /// provides optimistic concurrency control: `Some(n)` requires the
    /// stream to currently be at version n (use `Some(0)` for a stream
    /// that must not exist yet), `None` skips the check entirely.
    ///
    /// # Arguments
    ///
    /// * `schedule_id` - The schedule these events belong to
    /// * `events` - Events to append, in occurrence order
    /// * `expected_version` - Expected current version (for concurrency control)
    ///
    /// # Returns
    ///
    /// The new stream version after appending (sequence of the last event)
    ///
    /// # Errors
    ///
    /// - [`EventStoreError::ConcurrencyConflict`] if expected_version doesn't
    ///   match the actual version
    /// - [`EventStoreError::Nats`] if writing to storage fails
    async fn append(
        &self,
        schedule_id: ScheduleId,
        events: Vec<ScheduleEvent>,
        expected_version: Option<u64>,
    ) -> EventStoreResult<u64>;

    /// Read all events for a schedule
    ///
    /// Returns decoded events in the order they were written. Payloads
    /// stored under older schema versions are upcast before they are
    /// returned, so callers only ever see the latest event shapes.
    ///
    /// # Arguments
    ///
    /// * `schedule_id` - The schedule to read events for
    ///
    /// # Returns
    ///
    /// Vector of stored events in sequence order
    async fn read_events(
        &self,
        schedule_id: ScheduleId,
    ) -> EventStoreResult<Vec<StoredEvent<ScheduleEvent>>>;

    /// Read events for a schedule from a specific sequence
    ///
    /// Useful for loading the tail after a snapshot, or for incremental
    /// projection updates.
    ///
    /// # Arguments
    ///
    /// * `schedule_id` - The schedule to read events for
    /// * `from_sequence` - Start reading from this sequence (inclusive)
    ///
    /// # Returns
    ///
    /// Vector of stored events starting at from_sequence
    async fn read_events_from(
        &self,
        schedule_id: ScheduleId,
        from_sequence: u64,
    ) -> EventStoreResult<Vec<StoredEvent<ScheduleEvent>>>;

    /// Read all events in a correlation chain
    ///
    /// Retrieves all events that share the same correlation_id across
    /// every schedule, useful for tracing an entire request flow such as
    /// one generation run.
    ///
    /// # Arguments
    ///
    /// * `correlation_id` - The correlation ID to trace
    ///
    /// # Returns
    ///
    /// Vector of stored events with matching correlation_id, ordered by
    /// event timestamp
    async fn read_by_correlation(
        &self,
        correlation_id: Uuid,
    ) -> EventStoreResult<Vec<StoredEvent<ScheduleEvent>>>;

    /// Get the current version of a schedule's stream
    ///
    /// Returns the highest sequence number for the schedule, or None if
    /// no events exist.
    ///
    /// # Arguments
    ///
    /// * `schedule_id` - The schedule to check
    ///
    /// # Returns
    ///
    /// Current version, or None if the schedule has no events
    async fn get_version(&self, schedule_id: ScheduleId) -> EventStoreResult<Option<u64>>;
}
