// Copyright (c) 2025 - Cowboy AI, Inc.

//! JetStream configuration and setup for schedule event streams
//!
//! This module provides configuration and initialization for NATS JetStream,
//! following event sourcing patterns with persistent streams.
//!
//! # Architecture
//!
//! JetStream provides:
//! - **Persistent Event Streams**: Durable event storage with replay capability
//! - **Consumer Management**: Pull and push consumers for event processing
//! - **Stream Configuration**: Subject-based stream organization
//! - **Ordering Guarantees**: Sequence numbers and timestamps
//!
//! Domain events travel inside a [`StoredEvent`] envelope. On the write path
//! the envelope is built from the event itself (the event's own timestamp is
//! preserved, never re-stamped); on the read path the raw JSON payload is
//! upcast to the latest schema before typed deserialization.
//!
//! # Example
//!
//! ```rust,no_run
//! use examsched_core::jetstream::{JetStreamConfig, create_schedule_stream};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = async_nats::connect("nats://localhost:4222").await?;
//!     let jetstream = async_nats::jetstream::new(client);
//!
//!     let config = JetStreamConfig::default();
//!     let stream = create_schedule_stream(jetstream, config).await?;
//!
//!     Ok(())
//! }
//! ```

use async_nats::jetstream::{self, stream::Stream};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::domain::ScheduleId;
use crate::errors::{SchedulingError, SchedulingResult};
use crate::events::{ScheduleEvent, UpcastError, UpcasterRegistry};

/// Configuration for JetStream schedule event streams
#[derive(Debug, Clone)]
pub struct JetStreamConfig {
    /// Stream name for schedule events
    pub stream_name: String,

    /// Subjects this stream will capture (defaults to "examsched.>")
    pub subjects: Vec<String>,

    /// Maximum age of messages (default: 365 days, a full academic year)
    pub max_age: Duration,

    /// Maximum bytes stored in stream (default: 10GB)
    pub max_bytes: i64,

    /// Storage type (File or Memory)
    pub storage: StorageType,

    /// Number of replicas (for clustered NATS)
    pub replicas: usize,

    /// Retention policy
    pub retention: RetentionPolicy,
}

impl Default for JetStreamConfig {
    fn default() -> Self {
        Self {
            stream_name: "EXAMSCHED_EVENTS".to_string(),
            subjects: vec!["examsched.>".to_string()],
            max_age: Duration::from_secs(365 * 24 * 60 * 60), // 365 days
            max_bytes: 10 * 1024 * 1024 * 1024, // 10 GB
            storage: StorageType::File,
            replicas: 1,
            retention: RetentionPolicy::Limits,
        }
    }
}

/// Storage type for JetStream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// File-based storage (persistent across restarts)
    File,
    /// Memory-based storage (faster, but lost on restart)
    Memory,
}

/// Retention policy for stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Limits-based retention (based on max_age and max_bytes)
    Limits,
    /// Interest-based retention (messages kept while there are consumers)
    Interest,
    /// Work queue retention (messages deleted after acknowledgment)
    WorkQueue,
}

/// Stored event envelope with metadata
///
/// This wraps domain events with correlation tracking and sequencing. The
/// generic parameter is the payload representation: [`RawStoredEvent`] on the
/// wire (JSON value, upcastable), `StoredEvent<ScheduleEvent>` after decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEvent<E> {
    /// Unique event ID (UUID v7 for time-ordering)
    pub event_id: Uuid,

    /// Schedule aggregate this event belongs to
    pub schedule_id: ScheduleId,

    /// Sequence number within the schedule's stream, starting at 1
    pub sequence: u64,

    /// Event timestamp (when it occurred, not when it was stored)
    pub timestamp: DateTime<Utc>,

    /// Correlation ID (tracks related events across a request flow)
    pub correlation_id: Uuid,

    /// Causation ID (immediate cause of this event, None for root events)
    pub causation_id: Option<Uuid>,

    /// Event type name (for subject routing and upcaster lookup)
    pub event_type: String,

    /// Schema version of the payload
    pub event_version: u32,

    /// The actual domain event data
    pub data: E,

    /// Optional metadata (e.g., user context, source system)
    pub metadata: Option<serde_json::Value>,
}

/// Wire form of a stored event: payload kept as raw JSON so old schema
/// versions survive deserialization until the upcasters have run
pub type RawStoredEvent = StoredEvent<serde_json::Value>;

impl<E> StoredEvent<E> {
    /// Add metadata to the event
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

impl RawStoredEvent {
    /// Wrap a domain event for storage at the given stream sequence
    ///
    /// All envelope metadata is copied from the event itself so that
    /// replaying a stream reproduces the original timeline exactly.
    pub fn from_domain(event: &ScheduleEvent, sequence: u64) -> Result<Self, serde_json::Error> {
        Ok(Self {
            event_id: event.event_id(),
            schedule_id: event.schedule_id(),
            sequence,
            timestamp: event.timestamp(),
            correlation_id: event.correlation_id(),
            causation_id: event.causation_id(),
            event_type: event.event_type().to_string(),
            event_version: event.event_version(),
            data: serde_json::to_value(event)?,
            metadata: None,
        })
    }

    /// Upcast the raw payload to the latest schema and deserialize it
    ///
    /// Events without a registered upcaster chain pass through unchanged.
    /// The envelope's `event_version` is refreshed to the decoded event's
    /// version so callers always observe the post-migration schema.
    pub fn decode(
        self,
        upcasters: &UpcasterRegistry,
    ) -> Result<StoredEvent<ScheduleEvent>, UpcastError> {
        let migrated = upcasters.upcast(&self.event_type, self.data)?;
        let event: ScheduleEvent = serde_json::from_value(migrated)
            .map_err(|e| UpcastError::TransformationFailed(e.to_string()))?;

        Ok(StoredEvent {
            event_id: self.event_id,
            schedule_id: self.schedule_id,
            sequence: self.sequence,
            timestamp: self.timestamp,
            correlation_id: self.correlation_id,
            causation_id: self.causation_id,
            event_type: self.event_type,
            event_version: event.event_version(),
            data: event,
            metadata: self.metadata,
        })
    }
}

/// Create or update the schedule events stream
///
/// This function is idempotent - it will create the stream if it doesn't exist,
/// or update it if the configuration has changed.
pub async fn create_schedule_stream(
    jetstream: jetstream::Context,
    config: JetStreamConfig,
) -> SchedulingResult<Stream> {
    let storage = match config.storage {
        StorageType::File => jetstream::stream::StorageType::File,
        StorageType::Memory => jetstream::stream::StorageType::Memory,
    };

    let retention = match config.retention {
        RetentionPolicy::Limits => jetstream::stream::RetentionPolicy::Limits,
        RetentionPolicy::Interest => jetstream::stream::RetentionPolicy::Interest,
        RetentionPolicy::WorkQueue => jetstream::stream::RetentionPolicy::WorkQueue,
    };

    let stream_config = jetstream::stream::Config {
        name: config.stream_name.clone(),
        subjects: config.subjects,
        max_age: config.max_age,
        max_bytes: config.max_bytes,
        storage,
        num_replicas: config.replicas,
        retention,
        ..Default::default()
    };

    let stream = jetstream
        .get_or_create_stream(stream_config)
        .await
        .map_err(|e| SchedulingError::NatsConnection(e.to_string()))?;

    Ok(stream)
}

/// Consumer configuration for event processing
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Consumer name (durable consumers survive restarts)
    pub name: String,

    /// Filter subject (e.g., "examsched.schedule.>")
    pub filter_subject: Option<String>,

    /// Deliver policy (from beginning, from end, etc.)
    pub deliver_policy: DeliverPolicy,

    /// Acknowledgment policy
    pub ack_policy: AckPolicy,

    /// Maximum number of pending acks
    pub max_ack_pending: i64,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            name: "examsched-consumer".to_string(),
            filter_subject: None,
            deliver_policy: DeliverPolicy::All,
            ack_policy: AckPolicy::Explicit,
            max_ack_pending: 1000,
        }
    }
}

/// Deliver policy for consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliverPolicy {
    /// Deliver all messages from the stream start
    All,
    /// Deliver only new messages
    New,
    /// Deliver from a specific sequence
    ByStartSequence(u64),
    /// Deliver from a specific time
    ByStartTime(DateTime<Utc>),
}

/// Acknowledgment policy for consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckPolicy {
    /// Messages must be explicitly acknowledged
    Explicit,
    /// Messages are automatically acknowledged
    None,
    /// Entire batch must be acknowledged
    All,
}
