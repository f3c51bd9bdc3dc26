// Copyright (c) 2025 - Cowboy AI, Inc.
//! NATS JetStream Event Store Implementation
//!
//! This module implements the EventStore trait using NATS JetStream as the
//! persistent storage backend, providing durable event streaming with replay.

use async_nats::jetstream::{self, stream::Stream};
use async_trait::async_trait;
use futures::StreamExt;
use uuid::Uuid;

use crate::domain::ScheduleId;
use crate::event_store::{EventStore, EventStoreError, EventStoreResult};
use crate::events::{ScheduleEvent, UpcasterRegistry};
use crate::jetstream::{create_schedule_stream, JetStreamConfig, RawStoredEvent, StoredEvent};
use crate::subjects;

/// Most schedules stay well below this; the loop exists for the rare
/// streams that do not
const BATCH_SIZE: usize = 10000;

/// NATS JetStream-backed event store
///
/// This implementation uses NATS JetStream for durable event storage with:
/// - Subject-based stream organization (one subject per schedule and event type)
/// - Sequence-based ordering guarantees
/// - Consumer groups for projections
/// - Persistent storage across restarts
///
/// # Example
///
/// ```rust,no_run
/// use examsched_core::event_store::NatsEventStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = NatsEventStore::connect("nats://localhost:4222").await?;
///     // Use store...
///     Ok(())
/// }
/// ```
pub struct NatsEventStore {
    /// NATS JetStream context
    jetstream: jetstream::Context,

    /// JetStream stream for schedule events
    stream: Stream,

    /// Schema migrations applied to payloads on read
    upcasters: UpcasterRegistry,
}

impl NatsEventStore {
    /// Connect to NATS and create event store
    ///
    /// This will connect to the NATS server and create or get the
    /// schedule events stream.
    ///
    /// # Arguments
    ///
    /// * `nats_url` - NATS server URL (e.g., "nats://localhost:4222")
    ///
    /// # Returns
    ///
    /// Connected NatsEventStore instance
    pub async fn connect(nats_url: &str) -> EventStoreResult<Self> {
        Self::connect_with_config(nats_url, JetStreamConfig::default()).await
    }

    /// Connect with custom stream configuration
    pub async fn connect_with_config(
        nats_url: &str,
        config: JetStreamConfig,
    ) -> EventStoreResult<Self> {
        let client = async_nats::connect(nats_url)
            .await
            .map_err(|e| EventStoreError::Nats(e.to_string()))?;

        let jetstream = jetstream::new(client);
        let stream = create_schedule_stream(jetstream.clone(), config)
            .await
            .map_err(|e| EventStoreError::Nats(e.to_string()))?;

        Ok(Self {
            jetstream,
            stream,
            upcasters: UpcasterRegistry::new(),
        })
    }

    /// Register schema migrations applied to payloads on read
    pub fn with_upcasters(mut self, upcasters: UpcasterRegistry) -> Self {
        self.upcasters = upcasters;
        self
    }

    /// Fetch every stored envelope matching a subject filter
    ///
    /// Reads in bounded batches through an ephemeral pull consumer. A fetch
    /// timeout means the stream has no more messages for this filter, not
    /// a failure.
    async fn fetch_all(&self, filter_subject: String) -> EventStoreResult<Vec<RawStoredEvent>> {
        let consumer = self
            .stream
            .create_consumer(jetstream::consumer::pull::Config {
                filter_subject,
                ..Default::default()
            })
            .await
            .map_err(|e| EventStoreError::Nats(e.to_string()))?;

        let mut envelopes = Vec::new();

        loop {
            let messages_result = consumer
                .fetch()
                .max_messages(BATCH_SIZE)
                .expires(std::time::Duration::from_secs(2))
                .messages()
                .await;

            let mut messages = match messages_result {
                Ok(msgs) => msgs,
                Err(e) => {
                    let err_msg = e.to_string().to_lowercase();
                    if err_msg.contains("timeout")
                        || err_msg.contains("timed out")
                        || err_msg.contains("no messages")
                    {
                        break;
                    }
                    return Err(EventStoreError::Nats(e.to_string()));
                }
            };

            let mut batch_count = 0;

            while let Some(message) = messages.next().await {
                let msg = message.map_err(|e| EventStoreError::Nats(e.to_string()))?;

                let envelope: RawStoredEvent = serde_json::from_slice(&msg.payload)?;
                envelopes.push(envelope);

                msg.ack()
                    .await
                    .map_err(|e| EventStoreError::Nats(e.to_string()))?;

                batch_count += 1;
            }

            // Fewer messages than the batch size means the stream is drained
            if batch_count < BATCH_SIZE {
                break;
            }
        }

        Ok(envelopes)
    }
}

#[async_trait]
impl EventStore for NatsEventStore {
    async fn append(
        &self,
        schedule_id: ScheduleId,
        events: Vec<ScheduleEvent>,
        expected_version: Option<u64>,
    ) -> EventStoreResult<u64> {
        let current_version = self.get_version(schedule_id).await?;

        if let Some(expected) = expected_version {
            let actual = current_version.unwrap_or(0);
            if actual != expected {
                return Err(EventStoreError::ConcurrencyConflict { expected, actual });
            }
        }

        let mut next_sequence = current_version.map(|v| v + 1).unwrap_or(1);

        for event in events {
            let subject = subjects::schedule_event(&schedule_id, event.event_type());

            let envelope = RawStoredEvent::from_domain(&event, next_sequence)?;
            let payload = serde_json::to_vec(&envelope)?;

            self.jetstream
                .publish(subject, payload.into())
                .await
                .map_err(|e| EventStoreError::Nats(e.to_string()))?
                .await
                .map_err(|e| EventStoreError::Nats(e.to_string()))?;

            next_sequence += 1;
        }

        Ok(next_sequence - 1)
    }

    async fn read_events(
        &self,
        schedule_id: ScheduleId,
    ) -> EventStoreResult<Vec<StoredEvent<ScheduleEvent>>> {
        self.read_events_from(schedule_id, 1).await
    }

    async fn read_events_from(
        &self,
        schedule_id: ScheduleId,
        from_sequence: u64,
    ) -> EventStoreResult<Vec<StoredEvent<ScheduleEvent>>> {
        let raw = self
            .fetch_all(subjects::schedule_wildcard(&schedule_id))
            .await?;

        let mut events = raw
            .into_iter()
            .filter(|e| e.sequence >= from_sequence)
            .map(|e| e.decode(&self.upcasters).map_err(EventStoreError::from))
            .collect::<EventStoreResult<Vec<_>>>()?;

        events.sort_by_key(|e| e.sequence);

        Ok(events)
    }

    async fn read_by_correlation(
        &self,
        correlation_id: Uuid,
    ) -> EventStoreResult<Vec<StoredEvent<ScheduleEvent>>> {
        // Schedule subjects only; integration subjects carry a different
        // payload shape
        let raw = self.fetch_all(subjects::all_schedule_events()).await?;

        let mut events = raw
            .into_iter()
            .filter(|e| e.correlation_id == correlation_id)
            .map(|e| e.decode(&self.upcasters).map_err(EventStoreError::from))
            .collect::<EventStoreResult<Vec<_>>>()?;

        events.sort_by_key(|e| e.timestamp);

        Ok(events)
    }

    async fn get_version(&self, schedule_id: ScheduleId) -> EventStoreResult<Option<u64>> {
        let raw = self
            .fetch_all(subjects::schedule_wildcard(&schedule_id))
            .await?;

        Ok(raw.iter().map(|e| e.sequence).max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AcademicYear, ExamPeriod, ExamSession, ExamSessionPeriodId};
    use crate::events::{PreferencesCollected, ScheduleCreated};
    use chrono::NaiveDate;

    // Integration tests with real NATS
    // These require a running NATS server and are marked with #[ignore]

    fn created(schedule_id: ScheduleId, correlation_id: Uuid) -> ScheduleEvent {
        ScheduleEvent::ScheduleCreated(ScheduleCreated {
            event_version: ScheduleCreated::CURRENT_VERSION,
            event_id: Uuid::now_v7(),
            schedule_id,
            timestamp: "2025-01-10T12:00:00Z".parse().unwrap(),
            correlation_id,
            causation_id: None,
            exam_session_period_id: ExamSessionPeriodId::new("2025-winter").unwrap(),
            academic_year: AcademicYear::new("2024-2025").unwrap(),
            exam_session: ExamSession::Winter,
            period: ExamPeriod::new(
                NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            )
            .unwrap(),
        })
    }

    fn prefs(schedule_id: ScheduleId, correlation_id: Uuid) -> ScheduleEvent {
        ScheduleEvent::PreferencesCollected(PreferencesCollected {
            event_version: PreferencesCollected::CURRENT_VERSION,
            event_id: Uuid::now_v7(),
            schedule_id,
            timestamp: "2025-01-10T12:05:00Z".parse().unwrap(),
            correlation_id,
            causation_id: None,
            preference_count: 42,
        })
    }

    #[tokio::test]
    #[ignore] // Requires NATS server
    async fn test_nats_event_store_integration() -> EventStoreResult<()> {
        let store = NatsEventStore::connect("nats://localhost:4222").await?;

        let schedule_id = ScheduleId::new();
        let correlation_id = Uuid::now_v7();

        let version = store
            .append(
                schedule_id,
                vec![
                    created(schedule_id, correlation_id),
                    prefs(schedule_id, correlation_id),
                ],
                Some(0),
            )
            .await?;
        assert_eq!(version, 2);

        let events = store.read_events(schedule_id).await?;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].sequence, 1);
        assert_eq!(events[0].event_type, "schedule_created");
        assert_eq!(events[1].sequence, 2);

        // Verify correlation tracking
        let correlated = store.read_by_correlation(correlation_id).await?;
        assert_eq!(correlated.len(), 2);

        Ok(())
    }

    #[tokio::test]
    #[ignore] // Requires NATS server
    async fn test_concurrency_control() -> EventStoreResult<()> {
        let store = NatsEventStore::connect("nats://localhost:4222").await?;

        let schedule_id = ScheduleId::new();

        store
            .append(schedule_id, vec![created(schedule_id, Uuid::now_v7())], None)
            .await?;

        // Stream is now at version 1, so expecting 0 must fail
        let result = store
            .append(
                schedule_id,
                vec![prefs(schedule_id, Uuid::now_v7())],
                Some(0),
            )
            .await;

        assert!(matches!(
            result,
            Err(EventStoreError::ConcurrencyConflict {
                expected: 0,
                actual: 1
            })
        ));

        Ok(())
    }
}
