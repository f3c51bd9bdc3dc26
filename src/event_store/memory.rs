// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-Memory Event Store
//!
//! Process-local [`EventStore`] implementation backed by a `HashMap` of
//! per-schedule event vectors. It enforces the same optimistic concurrency
//! and sequencing semantics as [`NatsEventStore`](super::NatsEventStore),
//! so aggregate and projection tests written against it hold unchanged in
//! production.
//!
//! Events are held in their wire form ([`RawStoredEvent`]) and upcast on
//! read, exercising the same decode path as the JetStream store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EventStore, EventStoreError, EventStoreResult};
use crate::domain::ScheduleId;
use crate::events::{ScheduleEvent, UpcasterRegistry};
use crate::jetstream::{RawStoredEvent, StoredEvent};

/// In-memory event store for tests and local tooling
pub struct InMemoryEventStore {
    streams: RwLock<HashMap<ScheduleId, Vec<RawStoredEvent>>>,
    upcasters: UpcasterRegistry,
}

impl InMemoryEventStore {
    /// Create an empty store with no upcasters registered
    pub fn new() -> Self {
        Self::with_upcasters(UpcasterRegistry::new())
    }

    /// Create an empty store that migrates payloads on read
    pub fn with_upcasters(upcasters: UpcasterRegistry) -> Self {
        Self {
            streams: RwLock::new(HashMap::new()),
            upcasters,
        }
    }
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append(
        &self,
        schedule_id: ScheduleId,
        events: Vec<ScheduleEvent>,
        expected_version: Option<u64>,
    ) -> EventStoreResult<u64> {
        let mut streams = self.streams.write().await;
        let stream = streams.entry(schedule_id).or_default();
        let current = stream.last().map(|e| e.sequence).unwrap_or(0);

        if let Some(expected) = expected_version {
            if expected != current {
                return Err(EventStoreError::ConcurrencyConflict {
                    expected,
                    actual: current,
                });
            }
        }

        // Encode the whole batch before touching the stream so a failure
        // leaves it unchanged
        let mut batch = Vec::with_capacity(events.len());
        let mut version = current;
        for event in &events {
            version += 1;
            batch.push(RawStoredEvent::from_domain(event, version)?);
        }

        stream.extend(batch);
        Ok(version)
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
        let streams = self.streams.read().await;
        let Some(stream) = streams.get(&schedule_id) else {
            return Ok(Vec::new());
        };

        stream
            .iter()
            .filter(|e| e.sequence >= from_sequence)
            .cloned()
            .map(|raw| raw.decode(&self.upcasters).map_err(EventStoreError::from))
            .collect()
    }

    async fn read_by_correlation(
        &self,
        correlation_id: Uuid,
    ) -> EventStoreResult<Vec<StoredEvent<ScheduleEvent>>> {
        let streams = self.streams.read().await;

        let mut matched = Vec::new();
        for stream in streams.values() {
            for raw in stream {
                if raw.correlation_id == correlation_id {
                    matched.push(raw.clone().decode(&self.upcasters)?);
                }
            }
        }

        matched.sort_by_key(|e| e.timestamp);
        Ok(matched)
    }

    async fn get_version(&self, schedule_id: ScheduleId) -> EventStoreResult<Option<u64>> {
        let streams = self.streams.read().await;
        Ok(streams
            .get(&schedule_id)
            .and_then(|s| s.last())
            .map(|e| e.sequence))
    }
}
