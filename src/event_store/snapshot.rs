// Copyright (c) 2025 - Cowboy AI, Inc.
//! Schedule Snapshots
//!
//! Snapshots bound replay cost for long-lived schedules. Instead of folding
//! every event from sequence 1, a loader takes the latest snapshot and
//! replays only the tail:
//!
//! ```text
//! load(schedule_id) → snapshot at version N
//! read_events_from(schedule_id, N + 1) → tail
//! fold(snapshot.state, tail) → current state
//! ```
//!
//! A snapshot is a pure cache: deleting one never loses data, the stream
//! remains the source of truth.

use std::collections::HashMap;

use async_nats::jetstream::kv::{Config as KvConfig, Store as KvStore};
use async_nats::jetstream::Context as JetStreamContext;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::{EventStoreError, EventStoreResult};
use crate::aggregate::ScheduleState;
use crate::domain::ScheduleId;

/// Snapshot cadence used when no explicit threshold is configured
pub const DEFAULT_SNAPSHOT_THRESHOLD: u64 = 100;

/// Point-in-time capture of a schedule's folded state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    /// Schedule this snapshot belongs to
    pub schedule_id: ScheduleId,

    /// Stream version the snapshot covers (sequence of the last folded event)
    pub version: u64,

    /// Folded aggregate state at that version
    pub state: ScheduleState,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,
}

impl ScheduleSnapshot {
    /// Capture the given state at a stream version
    pub fn new(state: ScheduleState, version: u64, taken_at: DateTime<Utc>) -> Self {
        Self {
            schedule_id: state.id,
            version,
            state,
            taken_at,
        }
    }
}

/// Storage interface for schedule snapshots
///
/// Implementations overwrite on save; callers decide the cadence, typically
/// every [`DEFAULT_SNAPSHOT_THRESHOLD`] events.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Persist a snapshot, replacing any earlier one for the same schedule
    async fn save(&self, snapshot: ScheduleSnapshot) -> EventStoreResult<()>;

    /// Load the latest snapshot for a schedule, if one exists
    async fn load(&self, schedule_id: ScheduleId) -> EventStoreResult<Option<ScheduleSnapshot>>;
}

/// In-memory snapshot store for tests and local tooling
pub struct InMemorySnapshotStore {
    snapshots: RwLock<HashMap<ScheduleId, ScheduleSnapshot>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self {
            snapshots: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn save(&self, snapshot: ScheduleSnapshot) -> EventStoreResult<()> {
        self.snapshots
            .write()
            .await
            .insert(snapshot.schedule_id, snapshot);
        Ok(())
    }

    async fn load(&self, schedule_id: ScheduleId) -> EventStoreResult<Option<ScheduleSnapshot>> {
        Ok(self.snapshots.read().await.get(&schedule_id).cloned())
    }
}

/// NATS KV-backed snapshot store
///
/// Snapshots live in a KV bucket keyed by schedule ID, separate from the
/// event stream itself.
pub struct NatsSnapshotStore {
    kv: KvStore,
}

impl NatsSnapshotStore {
    /// Bucket used when callers don't supply their own
    pub const DEFAULT_BUCKET: &'static str = "examsched-snapshots";

    /// Create or open the snapshot bucket
    pub async fn new(jetstream: JetStreamContext, bucket: &str) -> EventStoreResult<Self> {
        let kv = jetstream
            .create_key_value(KvConfig {
                bucket: bucket.to_string(),
                ..Default::default()
            })
            .await
            .map_err(|e| EventStoreError::Nats(e.to_string()))?;

        Ok(Self { kv })
    }
}

#[async_trait]
impl SnapshotStore for NatsSnapshotStore {
    async fn save(&self, snapshot: ScheduleSnapshot) -> EventStoreResult<()> {
        let data = serde_json::to_vec(&snapshot)?;
        self.kv
            .put(snapshot.schedule_id.to_string(), data.into())
            .await
            .map_err(|e| EventStoreError::Nats(e.to_string()))?;
        Ok(())
    }

    async fn load(&self, schedule_id: ScheduleId) -> EventStoreResult<Option<ScheduleSnapshot>> {
        match self.kv.get(schedule_id.to_string()).await {
            Ok(Some(entry)) => Ok(Some(serde_json::from_slice(&entry)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(EventStoreError::Nats(e.to_string())),
        }
    }
}
