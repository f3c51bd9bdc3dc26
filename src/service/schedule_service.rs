// Copyright (c) 2025 - Cowboy AI, Inc.
//! Schedule Command Service
//!
//! Application service routing commands to the event-sourced schedule
//! aggregate. Each method is one transaction:
//!
//! ```text
//! Command → per-id lock → load (snapshot + tail) → pure handler
//!                                                      ↓
//!                         snapshot? ← append (expected_version)
//! ```
//!
//! # Transaction Semantics
//!
//! 1. Acquire the per-schedule async lock (single writer per schedule id;
//!    different schedules proceed in parallel)
//! 2. Load current state from the latest snapshot plus the event tail,
//!    falling back to a full replay
//! 3. Handle the command through the pure handler function
//! 4. Append the produced event(s) with the loaded version as
//!    `expected_version` (optimistic concurrency)
//! 5. Take a snapshot when the stream version crosses a threshold multiple
//!
//! If any step fails, no event is appended and state is unchanged. The
//! JetStream-backed store publishes each appended envelope on the schedule's
//! event subject, which is what feeds the projection synchronizer.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::aggregate::commands::*;
use crate::aggregate::handlers::*;
use crate::aggregate::{apply_event, ScheduleState};
use crate::domain::ScheduleId;
use crate::event_store::{
    EventStore, EventStoreError, ScheduleSnapshot, SnapshotStore, DEFAULT_SNAPSHOT_THRESHOLD,
};
use crate::events::ScheduleEvent;

/// Service layer result type
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service layer errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Command validation failed
    #[error("Command error: {0}")]
    CommandError(#[from] CommandError),

    /// Event store error
    #[error("Event store error: {0}")]
    EventStoreError(String),

    /// NATS publishing error
    #[error("NATS error: {0}")]
    NatsError(String),

    /// Schedule not found
    #[error("Schedule not found: {0}")]
    NotFound(Uuid),

    /// Concurrency conflict
    #[error("Concurrency conflict: expected version {expected}, got {actual}")]
    ConcurrencyConflict { expected: u64, actual: u64 },
}

fn map_store_error(err: EventStoreError) -> ServiceError {
    match err {
        EventStoreError::ConcurrencyConflict { expected, actual } => {
            ServiceError::ConcurrencyConflict { expected, actual }
        }
        EventStoreError::Nats(msg) => ServiceError::NatsError(msg),
        other => ServiceError::EventStoreError(other.to_string()),
    }
}

/// Acknowledgement returned for every accepted command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandAck {
    /// Schedule the command was applied to
    pub schedule_id: ScheduleId,

    /// Stream version after the append (sequence of the last event)
    pub version: u64,
}

/// Schedule command service trait
///
/// One async method per aggregate command. Every accepted command returns
/// a [`CommandAck`] carrying the post-append stream version; a rejected
/// command returns the typed error and appends nothing.
#[async_trait]
pub trait ScheduleCommandService: Send + Sync {
    /// Create a schedule for an examination session period
    ///
    /// Allocates a fresh schedule id and returns it in the ack.
    async fn create_schedule(&self, command: CreateScheduleCommand) -> ServiceResult<CommandAck>;

    /// Record that professor preference collection finished
    async fn complete_preference_collection(
        &self,
        schedule_id: ScheduleId,
        command: CompletePreferenceCollectionCommand,
    ) -> ServiceResult<CommandAck>;

    /// Start the automatic generation workflow
    async fn trigger_generation(
        &self,
        schedule_id: ScheduleId,
        command: TriggerGenerationCommand,
    ) -> ServiceResult<CommandAck>;

    /// Apply a validated solver result to the schedule
    async fn apply_generated_schedule(
        &self,
        schedule_id: ScheduleId,
        command: ApplyGeneratedScheduleCommand,
    ) -> ServiceResult<CommandAck>;

    /// Record a generation failure and restore the pre-trigger status
    async fn handle_generation_failure(
        &self,
        schedule_id: ScheduleId,
        command: HandleGenerationFailureCommand,
    ) -> ServiceResult<CommandAck>;

    /// Place a single exam manually
    async fn add_exam(
        &self,
        schedule_id: ScheduleId,
        command: AddExamCommand,
    ) -> ServiceResult<CommandAck>;

    /// Remove a placed exam
    async fn remove_exam(
        &self,
        schedule_id: ScheduleId,
        command: RemoveExamCommand,
    ) -> ServiceResult<CommandAck>;

    /// Move an exam to a different time slot
    async fn update_exam_time(
        &self,
        schedule_id: ScheduleId,
        command: UpdateExamTimeCommand,
    ) -> ServiceResult<CommandAck>;

    /// Move an exam to a different room
    async fn update_exam_space(
        &self,
        schedule_id: ScheduleId,
        command: UpdateExamSpaceCommand,
    ) -> ServiceResult<CommandAck>;

    /// Record professor feedback on the published schedule
    async fn submit_feedback(
        &self,
        schedule_id: ScheduleId,
        command: SubmitFeedbackCommand,
    ) -> ServiceResult<CommandAck>;

    /// Mark a submitted comment as reviewed
    async fn review_comment(
        &self,
        schedule_id: ScheduleId,
        command: ReviewCommentCommand,
    ) -> ServiceResult<CommandAck>;

    /// Open an adjustment request
    async fn request_adjustment(
        &self,
        schedule_id: ScheduleId,
        command: RequestAdjustmentCommand,
    ) -> ServiceResult<CommandAck>;

    /// Move an adjustment into administrative review
    async fn start_adjustment_review(
        &self,
        schedule_id: ScheduleId,
        command: StartAdjustmentReviewCommand,
    ) -> ServiceResult<CommandAck>;

    /// Approve an adjustment request
    async fn approve_adjustment(
        &self,
        schedule_id: ScheduleId,
        command: ApproveAdjustmentCommand,
    ) -> ServiceResult<CommandAck>;

    /// Reject an adjustment request
    async fn reject_adjustment(
        &self,
        schedule_id: ScheduleId,
        command: RejectAdjustmentCommand,
    ) -> ServiceResult<CommandAck>;

    /// Publish the generated schedule for professor review
    async fn publish_for_review(
        &self,
        schedule_id: ScheduleId,
        command: PublishForReviewCommand,
    ) -> ServiceResult<CommandAck>;

    /// Freeze the schedule content
    async fn finalize(
        &self,
        schedule_id: ScheduleId,
        command: FinalizeCommand,
    ) -> ServiceResult<CommandAck>;

    /// Release the finalized schedule to students
    async fn publish_final(
        &self,
        schedule_id: ScheduleId,
        command: PublishFinalCommand,
    ) -> ServiceResult<CommandAck>;

    /// Reconstruct the current write-side state of a schedule
    async fn get_schedule(&self, schedule_id: ScheduleId) -> ServiceResult<ScheduleState>;

    /// Check whether a schedule exists
    async fn exists(&self, schedule_id: ScheduleId) -> ServiceResult<bool>;
}

/// Event-sourced implementation of [`ScheduleCommandService`]
///
/// Works against any [`EventStore`] / [`SnapshotStore`] pair, so the same
/// service drives the JetStream-backed stores in production and the
/// in-memory stores in tests with identical concurrency semantics.
pub struct EventSourcedScheduleService {
    /// Event store for persistence
    event_store: Arc<dyn EventStore>,

    /// Snapshot store for fast state loads
    snapshot_store: Arc<dyn SnapshotStore>,

    /// Snapshot every this many events
    snapshot_threshold: u64,

    /// Per-schedule write locks, created lazily
    locks: Mutex<HashMap<ScheduleId, Arc<Mutex<()>>>>,
}

impl EventSourcedScheduleService {
    /// Create a new event-sourced service with the default snapshot cadence
    pub fn new(event_store: Arc<dyn EventStore>, snapshot_store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            event_store,
            snapshot_store,
            snapshot_threshold: DEFAULT_SNAPSHOT_THRESHOLD,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Override the snapshot cadence (events per snapshot, at least 1)
    pub fn with_snapshot_threshold(mut self, threshold: u64) -> Self {
        self.snapshot_threshold = threshold.max(1);
        self
    }

    /// Get (or create) the write lock for a schedule
    async fn lock_for(&self, schedule_id: ScheduleId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(schedule_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Load current state from the latest snapshot plus the event tail
    async fn load_state(&self, schedule_id: ScheduleId) -> ServiceResult<ScheduleState> {
        if let Some(snapshot) = self
            .snapshot_store
            .load(schedule_id)
            .await
            .map_err(map_store_error)?
        {
            let tail: Vec<ScheduleEvent> = self
                .event_store
                .read_events_from(schedule_id, snapshot.version + 1)
                .await
                .map_err(map_store_error)?
                .into_iter()
                .map(|stored| stored.data)
                .collect();

            debug!(
                schedule_id = %schedule_id,
                snapshot_version = snapshot.version,
                tail_len = tail.len(),
                "Loaded state from snapshot plus tail"
            );

            return Ok(ScheduleState::from_snapshot(snapshot.state, &tail));
        }

        let events: Vec<ScheduleEvent> = self
            .event_store
            .read_events(schedule_id)
            .await
            .map_err(map_store_error)?
            .into_iter()
            .map(|stored| stored.data)
            .collect();

        Ok(ScheduleState::from_events(&events))
    }

    /// Append events under optimistic concurrency and snapshot if due
    ///
    /// `state` is the loaded state the handler validated against; its
    /// version is the expected stream version for the append.
    async fn append_events(
        &self,
        schedule_id: ScheduleId,
        state: ScheduleState,
        events: Vec<ScheduleEvent>,
    ) -> ServiceResult<CommandAck> {
        let expected = state.version;

        let version = self
            .event_store
            .append(schedule_id, events.clone(), Some(expected))
            .await
            .map_err(map_store_error)?;

        self.maybe_snapshot(schedule_id, state, &events, expected, version)
            .await;

        Ok(CommandAck {
            schedule_id,
            version,
        })
    }

    /// Take a snapshot when the stream version crosses a threshold multiple
    ///
    /// Snapshot failures are logged, not surfaced: the events are already
    /// durable and the next load falls back to a longer replay.
    async fn maybe_snapshot(
        &self,
        schedule_id: ScheduleId,
        state: ScheduleState,
        events: &[ScheduleEvent],
        old_version: u64,
        new_version: u64,
    ) {
        if old_version / self.snapshot_threshold == new_version / self.snapshot_threshold {
            return;
        }

        let next = events.iter().fold(state, apply_event);
        let snapshot = ScheduleSnapshot::new(next, new_version, Utc::now());

        match self.snapshot_store.save(snapshot).await {
            Ok(()) => info!(
                schedule_id = %schedule_id,
                version = new_version,
                "Snapshot taken"
            ),
            Err(e) => warn!(
                schedule_id = %schedule_id,
                version = new_version,
                error = %e,
                "Snapshot save failed, replay will be longer"
            ),
        }
    }

    /// Run one command transaction against an existing schedule
    ///
    /// Holds the per-schedule lock across load → handle → append.
    async fn execute<F>(&self, schedule_id: ScheduleId, handle: F) -> ServiceResult<CommandAck>
    where
        F: FnOnce(&ScheduleState) -> Result<Vec<ScheduleEvent>, CommandError>,
    {
        let lock = self.lock_for(schedule_id).await;
        let _guard = lock.lock().await;

        let state = self.load_state(schedule_id).await?;
        if !state.is_initialized() {
            return Err(ServiceError::NotFound(schedule_id.as_uuid()));
        }

        let events = handle(&state)?;
        self.append_events(schedule_id, state, events).await
    }
}

#[async_trait]
impl ScheduleCommandService for EventSourcedScheduleService {
    async fn create_schedule(&self, command: CreateScheduleCommand) -> ServiceResult<CommandAck> {
        let schedule_id = ScheduleId::new();

        let lock = self.lock_for(schedule_id).await;
        let _guard = lock.lock().await;

        let initial = ScheduleState::default_for(schedule_id);
        let event = handle_create_schedule(&initial, command, schedule_id)?;

        // Some(0): the stream must not exist yet
        self.append_events(
            schedule_id,
            initial,
            vec![ScheduleEvent::ScheduleCreated(event)],
        )
        .await
    }

    async fn complete_preference_collection(
        &self,
        schedule_id: ScheduleId,
        command: CompletePreferenceCollectionCommand,
    ) -> ServiceResult<CommandAck> {
        self.execute(schedule_id, |state| {
            let event = handle_complete_preference_collection(state, command)?;
            Ok(vec![ScheduleEvent::PreferencesCollected(event)])
        })
        .await
    }

    async fn trigger_generation(
        &self,
        schedule_id: ScheduleId,
        command: TriggerGenerationCommand,
    ) -> ServiceResult<CommandAck> {
        self.execute(schedule_id, |state| {
            let event = handle_trigger_generation(state, command)?;
            Ok(vec![ScheduleEvent::GenerationTriggered(event)])
        })
        .await
    }

    async fn apply_generated_schedule(
        &self,
        schedule_id: ScheduleId,
        command: ApplyGeneratedScheduleCommand,
    ) -> ServiceResult<CommandAck> {
        self.execute(schedule_id, |state| {
            handle_apply_generated_schedule(state, command)
        })
        .await
    }

    async fn handle_generation_failure(
        &self,
        schedule_id: ScheduleId,
        command: HandleGenerationFailureCommand,
    ) -> ServiceResult<CommandAck> {
        self.execute(schedule_id, |state| {
            let event = handle_generation_failure(state, command)?;
            Ok(vec![ScheduleEvent::GenerationFailed(event)])
        })
        .await
    }

    async fn add_exam(
        &self,
        schedule_id: ScheduleId,
        command: AddExamCommand,
    ) -> ServiceResult<CommandAck> {
        self.execute(schedule_id, |state| {
            let event = handle_add_exam(state, command)?;
            Ok(vec![ScheduleEvent::ExamAdded(event)])
        })
        .await
    }

    async fn remove_exam(
        &self,
        schedule_id: ScheduleId,
        command: RemoveExamCommand,
    ) -> ServiceResult<CommandAck> {
        self.execute(schedule_id, |state| {
            let event = handle_remove_exam(state, command)?;
            Ok(vec![ScheduleEvent::ExamRemoved(event)])
        })
        .await
    }

    async fn update_exam_time(
        &self,
        schedule_id: ScheduleId,
        command: UpdateExamTimeCommand,
    ) -> ServiceResult<CommandAck> {
        self.execute(schedule_id, |state| {
            let event = handle_update_exam_time(state, command)?;
            Ok(vec![ScheduleEvent::ExamTimeChanged(event)])
        })
        .await
    }

    async fn update_exam_space(
        &self,
        schedule_id: ScheduleId,
        command: UpdateExamSpaceCommand,
    ) -> ServiceResult<CommandAck> {
        self.execute(schedule_id, |state| {
            let event = handle_update_exam_space(state, command)?;
            Ok(vec![ScheduleEvent::ExamSpaceChanged(event)])
        })
        .await
    }

    async fn submit_feedback(
        &self,
        schedule_id: ScheduleId,
        command: SubmitFeedbackCommand,
    ) -> ServiceResult<CommandAck> {
        self.execute(schedule_id, |state| {
            let event = handle_submit_feedback(state, command)?;
            Ok(vec![ScheduleEvent::FeedbackSubmitted(event)])
        })
        .await
    }

    async fn review_comment(
        &self,
        schedule_id: ScheduleId,
        command: ReviewCommentCommand,
    ) -> ServiceResult<CommandAck> {
        self.execute(schedule_id, |state| {
            let event = handle_review_comment(state, command)?;
            Ok(vec![ScheduleEvent::CommentReviewed(event)])
        })
        .await
    }

    async fn request_adjustment(
        &self,
        schedule_id: ScheduleId,
        command: RequestAdjustmentCommand,
    ) -> ServiceResult<CommandAck> {
        self.execute(schedule_id, |state| {
            let event = handle_request_adjustment(state, command)?;
            Ok(vec![ScheduleEvent::AdjustmentRequested(event)])
        })
        .await
    }

    async fn start_adjustment_review(
        &self,
        schedule_id: ScheduleId,
        command: StartAdjustmentReviewCommand,
    ) -> ServiceResult<CommandAck> {
        self.execute(schedule_id, |state| {
            let event = handle_start_adjustment_review(state, command)?;
            Ok(vec![ScheduleEvent::AdjustmentReviewStarted(event)])
        })
        .await
    }

    async fn approve_adjustment(
        &self,
        schedule_id: ScheduleId,
        command: ApproveAdjustmentCommand,
    ) -> ServiceResult<CommandAck> {
        self.execute(schedule_id, |state| {
            let event = handle_approve_adjustment(state, command)?;
            Ok(vec![ScheduleEvent::AdjustmentApproved(event)])
        })
        .await
    }

    async fn reject_adjustment(
        &self,
        schedule_id: ScheduleId,
        command: RejectAdjustmentCommand,
    ) -> ServiceResult<CommandAck> {
        self.execute(schedule_id, |state| {
            let event = handle_reject_adjustment(state, command)?;
            Ok(vec![ScheduleEvent::AdjustmentRejected(event)])
        })
        .await
    }

    async fn publish_for_review(
        &self,
        schedule_id: ScheduleId,
        command: PublishForReviewCommand,
    ) -> ServiceResult<CommandAck> {
        self.execute(schedule_id, |state| {
            let event = handle_publish_for_review(state, command)?;
            Ok(vec![ScheduleEvent::PublishedForReview(event)])
        })
        .await
    }

    async fn finalize(
        &self,
        schedule_id: ScheduleId,
        command: FinalizeCommand,
    ) -> ServiceResult<CommandAck> {
        self.execute(schedule_id, |state| {
            let event = handle_finalize(state, command)?;
            Ok(vec![ScheduleEvent::ScheduleFinalized(event)])
        })
        .await
    }

    async fn publish_final(
        &self,
        schedule_id: ScheduleId,
        command: PublishFinalCommand,
    ) -> ServiceResult<CommandAck> {
        self.execute(schedule_id, |state| {
            let event = handle_publish_final(state, command)?;
            Ok(vec![ScheduleEvent::FinalPublished(event)])
        })
        .await
    }

    async fn get_schedule(&self, schedule_id: ScheduleId) -> ServiceResult<ScheduleState> {
        let state = self.load_state(schedule_id).await?;
        if !state.is_initialized() {
            return Err(ServiceError::NotFound(schedule_id.as_uuid()));
        }
        Ok(state)
    }

    async fn exists(&self, schedule_id: ScheduleId) -> ServiceResult<bool> {
        let version = self
            .event_store
            .get_version(schedule_id)
            .await
            .map_err(map_store_error)?;
        Ok(version.is_some())
    }
}
