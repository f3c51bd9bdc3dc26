// Copyright (c) 2025 - Cowboy AI, Inc.
//! Projection Synchronizer
//!
//! Keeps the query-side [`ScheduleReadModel`]s in step with the schedule
//! event stream. The heart is a pure Mealy step,
//! [`project_schedule_event`]: it takes the current read model and one
//! stored event and returns the new model plus side effects (integration
//! publishes, log lines). The async [`ProjectionSynchronizer`] owns the
//! models, runs the step, executes the effects, and persists models to a
//! NATS KV bucket when one is attached.
//!
//! # Delivery semantics
//!
//! Events arrive at least once, in sequence order per schedule. The pure
//! step skips anything at or below `last_event_sequence`, so redelivery is
//! harmless. Projection failures are logged and never reach the write side;
//! the read side lags rather than blocks.
//!
//! # Analyzer wiring
//!
//! This is the only place the conflict analyzer and quality scorer meet the
//! event stream. Exam-set mutations re-run conflict detection (conflicts
//! that disappear are marked resolved, not deleted); `generation_completed`
//! and `schedule_finalized` additionally record a [`MetricsView`] snapshot
//! with a score trend.

use std::collections::HashMap;

use async_nats::jetstream::kv::{Config as KvConfig, Store as KvStore};
use async_nats::jetstream::Context as JetStreamContext;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::analysis::{
    analyze_conflicts, score_schedule, trend_direction, ConflictSeverity, ConflictStatus,
    QualityWeights, SchedulingMetricsInput,
};
use crate::domain::{AdjustmentStatus, CommentStatus, ScheduleId};
use crate::event_store::EventStore;
use crate::events::{IntegrationEvent, ScheduleEvent, ScheduleStatus, UpcasterRegistry};
use crate::jetstream::{RawStoredEvent, StoredEvent};
use crate::nats::NatsClient;
use crate::subjects;

use super::executor::{LoggingExecutor, SideEffectExecutor};
use super::pure::{LogLevel, ProjectionError, ProjectionResult, SideEffect};
use super::read_model::{
    AdjustmentView, CommentView, ConflictView, ExamView, MetricsView, ScheduleReadModel,
    ScheduleVersionType, ScheduleView, VersionView,
};

/// Default KV bucket holding serialized read models, one key per schedule
pub const DEFAULT_READ_MODEL_BUCKET: &str = "examsched-read-models";

/// Project one stored event onto a schedule read model
///
/// Pure: no I/O, no clock reads. Returns the updated model and the side
/// effects the caller should execute. An event at or below the model's
/// `last_event_sequence` is a redelivery and returns the model unchanged
/// with no effects.
pub fn project_schedule_event(
    mut model: ScheduleReadModel,
    event: &StoredEvent<ScheduleEvent>,
) -> (ScheduleReadModel, Vec<SideEffect>) {
    if event.sequence <= model.last_event_sequence {
        return (model, Vec::new());
    }

    let ts = event.timestamp;
    let mut effects = Vec::new();

    // Every non-creation event assumes the schedule view exists; a gap here
    // means the stream was consumed out of order or truncated.
    if model.schedule.is_none() && !matches!(event.data, ScheduleEvent::ScheduleCreated(_)) {
        effects.push(SideEffect::Log {
            level: LogLevel::Warn,
            message: format!(
                "Dropping {} at sequence {} for unknown schedule {}",
                event.event_type, event.sequence, event.schedule_id
            ),
        });
        model.last_event_sequence = event.sequence;
        return (model, effects);
    }

    match &event.data {
        ScheduleEvent::ScheduleCreated(e) => {
            model.schedule = Some(ScheduleView {
                schedule_id: e.schedule_id,
                exam_session_period_id: e.exam_session_period_id.to_string(),
                academic_year: e.academic_year.to_string(),
                exam_session: e.exam_session,
                period: e.period,
                status: ScheduleStatus::Draft,
                preference_count: 0,
                quality_score: None,
                preference_satisfaction_rate: None,
                constraint_violations: Vec::new(),
                final_quality_score: None,
                review_deadline: None,
                last_failure_reason: None,
                created_at: ts,
                last_updated: ts,
            });
            effects.push(SideEffect::Publish(IntegrationEvent::ScheduleCreated {
                schedule_id: e.schedule_id,
                exam_session_period_id: e.exam_session_period_id.to_string(),
                academic_year: e.academic_year.to_string(),
            }));
            effects.push(SideEffect::Log {
                level: LogLevel::Info,
                message: format!(
                    "Schedule {} created for period {}",
                    e.schedule_id, e.exam_session_period_id
                ),
            });
        }

        ScheduleEvent::PreferencesCollected(e) => {
            if let Some(view) = model.schedule.as_mut() {
                view.status = ScheduleStatus::PreferencesCollected;
                view.preference_count = e.preference_count;
                view.last_updated = ts;
            }
        }

        ScheduleEvent::GenerationTriggered(_) => {
            // A prior exam set is about to be replaced: capture it first
            if !model.exams.is_empty() {
                model.versions.push(VersionView {
                    version_type: ScheduleVersionType::Backup,
                    event_sequence: event.sequence,
                    captured_at: ts,
                    exam_count: model.exams.len() as u32,
                    quality_score: model.schedule.as_ref().and_then(|v| v.quality_score),
                });
            }
            if let Some(view) = model.schedule.as_mut() {
                view.status = ScheduleStatus::Generating;
                view.last_updated = ts;
            }
        }

        ScheduleEvent::ExamsCleared(_) => {
            model.exams.clear();
            touch_schedule(&mut model, ts);
            refresh_conflicts(&mut model, ts);
        }

        ScheduleEvent::ExamAdded(e) => {
            model.exams.insert(
                e.exam.scheduled_exam_id.clone(),
                ExamView::from_exam(&e.exam),
            );
            touch_schedule(&mut model, ts);
            refresh_conflicts(&mut model, ts);
        }

        ScheduleEvent::ExamRemoved(e) => {
            model.exams.remove(&e.scheduled_exam_id);
            touch_schedule(&mut model, ts);
            refresh_conflicts(&mut model, ts);
        }

        ScheduleEvent::ExamTimeChanged(e) => {
            if let Some(exam) = model.exams.get_mut(&e.scheduled_exam_id) {
                exam.slot = e.new_slot;
                exam.last_updated = ts;
            }
            if let Some(adjustment_id) = &e.adjustment_id {
                if let Some(adjustment) = model.adjustments.get_mut(adjustment_id) {
                    adjustment.status = AdjustmentStatus::Applied;
                    adjustment.last_updated = ts;
                }
            }
            touch_schedule(&mut model, ts);
            refresh_conflicts(&mut model, ts);
        }

        ScheduleEvent::ExamSpaceChanged(e) => {
            if let Some(exam) = model.exams.get_mut(&e.scheduled_exam_id) {
                exam.room = Some(e.new_room.clone());
                exam.last_updated = ts;
            }
            if let Some(adjustment_id) = &e.adjustment_id {
                if let Some(adjustment) = model.adjustments.get_mut(adjustment_id) {
                    adjustment.status = AdjustmentStatus::Applied;
                    adjustment.last_updated = ts;
                }
            }
            touch_schedule(&mut model, ts);
            refresh_conflicts(&mut model, ts);
        }

        ScheduleEvent::GenerationCompleted(e) => {
            if let Some(view) = model.schedule.as_mut() {
                view.status = ScheduleStatus::Generated;
                view.quality_score = Some(e.quality_score);
                view.preference_satisfaction_rate = Some(e.preference_satisfaction_rate);
                view.constraint_violations = e.constraint_violations.clone();
                view.last_failure_reason = None;
                view.last_updated = ts;
            }
            refresh_conflicts(&mut model, ts);
            capture_metrics(&mut model, &event.event_type, event.sequence, ts);
            model.versions.push(VersionView {
                version_type: ScheduleVersionType::Draft,
                event_sequence: event.sequence,
                captured_at: ts,
                exam_count: model.exams.len() as u32,
                quality_score: Some(e.quality_score),
            });
            effects.push(SideEffect::Publish(IntegrationEvent::ScheduleGenerated {
                schedule_id: e.schedule_id,
                exams_placed: e.exams_placed,
                quality_score: e.quality_score,
            }));
            effects.push(SideEffect::Log {
                level: LogLevel::Info,
                message: format!(
                    "Schedule {} generated: {} exams, quality {:.3}",
                    e.schedule_id, e.exams_placed, e.quality_score
                ),
            });
        }

        ScheduleEvent::GenerationFailed(e) => {
            if let Some(view) = model.schedule.as_mut() {
                view.status = e.restored_status;
                view.last_failure_reason = Some(e.reason.clone());
                view.last_updated = ts;
            }
            effects.push(SideEffect::Publish(IntegrationEvent::GenerationFailed {
                schedule_id: e.schedule_id,
                reason: e.reason.clone(),
            }));
            effects.push(SideEffect::Log {
                level: LogLevel::Warn,
                message: format!(
                    "Schedule {} generation failed at {}: {}",
                    e.schedule_id, e.failed_step, e.reason
                ),
            });
        }

        ScheduleEvent::PublishedForReview(e) => {
            if let Some(view) = model.schedule.as_mut() {
                view.status = ScheduleStatus::PublishedForReview;
                view.review_deadline = Some(e.review_deadline);
                view.last_updated = ts;
            }
            model.versions.push(VersionView {
                version_type: ScheduleVersionType::Review,
                event_sequence: event.sequence,
                captured_at: ts,
                exam_count: model.exams.len() as u32,
                quality_score: model.schedule.as_ref().and_then(|v| v.quality_score),
            });
            effects.push(SideEffect::Publish(IntegrationEvent::PublishedForReview {
                schedule_id: e.schedule_id,
                review_deadline: e.review_deadline,
            }));
        }

        ScheduleEvent::FeedbackSubmitted(e) => {
            let comment = &e.comment;
            model.comments.insert(
                comment.comment_id.clone(),
                CommentView {
                    comment_id: comment.comment_id.clone(),
                    professor_id: comment.professor_id.clone(),
                    scheduled_exam_id: comment.scheduled_exam_id.clone(),
                    comment_type: comment.comment_type,
                    comment_text: comment.comment_text.clone(),
                    status: comment.status,
                    submitted_at: comment.submitted_at,
                    reviewed_by: comment.reviewed_by.clone(),
                    last_updated: ts,
                },
            );
            if let Some(view) = model.schedule.as_mut() {
                if view.status == ScheduleStatus::PublishedForReview {
                    view.status = ScheduleStatus::UnderReview;
                }
                view.last_updated = ts;
            }
            effects.push(SideEffect::Publish(IntegrationEvent::FeedbackReceived {
                schedule_id: e.schedule_id,
                comment_id: comment.comment_id.clone(),
                professor_id: comment.professor_id.clone(),
            }));
        }

        ScheduleEvent::CommentReviewed(e) => {
            if let Some(comment) = model.comments.get_mut(&e.comment_id) {
                comment.status = CommentStatus::Reviewed;
                comment.reviewed_by = Some(e.reviewed_by.clone());
                comment.last_updated = ts;
            }
            touch_schedule(&mut model, ts);
        }

        ScheduleEvent::AdjustmentRequested(e) => {
            let adjustment = &e.adjustment;
            model.adjustments.insert(
                adjustment.adjustment_id.clone(),
                AdjustmentView {
                    adjustment_id: adjustment.adjustment_id.clone(),
                    comment_id: adjustment.comment_id.clone(),
                    scheduled_exam_id: adjustment.scheduled_exam_id.clone(),
                    adjustment_type: adjustment.adjustment_type,
                    description: adjustment.description.clone(),
                    requested_by: adjustment.requested_by.clone(),
                    status: adjustment.status,
                    reason: adjustment.reason.clone(),
                    requested_at: adjustment.requested_at,
                    last_updated: ts,
                },
            );
            touch_schedule(&mut model, ts);
        }

        ScheduleEvent::AdjustmentReviewStarted(e) => {
            if let Some(adjustment) = model.adjustments.get_mut(&e.adjustment_id) {
                adjustment.status = AdjustmentStatus::UnderReview;
                adjustment.last_updated = ts;
            }
            touch_schedule(&mut model, ts);
        }

        ScheduleEvent::AdjustmentApproved(e) => {
            let mut linked_comment = None;
            if let Some(adjustment) = model.adjustments.get_mut(&e.adjustment_id) {
                adjustment.status = AdjustmentStatus::Approved;
                adjustment.reason = e.reason.clone();
                adjustment.last_updated = ts;
                linked_comment = adjustment.comment_id.clone();
            }
            if let Some(comment_id) = linked_comment {
                if let Some(comment) = model.comments.get_mut(&comment_id) {
                    comment.status = CommentStatus::Resolved;
                    comment.last_updated = ts;
                }
            }
            touch_schedule(&mut model, ts);
            effects.push(SideEffect::Publish(IntegrationEvent::AdjustmentApproved {
                schedule_id: e.schedule_id,
                adjustment_id: e.adjustment_id.clone(),
            }));
        }

        ScheduleEvent::AdjustmentRejected(e) => {
            if let Some(adjustment) = model.adjustments.get_mut(&e.adjustment_id) {
                adjustment.status = AdjustmentStatus::Rejected;
                adjustment.reason = Some(e.reason.clone());
                adjustment.last_updated = ts;
            }
            touch_schedule(&mut model, ts);
        }

        ScheduleEvent::ScheduleFinalized(e) => {
            if let Some(view) = model.schedule.as_mut() {
                view.status = ScheduleStatus::Finalized;
                // Set once; redeliveries and later events never overwrite it
                if view.final_quality_score.is_none() {
                    view.final_quality_score = e.final_quality_score;
                }
                view.last_updated = ts;
            }
            refresh_conflicts(&mut model, ts);
            capture_metrics(&mut model, &event.event_type, event.sequence, ts);
            model.versions.push(VersionView {
                version_type: ScheduleVersionType::Final,
                event_sequence: event.sequence,
                captured_at: ts,
                exam_count: model.exams.len() as u32,
                quality_score: e.final_quality_score,
            });
            effects.push(SideEffect::Publish(IntegrationEvent::ScheduleFinalized {
                schedule_id: e.schedule_id,
                final_quality_score: e.final_quality_score,
            }));
        }

        ScheduleEvent::FinalPublished(e) => {
            if let Some(view) = model.schedule.as_mut() {
                view.status = ScheduleStatus::Published;
                view.last_updated = ts;
            }
            effects.push(SideEffect::Publish(IntegrationEvent::SchedulePublished {
                schedule_id: e.schedule_id,
            }));
            effects.push(SideEffect::Log {
                level: LogLevel::Info,
                message: format!("Schedule {} published to students", e.schedule_id),
            });
        }
    }

    model.last_event_sequence = event.sequence;
    (model, effects)
}

fn touch_schedule(model: &mut ScheduleReadModel, ts: DateTime<Utc>) {
    if let Some(view) = model.schedule.as_mut() {
        view.last_updated = ts;
    }
}

/// Re-run conflict detection over the current exam set
///
/// Conflicts no longer detected are marked resolved; re-detected or new
/// ones are upserted as detected. Nothing is ever deleted.
fn refresh_conflicts(model: &mut ScheduleReadModel, now: DateTime<Utc>) {
    let exams = model.exam_entities();
    let current = analyze_conflicts(&exams);

    {
        let current_ids: std::collections::BTreeSet<&str> =
            current.iter().map(|c| c.conflict_id.as_str()).collect();
        for view in model.conflicts.values_mut() {
            if view.status == ConflictStatus::Detected
                && !current_ids.contains(view.conflict_id.as_str())
            {
                view.status = ConflictStatus::Resolved;
                view.last_updated = now;
            }
        }
    }

    for conflict in current {
        model
            .conflicts
            .entry(conflict.conflict_id.clone())
            .and_modify(|view| {
                view.severity = conflict.severity;
                view.description = conflict.description.clone();
                view.affected_exam_ids = conflict.affected_exam_ids.clone();
                view.affected_students = conflict.affected_students;
                view.suggested_resolution = conflict.suggested_resolution.clone();
                if view.status == ConflictStatus::Resolved {
                    view.status = ConflictStatus::Detected;
                }
                view.last_updated = now;
            })
            .or_insert_with(|| ConflictView {
                conflict_id: conflict.conflict_id.clone(),
                conflict_type: conflict.conflict_type,
                severity: conflict.severity,
                description: conflict.description,
                affected_exam_ids: conflict.affected_exam_ids,
                affected_students: conflict.affected_students,
                suggested_resolution: conflict.suggested_resolution,
                status: ConflictStatus::Detected,
                detected_at: now,
                last_updated: now,
            });
    }
}

/// Re-run the quality scorer and record a metrics snapshot
///
/// Preference totals come from the schedule view; satisfied counts are
/// derived from the solver-reported satisfaction rate. Default weights
/// keep the score deterministic across replays.
fn capture_metrics(
    model: &mut ScheduleReadModel,
    trigger: &str,
    sequence: u64,
    now: DateTime<Utc>,
) {
    let exams = model.exam_entities();
    let conflicts = analyze_conflicts(&exams);

    let (total_preferences, satisfaction_rate, policy_violations) = match &model.schedule {
        Some(view) => (
            view.preference_count,
            view.preference_satisfaction_rate.unwrap_or(0.0),
            view.constraint_violations.len() as u32,
        ),
        None => (0, 0.0, 0),
    };
    let satisfied = (f64::from(total_preferences) * satisfaction_rate).round() as u32;

    let input = SchedulingMetricsInput::from_exams(
        &exams,
        &conflicts,
        total_preferences,
        satisfied,
        exams.len() as u32,
        policy_violations,
    );
    let quality = score_schedule(&input, &QualityWeights::default());

    model.score_history.push(quality.overall);
    let trend = trend_direction(&model.score_history);

    let open_conflicts = model
        .conflicts
        .values()
        .filter(|c| c.status == ConflictStatus::Detected)
        .count() as u32;
    let critical_conflicts = model
        .conflicts
        .values()
        .filter(|c| c.status == ConflictStatus::Detected && c.severity == ConflictSeverity::Critical)
        .count() as u32;

    model.metrics_history.push(MetricsView {
        trigger: trigger.to_string(),
        event_sequence: sequence,
        captured_at: now,
        quality,
        open_conflicts,
        critical_conflicts,
        trend,
    });
}

/// Query-side manager for schedule read models
///
/// Owns the in-memory models, applies stored events through the pure step,
/// executes the resulting side effects, and persists models to a NATS KV
/// bucket when one is attached.
pub struct ProjectionSynchronizer {
    models: RwLock<HashMap<ScheduleId, ScheduleReadModel>>,
    executor: Box<dyn SideEffectExecutor>,
    kv_store: Option<KvStore>,
    upcasters: UpcasterRegistry,
}

impl ProjectionSynchronizer {
    /// Create a synchronizer with no broker attached (log-only effects)
    pub fn new() -> Self {
        Self::with_executor(Box::new(LoggingExecutor::new()))
    }

    /// Create a synchronizer with a custom side effect executor
    pub fn with_executor(executor: Box<dyn SideEffectExecutor>) -> Self {
        Self {
            models: RwLock::new(HashMap::new()),
            executor,
            kv_store: None,
            upcasters: UpcasterRegistry::new(),
        }
    }

    /// Attach a KV bucket for read model persistence, creating it if needed
    pub async fn attach_kv_store(
        mut self,
        jetstream: JetStreamContext,
        bucket_name: &str,
    ) -> ProjectionResult<Self> {
        let kv_store = jetstream
            .create_key_value(KvConfig {
                bucket: bucket_name.to_string(),
                ..Default::default()
            })
            .await
            .map_err(|e| ProjectionError::KvStore(e.to_string()))?;
        self.kv_store = Some(kv_store);
        Ok(self)
    }

    /// Register schema migrations applied to raw events from the live loop
    pub fn with_upcasters(mut self, upcasters: UpcasterRegistry) -> Self {
        self.upcasters = upcasters;
        self
    }

    /// Apply one stored event: pure step, effect execution, persistence
    pub async fn apply(&self, event: &StoredEvent<ScheduleEvent>) -> ProjectionResult<()> {
        let effects = {
            let mut models = self.models.write().await;
            let current = match models.remove(&event.schedule_id) {
                Some(model) => model,
                None => self
                    .load_persisted(event.schedule_id)
                    .await?
                    .unwrap_or_default(),
            };

            let (updated, effects) = project_schedule_event(current, event);
            self.persist(event.schedule_id, &updated).await?;
            models.insert(event.schedule_id, updated);
            effects
        };

        self.executor
            .execute(effects)
            .await
            .map_err(|e| ProjectionError::Nats(e.to_string()))?;

        Ok(())
    }

    /// Rebuild one schedule's read model from its full event history
    ///
    /// Side effects are discarded: downstream consumers already saw these
    /// events the first time around.
    pub async fn rebuild(
        &self,
        schedule_id: ScheduleId,
        events: Vec<StoredEvent<ScheduleEvent>>,
    ) -> ProjectionResult<()> {
        info!(
            schedule_id = %schedule_id,
            event_count = events.len(),
            "Rebuilding schedule read model"
        );

        let mut model = ScheduleReadModel::new();
        for event in &events {
            let (updated, _effects) = project_schedule_event(model, event);
            model = updated;
        }

        self.persist(schedule_id, &model).await?;
        self.models.write().await.insert(schedule_id, model);
        Ok(())
    }

    /// Rebuild one schedule's read model by replaying the event store
    pub async fn rebuild_from_store(
        &self,
        store: &dyn EventStore,
        schedule_id: ScheduleId,
    ) -> ProjectionResult<()> {
        let events = store
            .read_events(schedule_id)
            .await
            .map_err(|e| ProjectionError::Store(e.to_string()))?;
        self.rebuild(schedule_id, events).await
    }

    /// Consume the live schedule event subjects until the subscription ends
    ///
    /// Malformed payloads and projection failures are logged and skipped;
    /// the loop never aborts on a single bad event.
    pub async fn run(&self, client: &NatsClient) -> ProjectionResult<()> {
        let mut subscription = client
            .subscribe(&subjects::all_schedule_events())
            .await
            .map_err(|e| ProjectionError::Nats(e.to_string()))?;

        info!("Projection synchronizer consuming schedule events");

        while let Some(message) = subscription.next().await {
            let raw: RawStoredEvent = match serde_json::from_slice(&message.payload) {
                Ok(raw) => raw,
                Err(e) => {
                    error!(subject = %message.subject, error = %e, "Undecodable event payload");
                    continue;
                }
            };

            let event = match raw.decode(&self.upcasters) {
                Ok(event) => event,
                Err(e) => {
                    error!(subject = %message.subject, error = %e, "Event upcast failed");
                    continue;
                }
            };

            if let Err(e) = self.apply(&event).await {
                error!(
                    schedule_id = %event.schedule_id,
                    sequence = event.sequence,
                    error = %e,
                    "Projection update failed; read model lags"
                );
            }
        }

        Ok(())
    }

    // --- query surface ---

    /// Header view of one schedule
    pub async fn get_schedule(&self, schedule_id: ScheduleId) -> Option<ScheduleView> {
        self.models
            .read()
            .await
            .get(&schedule_id)
            .and_then(|m| m.schedule.clone())
    }

    /// Exams of one schedule in id order
    pub async fn list_exams(&self, schedule_id: ScheduleId) -> Vec<ExamView> {
        self.with_model(schedule_id, |m| m.exams.values().cloned().collect())
            .await
    }

    /// Professor comments of one schedule in id order
    pub async fn list_comments(&self, schedule_id: ScheduleId) -> Vec<CommentView> {
        self.with_model(schedule_id, |m| m.comments.values().cloned().collect())
            .await
    }

    /// Adjustment requests of one schedule in id order
    pub async fn list_adjustments(&self, schedule_id: ScheduleId) -> Vec<AdjustmentView> {
        self.with_model(schedule_id, |m| m.adjustments.values().cloned().collect())
            .await
    }

    /// All conflicts ever detected for one schedule, resolved ones included
    pub async fn list_conflicts(&self, schedule_id: ScheduleId) -> Vec<ConflictView> {
        self.with_model(schedule_id, |m| m.conflicts.values().cloned().collect())
            .await
    }

    /// Latest quality metrics snapshot, if the analyzers have run
    pub async fn get_metrics(&self, schedule_id: ScheduleId) -> Option<MetricsView> {
        self.models
            .read()
            .await
            .get(&schedule_id)
            .and_then(|m| m.latest_metrics().cloned())
    }

    /// Version snapshots in capture order
    pub async fn list_versions(&self, schedule_id: ScheduleId) -> Vec<VersionView> {
        self.with_model(schedule_id, |m| m.versions.clone()).await
    }

    /// Full read model copy, mainly for tests and tooling
    pub async fn read_model(&self, schedule_id: ScheduleId) -> Option<ScheduleReadModel> {
        self.models.read().await.get(&schedule_id).cloned()
    }

    async fn with_model<T: Default>(
        &self,
        schedule_id: ScheduleId,
        f: impl FnOnce(&ScheduleReadModel) -> T,
    ) -> T {
        self.models
            .read()
            .await
            .get(&schedule_id)
            .map(f)
            .unwrap_or_default()
    }

    async fn persist(
        &self,
        schedule_id: ScheduleId,
        model: &ScheduleReadModel,
    ) -> ProjectionResult<()> {
        if let Some(kv) = &self.kv_store {
            let data = serde_json::to_vec(model)?;
            kv.put(schedule_id.to_string(), data.into())
                .await
                .map_err(|e| ProjectionError::KvStore(e.to_string()))?;
        }
        Ok(())
    }

    async fn load_persisted(
        &self,
        schedule_id: ScheduleId,
    ) -> ProjectionResult<Option<ScheduleReadModel>> {
        let Some(kv) = &self.kv_store else {
            return Ok(None);
        };

        match kv.get(schedule_id.to_string()).await {
            Ok(Some(bytes)) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(ProjectionError::KvStore(e.to_string())),
        }
    }
}

impl Default for ProjectionSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}
