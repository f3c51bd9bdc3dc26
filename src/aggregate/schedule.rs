// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Functional Schedule Aggregate
//!
//! Implements event sourcing pattern with pure functions:
//! - Immutable state
//! - Pure event application (fold)
//! - Command handlers as pure functions
//! - No side effects, no mutations
//!
//! # Architecture
//!
//! ```text
//! Command → handle_command() → Result<Event, Error>
//!                                    ↓
//! Events → apply_event() → New State
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{
    AcademicYear, AdjustmentId, AdjustmentLog, AdjustmentStatus, CommentId, CommentStatus,
    ExamPeriod, ExamSession, ExamSessionPeriodId, ProfessorComment, ScheduleId, ScheduledExam,
    ScheduledExamId,
};
use crate::events::schedule::*;
use crate::state_machine::StateInvariant;

/// Immutable Schedule State
///
/// This is the aggregate root state reconstructed from events.
/// All fields are public for read access, but the struct is immutable.
/// The state is serializable so it can be snapshotted and restored
/// without replaying the full event stream.
///
/// # Reconstruction
///
/// ```rust,ignore
/// let state = ScheduleState::from_events(&events);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleState {
    /// Aggregate ID
    pub id: ScheduleId,

    /// Business key of the examination session period
    pub exam_session_period_id: Option<ExamSessionPeriodId>,

    /// Academic year, e.g. 2024-2025
    pub academic_year: Option<AcademicYear>,

    /// Session within the academic year
    pub exam_session: Option<ExamSession>,

    /// Date range the schedule covers
    pub period: Option<ExamPeriod>,

    /// Current lifecycle status
    pub status: ScheduleStatus,

    /// Placed exams, keyed by their schedule-local id
    ///
    /// Ordered map so event replay and analysis iterate deterministically.
    pub exams: BTreeMap<ScheduledExamId, ScheduledExam>,

    /// Professor feedback, keyed by comment id
    pub comments: BTreeMap<CommentId, ProfessorComment>,

    /// Adjustment requests, keyed by adjustment id
    pub adjustments: BTreeMap<AdjustmentId, AdjustmentLog>,

    /// Preferences gathered during the collection window
    pub preference_count: u32,

    /// Status held when generation was triggered; restored on failure
    pub status_when_generation_triggered: Option<ScheduleStatus>,

    /// Reason of the most recent generation failure
    pub last_failure_reason: Option<String>,

    /// Solver-reported overall quality of the latest generation
    pub quality_score: Option<f64>,

    /// Solver-reported preference satisfaction of the latest generation
    pub preference_satisfaction_rate: Option<f64>,

    /// Solver-reported room utilization of the latest generation
    pub room_utilization_rate: Option<f64>,

    /// Constraint violations the solver reported but accepted
    pub constraint_violations: Vec<String>,

    /// Quality score frozen at finalization, never recomputed
    pub final_quality_score: Option<f64>,

    /// Deadline for professor feedback once published for review
    pub review_deadline: Option<DateTime<Utc>>,

    /// When this aggregate was created (first event timestamp)
    pub created_at: Option<DateTime<Utc>>,

    /// When this aggregate was last modified (latest event timestamp)
    pub updated_at: Option<DateTime<Utc>>,

    /// Number of events applied, used for optimistic concurrency
    pub version: u64,
}

impl ScheduleState {
    /// Create default empty state
    ///
    /// Used as initial state for event folding.
    pub fn default_for(id: ScheduleId) -> Self {
        Self {
            id,
            exam_session_period_id: None,
            academic_year: None,
            exam_session: None,
            period: None,
            status: ScheduleStatus::Draft,
            exams: BTreeMap::new(),
            comments: BTreeMap::new(),
            adjustments: BTreeMap::new(),
            preference_count: 0,
            status_when_generation_triggered: None,
            last_failure_reason: None,
            quality_score: None,
            preference_satisfaction_rate: None,
            room_utilization_rate: None,
            constraint_violations: Vec::new(),
            final_quality_score: None,
            review_deadline: None,
            created_at: None,
            updated_at: None,
            version: 0,
        }
    }

    /// Reconstruct state from event stream
    ///
    /// This is the core event sourcing fold operation:
    /// ```text
    /// State = fold(Events, InitialState, apply_event)
    /// ```
    pub fn from_events(events: &[ScheduleEvent]) -> Self {
        let schedule_id = events
            .first()
            .map(|e| e.schedule_id())
            .unwrap_or_default();

        let initial = Self::default_for(schedule_id);

        events.iter().fold(initial, apply_event)
    }

    /// Resume folding from a snapshot, applying only the tail of the stream
    pub fn from_snapshot(snapshot: ScheduleState, tail: &[ScheduleEvent]) -> Self {
        tail.iter().fold(snapshot, apply_event)
    }

    /// Check if aggregate is initialized (has events)
    pub fn is_initialized(&self) -> bool {
        self.created_at.is_some()
    }

    /// Look up an exam by its schedule-local id
    pub fn exam(&self, id: &ScheduledExamId) -> Option<&ScheduledExam> {
        self.exams.get(id)
    }
}

impl StateInvariant for ScheduleState {
    fn check_invariants(&self) -> Result<(), String> {
        // Initialized schedules always know their period
        if self.is_initialized() && self.period.is_none() {
            return Err("initialized schedule has no exam period".to_string());
        }

        // Every exam date lies inside the schedule's period
        if let Some(period) = &self.period {
            for exam in self.exams.values() {
                if !period.contains(exam.slot.date) {
                    return Err(format!(
                        "exam {} on {} falls outside period {}",
                        exam.scheduled_exam_id, exam.slot.date, period
                    ));
                }
            }
        }

        // No two exams overlap in time
        let exams: Vec<_> = self.exams.values().collect();
        for (i, a) in exams.iter().enumerate() {
            for b in exams.iter().skip(i + 1) {
                if a.slot.overlaps(&b.slot) {
                    return Err(format!(
                        "exams {} and {} overlap in time",
                        a.scheduled_exam_id, b.scheduled_exam_id
                    ));
                }
            }
        }

        // Room capacity holds for every assigned room
        for exam in self.exams.values() {
            if let Some(room) = &exam.room {
                if exam.student_count > room.capacity {
                    return Err(format!(
                        "exam {} places {} students in room {} with capacity {}",
                        exam.scheduled_exam_id, exam.student_count, room.room_id, room.capacity
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Apply event to state (pure function)
///
/// This is the core of event sourcing - reconstructing state by applying events.
/// Each event type has a specific transformation on the state.
///
/// # Invariants
/// - Function is pure (no side effects)
/// - Same event + same state = same result
/// - Never fails (events are facts that happened)
///
/// # Parameters
/// - `state`: Current state before event
/// - `event`: Event to apply
///
/// # Returns
/// New state after applying event
pub fn apply_event(state: ScheduleState, event: &ScheduleEvent) -> ScheduleState {
    use ScheduleEvent::*;

    match event {
        ScheduleCreated(e) => ScheduleState {
            id: e.schedule_id,
            exam_session_period_id: Some(e.exam_session_period_id.clone()),
            academic_year: Some(e.academic_year.clone()),
            exam_session: Some(e.exam_session),
            period: Some(e.period),
            status: ScheduleStatus::Draft,
            created_at: Some(e.timestamp),
            updated_at: Some(e.timestamp),
            version: state.version + 1,
            ..state
        },

        PreferencesCollected(e) => ScheduleState {
            status: ScheduleStatus::PreferencesCollected,
            preference_count: e.preference_count,
            updated_at: Some(e.timestamp),
            version: state.version + 1,
            ..state
        },

        GenerationTriggered(e) => ScheduleState {
            status: ScheduleStatus::Generating,
            status_when_generation_triggered: Some(e.from_status),
            updated_at: Some(e.timestamp),
            version: state.version + 1,
            ..state
        },

        ExamsCleared(e) => ScheduleState {
            exams: BTreeMap::new(),
            updated_at: Some(e.timestamp),
            version: state.version + 1,
            ..state
        },

        ExamAdded(e) => {
            let mut exams = state.exams.clone();
            exams.insert(e.exam.scheduled_exam_id.clone(), e.exam.clone());
            ScheduleState {
                exams,
                updated_at: Some(e.timestamp),
                version: state.version + 1,
                ..state
            }
        }

        ExamRemoved(e) => {
            let mut exams = state.exams.clone();
            exams.remove(&e.scheduled_exam_id);
            ScheduleState {
                exams,
                updated_at: Some(e.timestamp),
                version: state.version + 1,
                ..state
            }
        }

        ExamTimeChanged(e) => {
            let mut exams = state.exams.clone();
            if let Some(exam) = exams.get_mut(&e.scheduled_exam_id) {
                exam.slot = e.new_slot;
                exam.updated_at = e.timestamp;
            }
            let adjustments = mark_adjustment_applied(&state, e.adjustment_id.as_ref());
            ScheduleState {
                exams,
                adjustments,
                updated_at: Some(e.timestamp),
                version: state.version + 1,
                ..state
            }
        }

        ExamSpaceChanged(e) => {
            let mut exams = state.exams.clone();
            if let Some(exam) = exams.get_mut(&e.scheduled_exam_id) {
                exam.room = Some(e.new_room.clone());
                exam.updated_at = e.timestamp;
            }
            let adjustments = mark_adjustment_applied(&state, e.adjustment_id.as_ref());
            ScheduleState {
                exams,
                adjustments,
                updated_at: Some(e.timestamp),
                version: state.version + 1,
                ..state
            }
        }

        GenerationCompleted(e) => ScheduleState {
            status: ScheduleStatus::Generated,
            status_when_generation_triggered: None,
            last_failure_reason: None,
            quality_score: Some(e.quality_score),
            preference_satisfaction_rate: Some(e.preference_satisfaction_rate),
            room_utilization_rate: Some(e.room_utilization_rate),
            constraint_violations: e.constraint_violations.clone(),
            updated_at: Some(e.timestamp),
            version: state.version + 1,
            ..state
        },

        GenerationFailed(e) => ScheduleState {
            status: e.restored_status,
            status_when_generation_triggered: None,
            last_failure_reason: Some(e.reason.clone()),
            updated_at: Some(e.timestamp),
            version: state.version + 1,
            ..state
        },

        PublishedForReview(e) => ScheduleState {
            status: ScheduleStatus::PublishedForReview,
            review_deadline: Some(e.review_deadline),
            updated_at: Some(e.timestamp),
            version: state.version + 1,
            ..state
        },

        FeedbackSubmitted(e) => {
            let mut comments = state.comments.clone();
            comments.insert(e.comment.comment_id.clone(), e.comment.clone());

            // First feedback opens the review; later feedback keeps it open
            let status = if state.status == ScheduleStatus::PublishedForReview {
                ScheduleStatus::UnderReview
            } else {
                state.status
            };

            ScheduleState {
                comments,
                status,
                updated_at: Some(e.timestamp),
                version: state.version + 1,
                ..state
            }
        }

        CommentReviewed(e) => {
            let mut comments = state.comments.clone();
            if let Some(comment) = comments.get_mut(&e.comment_id) {
                comment.status = CommentStatus::Reviewed;
                comment.reviewed_at = Some(e.timestamp);
                comment.reviewed_by = Some(e.reviewed_by.clone());
            }
            ScheduleState {
                comments,
                updated_at: Some(e.timestamp),
                version: state.version + 1,
                ..state
            }
        }

        AdjustmentRequested(e) => {
            let mut adjustments = state.adjustments.clone();
            adjustments.insert(e.adjustment.adjustment_id.clone(), e.adjustment.clone());
            ScheduleState {
                adjustments,
                updated_at: Some(e.timestamp),
                version: state.version + 1,
                ..state
            }
        }

        AdjustmentReviewStarted(e) => {
            let mut adjustments = state.adjustments.clone();
            if let Some(adjustment) = adjustments.get_mut(&e.adjustment_id) {
                adjustment.status = AdjustmentStatus::UnderReview;
            }
            ScheduleState {
                adjustments,
                updated_at: Some(e.timestamp),
                version: state.version + 1,
                ..state
            }
        }

        AdjustmentApproved(e) => {
            let mut adjustments = state.adjustments.clone();
            let mut comments = state.comments.clone();

            if let Some(adjustment) = adjustments.get_mut(&e.adjustment_id) {
                adjustment.status = AdjustmentStatus::Approved;

                // An approval resolves the comment that motivated the request
                if let Some(comment_id) = &adjustment.comment_id {
                    if let Some(comment) = comments.get_mut(comment_id) {
                        comment.status = CommentStatus::Resolved;
                    }
                }
            }

            ScheduleState {
                adjustments,
                comments,
                updated_at: Some(e.timestamp),
                version: state.version + 1,
                ..state
            }
        }

        AdjustmentRejected(e) => {
            let mut adjustments = state.adjustments.clone();
            if let Some(adjustment) = adjustments.get_mut(&e.adjustment_id) {
                adjustment.status = AdjustmentStatus::Rejected;
            }
            ScheduleState {
                adjustments,
                updated_at: Some(e.timestamp),
                version: state.version + 1,
                ..state
            }
        }

        ScheduleFinalized(e) => ScheduleState {
            status: ScheduleStatus::Finalized,
            final_quality_score: e.final_quality_score,
            updated_at: Some(e.timestamp),
            version: state.version + 1,
            ..state
        },

        FinalPublished(e) => ScheduleState {
            status: ScheduleStatus::Published,
            updated_at: Some(e.timestamp),
            version: state.version + 1,
            ..state
        },
    }
}

/// Mark the adjustment a time or space change applied, when one is linked
fn mark_adjustment_applied(
    state: &ScheduleState,
    adjustment_id: Option<&AdjustmentId>,
) -> BTreeMap<AdjustmentId, AdjustmentLog> {
    let mut adjustments = state.adjustments.clone();
    if let Some(id) = adjustment_id {
        if let Some(adjustment) = adjustments.get_mut(id) {
            adjustment.status = AdjustmentStatus::Applied;
        }
    }
    adjustments
}
