// Copyright (c) 2025 - Cowboy AI, Inc.
//! Schedule Domain Events
//!
//! All state changes to Schedule aggregates are represented as immutable events.
//! Events follow event sourcing best practices:
//! - Immutable (no setters, only getters)
//! - Past tense naming (ExamAdded, not AddExam)
//! - Include correlation_id and causation_id for traceability
//! - Versioned for schema evolution
//! - Serializable for persistence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    AcademicYear, AdjustmentId, AdjustmentLog, CommentId, ExamPeriod, ExamSession,
    ExamSessionPeriodId, ProfessorComment, RoomAssignment, ScheduleId, ScheduledExam,
    ScheduledExamId, TimeSlot,
};

/// Schedule Domain Events
///
/// All events are immutable and represent facts that have occurred.
/// Each event type corresponds to a specific state change in the Schedule aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScheduleEvent {
    /// Schedule was created for an examination session period
    ScheduleCreated(ScheduleCreated),

    /// Professor preference collection was completed
    PreferencesCollected(PreferencesCollected),

    /// Automatic generation workflow was started
    GenerationTriggered(GenerationTriggered),

    /// Previously placed exams were cleared before applying a solver result
    ExamsCleared(ExamsCleared),

    /// One exam was placed in the schedule
    ExamAdded(ExamAdded),

    /// One exam was removed from the schedule
    ExamRemoved(ExamRemoved),

    /// An exam's date or time interval changed
    ExamTimeChanged(ExamTimeChanged),

    /// An exam's room assignment changed
    ExamSpaceChanged(ExamSpaceChanged),

    /// Generation workflow finished and the solver result was applied
    GenerationCompleted(GenerationCompleted),

    /// Generation workflow failed; the schedule left GENERATING
    GenerationFailed(GenerationFailed),

    /// Schedule was published for professor review
    PublishedForReview(PublishedForReview),

    /// A professor submitted feedback on the published schedule
    FeedbackSubmitted(FeedbackSubmitted),

    /// A submitted comment was reviewed by an administrator
    CommentReviewed(CommentReviewed),

    /// An adjustment to the schedule was requested
    AdjustmentRequested(AdjustmentRequested),

    /// An adjustment entered administrative review
    AdjustmentReviewStarted(AdjustmentReviewStarted),

    /// An adjustment was approved
    AdjustmentApproved(AdjustmentApproved),

    /// An adjustment was rejected with a reason
    AdjustmentRejected(AdjustmentRejected),

    /// Schedule was finalized; final quality score snapshot captured
    ScheduleFinalized(ScheduleFinalized),

    /// Final schedule was published (terminal)
    FinalPublished(FinalPublished),
}

/// Schedule was created for an examination session period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleCreated {
    /// Event version for schema evolution
    pub event_version: u32,

    /// Unique event identifier (UUID v7 for time ordering)
    pub event_id: Uuid,

    /// Schedule aggregate ID
    pub schedule_id: ScheduleId,

    /// When this event occurred
    pub timestamp: DateTime<Utc>,

    /// Correlation ID for request tracing
    pub correlation_id: Uuid,

    /// Causation ID (event that caused this event)
    pub causation_id: Option<Uuid>,

    /// Unique business key of the examination session period
    pub exam_session_period_id: ExamSessionPeriodId,

    /// Academic year, e.g. 2024-2025
    pub academic_year: AcademicYear,

    /// Session within the academic year
    pub exam_session: ExamSession,

    /// Date range the schedule covers
    pub period: ExamPeriod,
}

/// Professor preference collection was completed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesCollected {
    pub event_version: u32,
    pub event_id: Uuid,
    pub schedule_id: ScheduleId,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Uuid,
    pub causation_id: Option<Uuid>,

    /// Number of professor preferences gathered during the window
    pub preference_count: u32,
}

/// Automatic generation workflow was started
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationTriggered {
    pub event_version: u32,
    pub event_id: Uuid,
    pub schedule_id: ScheduleId,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Uuid,
    pub causation_id: Option<Uuid>,

    /// Who or what started the generation
    pub triggered_by: String,

    /// Status the schedule was in when generation started; restored if
    /// generation fails
    pub from_status: ScheduleStatus,
}

/// Previously placed exams were cleared before applying a solver result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamsCleared {
    pub event_version: u32,
    pub event_id: Uuid,
    pub schedule_id: ScheduleId,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Uuid,
    pub causation_id: Option<Uuid>,

    /// How many exams were discarded
    pub cleared_count: u32,
}

/// One exam was placed in the schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamAdded {
    pub event_version: u32,
    pub event_id: Uuid,
    pub schedule_id: ScheduleId,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Uuid,
    pub causation_id: Option<Uuid>,

    /// The placed exam
    pub exam: ScheduledExam,
}

/// One exam was removed from the schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamRemoved {
    pub event_version: u32,
    pub event_id: Uuid,
    pub schedule_id: ScheduleId,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Uuid,
    pub causation_id: Option<Uuid>,

    /// Exam that was removed
    pub scheduled_exam_id: ScheduledExamId,
}

/// Impact summary of a time or space change, computed over the schedule's
/// own exam set (best effort, no global re-solve)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeImpact {
    /// Students sitting the changed exam
    pub impacted_students: u32,

    /// Conflicts present before and gone after the change
    pub conflicts_resolved: u32,

    /// Conflicts absent before and present after the change
    pub conflicts_created: u32,
}

/// An exam's date or time interval changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamTimeChanged {
    pub event_version: u32,
    pub event_id: Uuid,
    pub schedule_id: ScheduleId,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Uuid,
    pub causation_id: Option<Uuid>,

    pub scheduled_exam_id: ScheduledExamId,
    pub old_slot: TimeSlot,
    pub new_slot: TimeSlot,

    /// Local impact summary of the change
    pub impact: ChangeImpact,

    /// Approved adjustment this change applies, if any
    pub adjustment_id: Option<AdjustmentId>,
}

/// An exam's room assignment changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSpaceChanged {
    pub event_version: u32,
    pub event_id: Uuid,
    pub schedule_id: ScheduleId,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Uuid,
    pub causation_id: Option<Uuid>,

    pub scheduled_exam_id: ScheduledExamId,
    pub old_room: Option<RoomAssignment>,
    pub new_room: RoomAssignment,

    /// Local impact summary of the change
    pub impact: ChangeImpact,

    /// Approved adjustment this change applies, if any
    pub adjustment_id: Option<AdjustmentId>,
}

/// Generation workflow finished and the solver result was applied
///
/// Metrics are stored exactly as the solver reported them; the aggregate
/// never recomputes them. Independent analysis runs on the read side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationCompleted {
    pub event_version: u32,
    pub event_id: Uuid,
    pub schedule_id: ScheduleId,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Uuid,
    pub causation_id: Option<Uuid>,

    /// Number of exams the solver placed
    pub exams_placed: u32,

    /// Solver-reported overall quality in [0, 1]
    pub quality_score: f64,

    /// Solver-reported share of satisfied preferences in [0, 1]
    pub preference_satisfaction_rate: f64,

    /// Solver-reported room utilization in [0, 1]
    pub room_utilization_rate: f64,

    /// Constraint violations the solver reported but accepted
    pub constraint_violations: Vec<String>,

    /// Solver wall-clock time
    pub solver_elapsed_ms: u64,

    /// Solver iteration count
    pub solver_iterations: u64,
}

/// Generation workflow failed; the schedule left GENERATING
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationFailed {
    pub event_version: u32,
    pub event_id: Uuid,
    pub schedule_id: ScheduleId,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Uuid,
    pub causation_id: Option<Uuid>,

    /// Failure reason surfaced to the read side
    pub reason: String,

    /// Workflow step that failed (data_fetch, quality_gate, solver, apply)
    pub failed_step: String,

    /// Status restored so a new generation can be triggered
    pub restored_status: ScheduleStatus,
}

/// Schedule was published for professor review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedForReview {
    pub event_version: u32,
    pub event_id: Uuid,
    pub schedule_id: ScheduleId,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Uuid,
    pub causation_id: Option<Uuid>,

    /// Deadline for professor feedback, seven days after publication
    pub review_deadline: DateTime<Utc>,

    /// Exams visible to reviewers at publication time
    pub exam_count: u32,
}

/// A professor submitted feedback on the published schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSubmitted {
    pub event_version: u32,
    pub event_id: Uuid,
    pub schedule_id: ScheduleId,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Uuid,
    pub causation_id: Option<Uuid>,

    /// The submitted comment
    pub comment: ProfessorComment,
}

/// A submitted comment was reviewed by an administrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentReviewed {
    pub event_version: u32,
    pub event_id: Uuid,
    pub schedule_id: ScheduleId,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Uuid,
    pub causation_id: Option<Uuid>,

    pub comment_id: CommentId,
    pub reviewed_by: String,
}

/// An adjustment to the schedule was requested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentRequested {
    pub event_version: u32,
    pub event_id: Uuid,
    pub schedule_id: ScheduleId,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Uuid,
    pub causation_id: Option<Uuid>,

    /// The requested adjustment, status REQUESTED
    pub adjustment: AdjustmentLog,
}

/// An adjustment entered administrative review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentReviewStarted {
    pub event_version: u32,
    pub event_id: Uuid,
    pub schedule_id: ScheduleId,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Uuid,
    pub causation_id: Option<Uuid>,

    pub adjustment_id: AdjustmentId,
}

/// An adjustment was approved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentApproved {
    pub event_version: u32,
    pub event_id: Uuid,
    pub schedule_id: ScheduleId,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Uuid,
    pub causation_id: Option<Uuid>,

    pub adjustment_id: AdjustmentId,
    pub approved_by: String,
    pub reason: Option<String>,
}

/// An adjustment was rejected with a reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentRejected {
    pub event_version: u32,
    pub event_id: Uuid,
    pub schedule_id: ScheduleId,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Uuid,
    pub causation_id: Option<Uuid>,

    pub adjustment_id: AdjustmentId,
    pub rejected_by: String,

    /// Rejection always carries a non-blank reason
    pub reason: String,
}

/// Schedule was finalized; final quality score snapshot captured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleFinalized {
    pub event_version: u32,
    pub event_id: Uuid,
    pub schedule_id: ScheduleId,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Uuid,
    pub causation_id: Option<Uuid>,

    /// Permanent snapshot of the quality score at finalization, never
    /// recomputed afterwards
    pub final_quality_score: Option<f64>,

    pub finalized_by: String,
}

/// Final schedule was published (terminal)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalPublished {
    pub event_version: u32,
    pub event_id: Uuid,
    pub schedule_id: ScheduleId,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Uuid,
    pub causation_id: Option<Uuid>,

    pub published_by: String,
}

/// Schedule lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    /// Schedule exists but has no generated content yet
    Draft,

    /// Professor preferences have been gathered
    PreferencesCollected,

    /// Generation workflow is running
    Generating,

    /// A generated exam set is present
    Generated,

    /// Published to professors for review
    PublishedForReview,

    /// At least one piece of feedback received, review in progress
    UnderReview,

    /// Content frozen, final quality snapshot captured
    Finalized,

    /// Published to students (terminal)
    Published,
}

impl ScheduleStatus {
    /// Check if transition to another status is valid
    pub fn can_transition_to(&self, target: &ScheduleStatus) -> bool {
        use ScheduleStatus::*;

        // Same status is always valid (idempotent)
        if self == target {
            return true;
        }

        match (self, target) {
            // Draft can start preference collection or generate directly
            (Draft, PreferencesCollected) => true,
            (Draft, Generating) => true,

            // Collected preferences feed generation
            (PreferencesCollected, Generating) => true,

            // Generation either succeeds or restores the pre-trigger status
            (Generating, Generated) => true,
            (Generating, Draft) => true,
            (Generating, PreferencesCollected) => true,

            // A generated schedule goes out for review
            (Generated, PublishedForReview) => true,

            // First feedback moves the schedule into active review
            (PublishedForReview, UnderReview) => true,

            // Review concludes with finalization
            (UnderReview, Finalized) => true,

            // Finalized schedules are published to students
            (Finalized, Published) => true,

            // Published is terminal (no transitions out except to itself, handled above)
            (Published, _) => false,

            // All other transitions are invalid
            _ => false,
        }
    }

    /// True once no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScheduleStatus::Published)
    }
}

impl std::fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ScheduleStatus::Draft => "draft",
            ScheduleStatus::PreferencesCollected => "preferences_collected",
            ScheduleStatus::Generating => "generating",
            ScheduleStatus::Generated => "generated",
            ScheduleStatus::PublishedForReview => "published_for_review",
            ScheduleStatus::UnderReview => "under_review",
            ScheduleStatus::Finalized => "finalized",
            ScheduleStatus::Published => "published",
        };
        write!(f, "{}", name)
    }
}

impl ScheduleEvent {
    /// Extract schedule aggregate ID from any event type
    pub fn schedule_id(&self) -> ScheduleId {
        use ScheduleEvent::*;

        match self {
            ScheduleCreated(e) => e.schedule_id,
            PreferencesCollected(e) => e.schedule_id,
            GenerationTriggered(e) => e.schedule_id,
            ExamsCleared(e) => e.schedule_id,
            ExamAdded(e) => e.schedule_id,
            ExamRemoved(e) => e.schedule_id,
            ExamTimeChanged(e) => e.schedule_id,
            ExamSpaceChanged(e) => e.schedule_id,
            GenerationCompleted(e) => e.schedule_id,
            GenerationFailed(e) => e.schedule_id,
            PublishedForReview(e) => e.schedule_id,
            FeedbackSubmitted(e) => e.schedule_id,
            CommentReviewed(e) => e.schedule_id,
            AdjustmentRequested(e) => e.schedule_id,
            AdjustmentReviewStarted(e) => e.schedule_id,
            AdjustmentApproved(e) => e.schedule_id,
            AdjustmentRejected(e) => e.schedule_id,
            ScheduleFinalized(e) => e.schedule_id,
            FinalPublished(e) => e.schedule_id,
        }
    }

    /// Extract event identifier from any event type
    pub fn event_id(&self) -> Uuid {
        use ScheduleEvent::*;

        match self {
            ScheduleCreated(e) => e.event_id,
            PreferencesCollected(e) => e.event_id,
            GenerationTriggered(e) => e.event_id,
            ExamsCleared(e) => e.event_id,
            ExamAdded(e) => e.event_id,
            ExamRemoved(e) => e.event_id,
            ExamTimeChanged(e) => e.event_id,
            ExamSpaceChanged(e) => e.event_id,
            GenerationCompleted(e) => e.event_id,
            GenerationFailed(e) => e.event_id,
            PublishedForReview(e) => e.event_id,
            FeedbackSubmitted(e) => e.event_id,
            CommentReviewed(e) => e.event_id,
            AdjustmentRequested(e) => e.event_id,
            AdjustmentReviewStarted(e) => e.event_id,
            AdjustmentApproved(e) => e.event_id,
            AdjustmentRejected(e) => e.event_id,
            ScheduleFinalized(e) => e.event_id,
            FinalPublished(e) => e.event_id,
        }
    }

    /// Extract event timestamp from any event type
    pub fn timestamp(&self) -> DateTime<Utc> {
        use ScheduleEvent::*;

        match self {
            ScheduleCreated(e) => e.timestamp,
            PreferencesCollected(e) => e.timestamp,
            GenerationTriggered(e) => e.timestamp,
            ExamsCleared(e) => e.timestamp,
            ExamAdded(e) => e.timestamp,
            ExamRemoved(e) => e.timestamp,
            ExamTimeChanged(e) => e.timestamp,
            ExamSpaceChanged(e) => e.timestamp,
            GenerationCompleted(e) => e.timestamp,
            GenerationFailed(e) => e.timestamp,
            PublishedForReview(e) => e.timestamp,
            FeedbackSubmitted(e) => e.timestamp,
            CommentReviewed(e) => e.timestamp,
            AdjustmentRequested(e) => e.timestamp,
            AdjustmentReviewStarted(e) => e.timestamp,
            AdjustmentApproved(e) => e.timestamp,
            AdjustmentRejected(e) => e.timestamp,
            ScheduleFinalized(e) => e.timestamp,
            FinalPublished(e) => e.timestamp,
        }
    }

    /// Extract correlation ID from any event type
    pub fn correlation_id(&self) -> Uuid {
        use ScheduleEvent::*;

        match self {
            ScheduleCreated(e) => e.correlation_id,
            PreferencesCollected(e) => e.correlation_id,
            GenerationTriggered(e) => e.correlation_id,
            ExamsCleared(e) => e.correlation_id,
            ExamAdded(e) => e.correlation_id,
            ExamRemoved(e) => e.correlation_id,
            ExamTimeChanged(e) => e.correlation_id,
            ExamSpaceChanged(e) => e.correlation_id,
            GenerationCompleted(e) => e.correlation_id,
            GenerationFailed(e) => e.correlation_id,
            PublishedForReview(e) => e.correlation_id,
            FeedbackSubmitted(e) => e.correlation_id,
            CommentReviewed(e) => e.correlation_id,
            AdjustmentRequested(e) => e.correlation_id,
            AdjustmentReviewStarted(e) => e.correlation_id,
            AdjustmentApproved(e) => e.correlation_id,
            AdjustmentRejected(e) => e.correlation_id,
            ScheduleFinalized(e) => e.correlation_id,
            FinalPublished(e) => e.correlation_id,
        }
    }

    /// Extract causation ID from any event type
    pub fn causation_id(&self) -> Option<Uuid> {
        use ScheduleEvent::*;

        match self {
            ScheduleCreated(e) => e.causation_id,
            PreferencesCollected(e) => e.causation_id,
            GenerationTriggered(e) => e.causation_id,
            ExamsCleared(e) => e.causation_id,
            ExamAdded(e) => e.causation_id,
            ExamRemoved(e) => e.causation_id,
            ExamTimeChanged(e) => e.causation_id,
            ExamSpaceChanged(e) => e.causation_id,
            GenerationCompleted(e) => e.causation_id,
            GenerationFailed(e) => e.causation_id,
            PublishedForReview(e) => e.causation_id,
            FeedbackSubmitted(e) => e.causation_id,
            CommentReviewed(e) => e.causation_id,
            AdjustmentRequested(e) => e.causation_id,
            AdjustmentReviewStarted(e) => e.causation_id,
            AdjustmentApproved(e) => e.causation_id,
            AdjustmentRejected(e) => e.causation_id,
            ScheduleFinalized(e) => e.causation_id,
            FinalPublished(e) => e.causation_id,
        }
    }

    /// Extract event schema version from any event type
    pub fn event_version(&self) -> u32 {
        use ScheduleEvent::*;

        match self {
            ScheduleCreated(e) => e.event_version,
            PreferencesCollected(e) => e.event_version,
            GenerationTriggered(e) => e.event_version,
            ExamsCleared(e) => e.event_version,
            ExamAdded(e) => e.event_version,
            ExamRemoved(e) => e.event_version,
            ExamTimeChanged(e) => e.event_version,
            ExamSpaceChanged(e) => e.event_version,
            GenerationCompleted(e) => e.event_version,
            GenerationFailed(e) => e.event_version,
            PublishedForReview(e) => e.event_version,
            FeedbackSubmitted(e) => e.event_version,
            CommentReviewed(e) => e.event_version,
            AdjustmentRequested(e) => e.event_version,
            AdjustmentReviewStarted(e) => e.event_version,
            AdjustmentApproved(e) => e.event_version,
            AdjustmentRejected(e) => e.event_version,
            ScheduleFinalized(e) => e.event_version,
            FinalPublished(e) => e.event_version,
        }
    }

    /// Stable event type name used in subjects and stored envelopes
    pub fn event_type(&self) -> &'static str {
        use ScheduleEvent::*;

        match self {
            ScheduleCreated(_) => "schedule_created",
            PreferencesCollected(_) => "preferences_collected",
            GenerationTriggered(_) => "generation_triggered",
            ExamsCleared(_) => "exams_cleared",
            ExamAdded(_) => "exam_added",
            ExamRemoved(_) => "exam_removed",
            ExamTimeChanged(_) => "exam_time_changed",
            ExamSpaceChanged(_) => "exam_space_changed",
            GenerationCompleted(_) => "generation_completed",
            GenerationFailed(_) => "generation_failed",
            PublishedForReview(_) => "published_for_review",
            FeedbackSubmitted(_) => "feedback_submitted",
            CommentReviewed(_) => "comment_reviewed",
            AdjustmentRequested(_) => "adjustment_requested",
            AdjustmentReviewStarted(_) => "adjustment_review_started",
            AdjustmentApproved(_) => "adjustment_approved",
            AdjustmentRejected(_) => "adjustment_rejected",
            ScheduleFinalized(_) => "schedule_finalized",
            FinalPublished(_) => "final_published",
        }
    }
}

/// Event version constants
impl ScheduleCreated {
    pub const CURRENT_VERSION: u32 = 1;
}

impl PreferencesCollected {
    pub const CURRENT_VERSION: u32 = 1;
}

impl GenerationTriggered {
    pub const CURRENT_VERSION: u32 = 1;
}

impl ExamsCleared {
    pub const CURRENT_VERSION: u32 = 1;
}

impl ExamAdded {
    pub const CURRENT_VERSION: u32 = 1;
}

impl ExamRemoved {
    pub const CURRENT_VERSION: u32 = 1;
}

impl ExamTimeChanged {
    pub const CURRENT_VERSION: u32 = 1;
}

impl ExamSpaceChanged {
    pub const CURRENT_VERSION: u32 = 1;
}

impl GenerationCompleted {
    pub const CURRENT_VERSION: u32 = 1;
}

impl GenerationFailed {
    pub const CURRENT_VERSION: u32 = 1;
}

impl PublishedForReview {
    pub const CURRENT_VERSION: u32 = 1;
}

impl FeedbackSubmitted {
    pub const CURRENT_VERSION: u32 = 1;
}

impl CommentReviewed {
    pub const CURRENT_VERSION: u32 = 1;
}

impl AdjustmentRequested {
    pub const CURRENT_VERSION: u32 = 1;
}

impl AdjustmentReviewStarted {
    pub const CURRENT_VERSION: u32 = 1;
}

impl AdjustmentApproved {
    pub const CURRENT_VERSION: u32 = 1;
}

impl AdjustmentRejected {
    pub const CURRENT_VERSION: u32 = 1;
}

impl ScheduleFinalized {
    pub const CURRENT_VERSION: u32 = 1;
}

impl FinalPublished {
    pub const CURRENT_VERSION: u32 = 1;
}
